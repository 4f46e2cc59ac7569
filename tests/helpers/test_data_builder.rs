// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use club_shift_ops::domain::{
    Employee, EmploymentType, ShiftAssignment, ShiftCategory, ShiftEnrollment, WeekWindow,
    ASSIGNMENT_STATUS_APPROVED,
};

// ==========================================
// Employee 构建器
// ==========================================

pub struct EmployeeBuilder {
    employee_id: i64,
    full_name: Option<String>,
    employee_type: EmploymentType,
    preferred: Option<ShiftCategory>,
}

impl EmployeeBuilder {
    pub fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            full_name: None,
            employee_type: EmploymentType::FullTime,
            preferred: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    pub fn part_time(mut self) -> Self {
        self.employee_type = EmploymentType::PartTime;
        self
    }

    pub fn preferred(mut self, category: ShiftCategory) -> Self {
        self.preferred = Some(category);
        self
    }

    pub fn build(self) -> Employee {
        let name = self
            .full_name
            .unwrap_or_else(|| format!("员工{}", self.employee_id));
        let employee = Employee::new(self.employee_id, &name, self.employee_type);
        match self.preferred {
            Some(category) => employee.with_preferred(category),
            None => employee,
        }
    }
}

/// 系统账号 + n 个全职员工（ID 从 2 开始）
pub fn full_time_staff(n: i64) -> Vec<Employee> {
    let mut staff = vec![EmployeeBuilder::new(1).name("admin").build()];
    staff.extend((2..2 + n).map(|id| EmployeeBuilder::new(id).build()));
    staff
}

// ==========================================
// 排班/报名构建器
// ==========================================

pub fn assignment(employee_id: i64, shift_id: i64, shift_date: NaiveDate) -> ShiftAssignment {
    ShiftAssignment::new(employee_id, shift_id, shift_date, ASSIGNMENT_STATUS_APPROVED)
}

pub fn enrollment(
    employee_id: i64,
    shift_id: i64,
    shift_date: NaiveDate,
    status: Option<&str>,
) -> ShiftEnrollment {
    ShiftEnrollment {
        employee_id,
        shift_id,
        shift_date,
        enrollment_status: status.map(str::to_string),
    }
}

/// 整周轮流分配: 第 i 天由 employees[i % len] 上班
pub fn round_robin_week(
    week: &WeekWindow,
    shift_id: i64,
    employees: &[i64],
) -> Vec<ShiftAssignment> {
    (0..7)
        .map(|i| {
            assignment(
                employees[i % employees.len()],
                shift_id,
                week.start + Duration::days(i as i64),
            )
        })
        .collect()
}

// ==========================================
// 俱乐部运营平台 - 排班数据网关
// ==========================================
// 职责: 聚合排班引擎/报名对账所需的全部数据访问
// 目标: 引擎只依赖 trait，测试时可以整体替换持久层
// ==========================================

use crate::domain::assignment::{ShiftAssignment, ShiftEnrollment, SlotKey, WeekWindow};
use crate::domain::employee::{Employee, ShiftDateInstance};
use crate::domain::types::{EmploymentType, EnrollmentStatus, ShiftCategory};
use crate::repository::assignment_repo::ShiftAssignmentRepository;
use crate::repository::employee_repo::EmployeeRepository;
use crate::repository::enrollment_repo::ShiftEnrollmentRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::shift_repo::ShiftRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// ShiftDataGateway Trait
// ==========================================
// 实现者: SqliteShiftGateway
pub trait ShiftDataGateway: Send + Sync {
    /// 全职员工列表（按 employee_id 升序，排除系统账号）
    fn list_full_time_employees(&self, exclude_employee_id: i64) -> RepositoryResult<Vec<Employee>>;

    /// 回写 rotate 计算出的新类别
    fn update_preferred_categories(&self, updates: &[(i64, ShiftCategory)]) -> RepositoryResult<usize>;

    /// 窗口内某类班次实例（按日期、班次升序）
    fn list_shift_instances(
        &self,
        window: &WeekWindow,
        kind: EmploymentType,
    ) -> RepositoryResult<Vec<ShiftDateInstance>>;

    fn list_assignments(
        &self,
        window: &WeekWindow,
        kind: Option<EmploymentType>,
    ) -> RepositoryResult<Vec<ShiftAssignment>>;

    fn delete_assignments(&self, window: &WeekWindow, kind: EmploymentType) -> RepositoryResult<usize>;

    fn insert_assignments(&self, assignments: &[ShiftAssignment]) -> RepositoryResult<usize>;

    fn list_enrollments(&self, window: &WeekWindow) -> RepositoryResult<Vec<ShiftEnrollment>>;

    fn update_enrollment_statuses(
        &self,
        updates: &[(SlotKey, EnrollmentStatus)],
    ) -> RepositoryResult<usize>;
}

// ==========================================
// SqliteShiftGateway - SQLite 实现
// ==========================================
/// 四个表仓储共享同一个连接
#[derive(Clone)]
pub struct SqliteShiftGateway {
    pub employee_repo: Arc<EmployeeRepository>,
    pub shift_repo: Arc<ShiftRepository>,
    pub assignment_repo: Arc<ShiftAssignmentRepository>,
    pub enrollment_repo: Arc<ShiftEnrollmentRepository>,
}

impl SqliteShiftGateway {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            employee_repo: Arc::new(EmployeeRepository::from_connection(conn.clone())),
            shift_repo: Arc::new(ShiftRepository::from_connection(conn.clone())),
            assignment_repo: Arc::new(ShiftAssignmentRepository::from_connection(conn.clone())),
            enrollment_repo: Arc::new(ShiftEnrollmentRepository::from_connection(conn)),
        }
    }
}

impl ShiftDataGateway for SqliteShiftGateway {
    fn list_full_time_employees(&self, exclude_employee_id: i64) -> RepositoryResult<Vec<Employee>> {
        self.employee_repo
            .list_by_type(EmploymentType::FullTime, Some(exclude_employee_id))
    }

    fn update_preferred_categories(&self, updates: &[(i64, ShiftCategory)]) -> RepositoryResult<usize> {
        self.employee_repo.update_preferred_categories(updates)
    }

    fn list_shift_instances(
        &self,
        window: &WeekWindow,
        kind: EmploymentType,
    ) -> RepositoryResult<Vec<ShiftDateInstance>> {
        self.shift_repo.list_instances(window, kind)
    }

    fn list_assignments(
        &self,
        window: &WeekWindow,
        kind: Option<EmploymentType>,
    ) -> RepositoryResult<Vec<ShiftAssignment>> {
        self.assignment_repo.list(window, kind)
    }

    fn delete_assignments(&self, window: &WeekWindow, kind: EmploymentType) -> RepositoryResult<usize> {
        self.assignment_repo.delete(window, kind)
    }

    fn insert_assignments(&self, assignments: &[ShiftAssignment]) -> RepositoryResult<usize> {
        self.assignment_repo.insert_batch(assignments)
    }

    fn list_enrollments(&self, window: &WeekWindow) -> RepositoryResult<Vec<ShiftEnrollment>> {
        self.enrollment_repo.list(window)
    }

    fn update_enrollment_statuses(
        &self,
        updates: &[(SlotKey, EnrollmentStatus)],
    ) -> RepositoryResult<usize> {
        self.enrollment_repo.update_statuses(updates)
    }
}

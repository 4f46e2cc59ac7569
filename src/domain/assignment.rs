// ==========================================
// 俱乐部运营平台 - 排班与报名领域模型
// ==========================================
// 对齐: shift_assignment / shift_enrollment 表
// 主键: (employee_id, shift_id, shift_date)
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 排班/报名记录共用的三元组主键
pub type SlotKey = (i64, i64, NaiveDate);

// ==========================================
// ShiftAssignment - 排班记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub employee_id: i64,
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub assignment_status: String,
}

impl ShiftAssignment {
    pub fn new(employee_id: i64, shift_id: i64, shift_date: NaiveDate, status: &str) -> Self {
        Self {
            employee_id,
            shift_id,
            shift_date,
            assignment_status: status.to_string(),
        }
    }

    pub fn key(&self) -> SlotKey {
        (self.employee_id, self.shift_id, self.shift_date)
    }
}

// ==========================================
// ShiftEnrollment - 报名记录
// ==========================================
// 只有报名对账会修改 enrollment_status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEnrollment {
    pub employee_id: i64,
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub enrollment_status: Option<String>,
}

impl ShiftEnrollment {
    pub fn key(&self) -> SlotKey {
        (self.employee_id, self.shift_id, self.shift_date)
    }
}

// ==========================================
// WeekWindow - 周窗口（周一 ~ 周日，闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate, // 周一
    pub end: NaiveDate,   // 周日
}

impl WeekWindow {
    /// 以周一为起点构造完整一周
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 整体平移若干天
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..=(self.end - self.start).num_days()).map(move |d| start + Duration::days(d))
    }
}

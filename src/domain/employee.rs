// ==========================================
// 俱乐部运营平台 - 员工与班次领域模型
// ==========================================
// 对齐: employees / shifts / shift_date 表
// ==========================================

use crate::domain::types::{EmploymentType, ShiftCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
// 排班引擎只读取员工信息，唯一会回写的字段是 preferred_shift_type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i64,
    pub full_name: String,
    pub employee_type: EmploymentType,
    pub preferred_shift_type: Option<ShiftCategory>, // 上一轮 rotate 写入的类别
}

impl Employee {
    pub fn new(employee_id: i64, full_name: &str, employee_type: EmploymentType) -> Self {
        Self {
            employee_id,
            full_name: full_name.to_string(),
            employee_type,
            preferred_shift_type: None,
        }
    }

    pub fn with_preferred(mut self, category: ShiftCategory) -> Self {
        self.preferred_shift_type = Some(category);
        self
    }
}

// ==========================================
// Shift - 班次模板
// ==========================================
// 运行期间不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub shift_id: i64,
    pub shift_name: String,
    pub shift_type: EmploymentType,
    pub start_hour: u32,
    pub end_hour: u32,
}

// ==========================================
// ShiftDateInstance - 班次实例 (班次 × 日期)
// ==========================================
// 由外部周任务提前生成，排班引擎只读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftDateInstance {
    pub shift_id: i64,
    pub shift_date: NaiveDate,
}

impl ShiftDateInstance {
    pub fn new(shift_id: i64, shift_date: NaiveDate) -> Self {
        Self {
            shift_id,
            shift_date,
        }
    }
}

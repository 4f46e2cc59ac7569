// ==========================================
// 俱乐部运营平台 - 领域模型层
// ==========================================
// 职责: 定义排班实体、规则对象与共用类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod employee;
pub mod rule;
pub mod types;

// 重导出核心类型
pub use assignment::{ShiftAssignment, ShiftEnrollment, SlotKey, WeekWindow};
pub use employee::{Employee, Shift, ShiftDateInstance};
pub use rule::{
    action_label, condition_label, Comparator, ConditionKind, ConditionSpec, ConditionValue,
    Rule, RuleAction, RuleCondition, RuleSet, RuleType, RuleValidationError, SubObject,
};
pub use types::{EmploymentType, EnrollmentStatus, ShiftCategory, ASSIGNMENT_STATUS_APPROVED};

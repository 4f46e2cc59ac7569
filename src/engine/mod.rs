// ==========================================
// 俱乐部运营平台 - 排班引擎层
// ==========================================
// 职责: 全职排班策略、报名对账、自动排班编排
// 红线: 引擎只通过 ShiftDataGateway 访问持久层
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod reconciliation;
pub mod rotation;
pub mod scheduler;
pub mod strategy;
pub mod week;

pub use error::{SchedulingError, SchedulingResult};
pub use orchestrator::{
    AutoAssignmentOrchestrator, AutoAssignmentOutcome, AutoAssignmentStatus, FullTimePlan,
    SideOutcome,
};
pub use reconciliation::{EnrollmentReconciler, ReconciliationReport};
pub use rotation::{next_category, plan_categories, RotateSlot, RotationPools};
pub use scheduler::{FullTimeAssignmentReport, FullTimeScheduler, SchedulerSettings};
pub use strategy::FullTimeStrategy;
pub use week::{current_week, next_week};

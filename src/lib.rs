// ==========================================
// 俱乐部运营平台 - 排班自动分配核心库
// ==========================================
// 技术栈: Rust + SQLite + xlsx 决策表
// 职责: 全职排班策略、兼职排班编排、决策表维护、报名对账
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与规则对象
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排班策略与编排
pub mod engine;

// 决策表存储层 - xlsx 规则块读写
pub mod decision_table;

// 外部规则引擎客户端
pub mod rule_engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EmploymentType, EnrollmentStatus, ShiftCategory};

// 领域实体
pub use domain::{
    Employee, Rule, RuleSet, RuleType, ShiftAssignment, ShiftDateInstance, ShiftEnrollment,
    WeekWindow,
};

// 引擎
pub use engine::{
    AutoAssignmentOrchestrator, EnrollmentReconciler, FullTimeScheduler, FullTimeStrategy,
};

// 决策表
pub use decision_table::DecisionTableStore;

// API
pub use api::{AutoAssignmentApi, EnrollmentApi, RuleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "俱乐部运营平台 - 排班自动分配";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

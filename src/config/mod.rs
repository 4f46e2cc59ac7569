// ==========================================
// 俱乐部运营平台 - 配置层
// ==========================================
// 职责: 部署相关常量的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod assignment_config_trait;
pub mod config_manager;

// 重导出核心配置管理器
pub use assignment_config_trait::{AssignmentConfigReader, ConfigResult};
pub use config_manager::{config_keys, defaults, ConfigManager};

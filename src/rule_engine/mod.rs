// ==========================================
// 俱乐部运营平台 - 外部规则引擎
// ==========================================

pub mod client;
pub mod http;

pub use client::{PartTimeAssignmentResult, RuleEngineClient, RuleEngineError};
pub use http::HttpRuleEngineClient;

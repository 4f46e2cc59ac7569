// ==========================================
// 俱乐部运营平台 - 外部规则引擎接口
// ==========================================
// 兼职排班完全由外部规则引擎完成，这里只定义调用契约
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleEngineError {
    #[error("规则引擎请求失败: {0}")]
    Http(String),

    #[error("规则引擎返回异常状态 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("规则引擎响应解析失败: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RuleEngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RuleEngineError::Decode(err.to_string())
        } else {
            RuleEngineError::Http(err.to_string())
        }
    }
}

// ==========================================
// PartTimeAssignmentResult - 兼职排班结果
// ==========================================
// 字段与规则引擎响应保持一致，缺失字段取默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartTimeAssignmentResult {
    pub assignments: Vec<serde_json::Value>,
    pub total_assignments: u64,
    pub employees_processed: u64,
    pub shifts_processed: u64,
    pub success: bool,
    pub message: String,
    pub sort_option_used: Option<i64>,
}

// ==========================================
// RuleEngineClient Trait
// ==========================================
// 实现者: HttpRuleEngineClient；测试中可替换为录制桩
#[async_trait]
pub trait RuleEngineClient: Send + Sync {
    /// 触发兼职自动排班
    async fn auto_assign(&self, sort_option: i64) -> Result<PartTimeAssignmentResult, RuleEngineError>;

    /// 通知规则引擎重新加载决策表
    async fn reload(&self) -> Result<(), RuleEngineError>;
}

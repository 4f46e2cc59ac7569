// ==========================================
// 俱乐部运营平台 - 决策表错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecisionTableError {
    // ===== 文件相关错误 =====
    #[error("决策表文件不存在: {0}")]
    FileNotFound(String),

    #[error("工作表不存在: {sheet}（可用工作表: {}）", available.join(", "))]
    WorksheetNotFound { sheet: String, available: Vec<String> },

    #[error("决策表读取失败: {0}")]
    ExcelRead(String),

    #[error("决策表写入失败: {0}")]
    ExcelWrite(String),

    #[error("备份失败: {0}")]
    Backup(String),

    // ===== 结构错误 =====
    #[error("未知规则类型: {0}")]
    UnknownRuleType(String),

    #[error("决策表中找不到规则块: RuleTable {0}")]
    BlockNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type DecisionTableResult<T> = Result<T, DecisionTableError>;

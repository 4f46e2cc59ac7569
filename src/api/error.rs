// ==========================================
// 俱乐部运营平台 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为带状态码的用户可读错误
// ==========================================

use crate::decision_table::DecisionTableError;
use crate::domain::rule::RuleValidationError;
use crate::engine::error::SchedulingError;
use crate::repository::error::RepositoryError;
use crate::rule_engine::RuleEngineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("前置条件不满足: {0}")]
    PreconditionFailed(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 外部资源错误
    // ==========================================
    #[error("决策表错误: {0}")]
    DecisionTableError(String),

    #[error("规则引擎错误: {0}")]
    RuleEngineError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::BusinessRuleViolation(_) | ApiError::PreconditionFailed(_) => 409,
            ApiError::RuleEngineError(_) => 502,
            _ => 500,
        }
    }

    /// 失败响应体
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            message: self.summary().to_string(),
            error: self.to_string(),
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "请求参数无效",
            ApiError::NotFound(_) => "资源不存在",
            ApiError::BusinessRuleViolation(_) | ApiError::PreconditionFailed(_) => "操作被拒绝",
            _ => "服务器内部错误",
        }
    }
}

/// 失败响应体 `{success, message, error}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

// ==========================================
// 从各层错误转换
// ==========================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}取值异常: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidArgument(msg) => ApiError::InvalidInput(msg),
            SchedulingError::NotFound(msg) => ApiError::NotFound(msg),
            SchedulingError::Precondition(msg) => ApiError::PreconditionFailed(msg),
            SchedulingError::Repository(err) => err.into(),
            SchedulingError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<DecisionTableError> for ApiError {
    fn from(err: DecisionTableError) -> Self {
        match err {
            DecisionTableError::FileNotFound(_) | DecisionTableError::WorksheetNotFound { .. } => {
                ApiError::NotFound(err.to_string())
            }
            DecisionTableError::BlockNotFound(_) | DecisionTableError::UnknownRuleType(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            other => ApiError::DecisionTableError(other.to_string()),
        }
    }
}

impl From<RuleValidationError> for ApiError {
    fn from(err: RuleValidationError) -> Self {
        match err {
            RuleValidationError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RuleValidationError::DuplicateName(_) => ApiError::BusinessRuleViolation(err.to_string()),
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl From<RuleEngineError> for ApiError {
    fn from(err: RuleEngineError) -> Self {
        ApiError::RuleEngineError(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: "42".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match &api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Employee"));
                assert!(msg.contains("42"));
            }
            _ => panic!("Expected NotFound"),
        }
        assert_eq!(api_err.http_status(), 404);
    }

    #[test]
    fn test_scheduling_error_status() {
        let err: ApiError = SchedulingError::InvalidArgument("maxEmployeesPerShift".into()).into();
        assert_eq!(err.http_status(), 400);

        let err: ApiError = SchedulingError::Precondition("上周没有排班".into()).into();
        assert_eq!(err.http_status(), 409);

        let err: ApiError =
            SchedulingError::Repository(RepositoryError::LockError("poisoned".into())).into();
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_rule_validation_error_status() {
        let err: ApiError = RuleValidationError::DuplicateName("R1".into()).into();
        assert_eq!(err.http_status(), 409);

        let err: ApiError = RuleValidationError::MissingField("ruleName".into()).into();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_error_body() {
        let body = ApiError::InvalidInput("未知排班策略: weekly".into()).to_body();
        assert!(!body.success);
        assert_eq!(body.message, "请求参数无效");
        assert!(body.error.contains("weekly"));
    }
}

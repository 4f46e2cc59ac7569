// ==========================================
// 俱乐部运营平台 - API 层
// ==========================================
// 职责: 提供业务 API 接口，返回可序列化的响应体与状态码
// 不包含 HTTP 路由
// ==========================================

pub mod auto_assignment_api;
pub mod enrollment_api;
pub mod error;
pub mod rule_api;

// 重导出核心类型
pub use auto_assignment_api::{AutoAssignmentApi, AutoAssignmentRequest};
pub use enrollment_api::EnrollmentApi;
pub use error::{ApiError, ApiResult, ErrorBody};
pub use rule_api::{PutRowsRequest, RuleApi, RuleVocabulary, RulesResponse, VocabularyEntry};

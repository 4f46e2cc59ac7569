// ==========================================
// 俱乐部运营平台 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod employee_repo;
pub mod enrollment_repo;
pub mod error;
pub mod gateway;
pub mod shift_repo;

// 重导出核心仓储
pub use assignment_repo::ShiftAssignmentRepository;
pub use employee_repo::EmployeeRepository;
pub use enrollment_repo::ShiftEnrollmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use gateway::{ShiftDataGateway, SqliteShiftGateway};
pub use shift_repo::ShiftRepository;

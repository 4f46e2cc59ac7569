// ==========================================
// 俱乐部运营平台 - 排班引擎错误类型
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    /// 参数非法（策略名称、每班人数等）
    #[error("参数非法: {0}")]
    InvalidArgument(String),

    /// 必需数据不存在（员工、班次实例）
    #[error("数据不存在: {0}")]
    NotFound(String),

    /// 前置条件不满足（上周无排班、结果为空等）
    #[error("前置条件不满足: {0}")]
    Precondition(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

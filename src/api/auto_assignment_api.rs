// ==========================================
// 俱乐部运营平台 - 自动排班 API
// ==========================================
// 请求: {fullTimeOption: string, partTimeOption: number}
// 状态码: 201 全部成功 / 207 部分成功 / 500 全部失败
// 全职参数非法时只记为全职侧失败，兼职侧照常执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AssignmentConfigReader;
use crate::engine::orchestrator::{
    AutoAssignmentOrchestrator, AutoAssignmentOutcome, FullTimePlan,
};
use crate::engine::scheduler::{FullTimeAssignmentReport, FullTimeScheduler};
use crate::engine::strategy::FullTimeStrategy;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignmentRequest {
    pub full_time_option: String,
    pub part_time_option: i64,
}

pub struct AutoAssignmentApi {
    orchestrator: Arc<AutoAssignmentOrchestrator>,
    scheduler: Arc<FullTimeScheduler>,
    config: Arc<dyn AssignmentConfigReader>,
}

impl AutoAssignmentApi {
    pub fn new(
        orchestrator: Arc<AutoAssignmentOrchestrator>,
        scheduler: Arc<FullTimeScheduler>,
        config: Arc<dyn AssignmentConfigReader>,
    ) -> Self {
        Self {
            orchestrator,
            scheduler,
            config,
        }
    }

    /// 以当天日期执行自动排班
    pub async fn perform(&self, request: &AutoAssignmentRequest) -> (u16, AutoAssignmentOutcome) {
        self.perform_on(request, Local::now().date_naive()).await
    }

    pub async fn perform_on(
        &self,
        request: &AutoAssignmentRequest,
        today: NaiveDate,
    ) -> (u16, AutoAssignmentOutcome) {
        let full_time = self.full_time_plan(&request.full_time_option).await;
        let outcome = self
            .orchestrator
            .perform(full_time, request.part_time_option, today)
            .await;
        (outcome.status.http_status(), outcome)
    }

    /// 解析全职策略并读取每班人数上限
    async fn full_time_plan(&self, option: &str) -> Result<FullTimePlan, String> {
        let strategy = option.parse::<FullTimeStrategy>().map_err(|msg| {
            warn!(option = %option, "全职排班策略无效");
            ApiError::InvalidInput(msg).to_string()
        })?;
        let max_employees_per_shift = self
            .config
            .get_max_employees_per_shift()
            .await
            .map_err(|e| {
                warn!(error = %e, "读取每班人数上限失败");
                ApiError::from(e).to_string()
            })?;
        Ok(FullTimePlan {
            strategy,
            max_employees_per_shift,
        })
    }

    /// 只执行全职排班
    ///
    /// # 参数
    /// - strategy: same / rotate / random
    /// - max_employees_per_shift: 为空时使用配置值
    pub async fn assign_full_time_on(
        &self,
        strategy: &str,
        max_employees_per_shift: Option<usize>,
        today: NaiveDate,
    ) -> ApiResult<FullTimeAssignmentReport> {
        let strategy = strategy
            .parse::<FullTimeStrategy>()
            .map_err(ApiError::InvalidInput)?;
        let max = match max_employees_per_shift {
            Some(n) => n,
            None => self.config.get_max_employees_per_shift().await?,
        };

        let report = self.scheduler.assign_full_time(strategy, max, today)?;
        info!(
            strategy = %strategy,
            created = report.created,
            "全职排班接口调用完成"
        );
        Ok(report)
    }
}

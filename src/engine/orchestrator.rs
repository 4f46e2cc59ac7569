// ==========================================
// 俱乐部运营平台 - 自动排班编排器
// ==========================================
// 用途: 协调一次完整的自动排班
// 顺序: 兼职（外部规则引擎） -> 全职（排班引擎） -> 报名对账（尽力而为）
// 两侧互不影响：一侧失败不阻止另一侧执行
// ==========================================

use crate::engine::reconciliation::{EnrollmentReconciler, ReconciliationReport};
use crate::engine::scheduler::{FullTimeAssignmentReport, FullTimeScheduler};
use crate::engine::strategy::FullTimeStrategy;
use crate::rule_engine::{PartTimeAssignmentResult, RuleEngineClient};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// ==========================================
// AutoAssignmentStatus - 合并状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAssignmentStatus {
    Success,
    PartialSuccess,
    Failure,
}

impl AutoAssignmentStatus {
    pub fn from_sides(part_time_ok: bool, full_time_ok: bool) -> Self {
        match (part_time_ok, full_time_ok) {
            (true, true) => AutoAssignmentStatus::Success,
            (false, false) => AutoAssignmentStatus::Failure,
            _ => AutoAssignmentStatus::PartialSuccess,
        }
    }

    /// 边界层使用的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            AutoAssignmentStatus::Success => 201,
            AutoAssignmentStatus::PartialSuccess => 207,
            AutoAssignmentStatus::Failure => 500,
        }
    }
}

// ==========================================
// SideOutcome - 单侧结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> SideOutcome<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

// ==========================================
// AutoAssignmentOutcome - 编排结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignmentOutcome {
    pub success: bool,
    pub status: AutoAssignmentStatus,
    pub message: String,
    pub part_time_result: SideOutcome<PartTimeAssignmentResult>,
    pub full_time_result: SideOutcome<FullTimeAssignmentReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<ReconciliationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation_error: Option<String>,
}

// ==========================================
// FullTimePlan - 全职侧参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullTimePlan {
    pub strategy: FullTimeStrategy,
    pub max_employees_per_shift: usize,
}

// ==========================================
// AutoAssignmentOrchestrator
// ==========================================
pub struct AutoAssignmentOrchestrator {
    scheduler: Arc<FullTimeScheduler>,
    reconciler: Arc<EnrollmentReconciler>,
    rule_engine: Arc<dyn RuleEngineClient>,
}

impl AutoAssignmentOrchestrator {
    pub fn new(
        scheduler: Arc<FullTimeScheduler>,
        reconciler: Arc<EnrollmentReconciler>,
        rule_engine: Arc<dyn RuleEngineClient>,
    ) -> Self {
        Self {
            scheduler,
            reconciler,
            rule_engine,
        }
    }

    /// 执行一次完整的自动排班
    ///
    /// # 参数
    /// - full_time: 全职侧参数；参数解析失败时为错误信息，全职侧记为失败
    /// - sort_option: 透传给规则引擎的兼职排序选项
    /// - today: 当前日期
    pub async fn perform(
        &self,
        full_time: Result<FullTimePlan, String>,
        sort_option: i64,
        today: NaiveDate,
    ) -> AutoAssignmentOutcome {
        info!(full_time = ?full_time, sort_option, "开始自动排班");

        // ===== 兼职 =====
        let part_time_result = match self.rule_engine.auto_assign(sort_option).await {
            Ok(result) if result.success => SideOutcome::ok(result),
            Ok(result) => {
                warn!(message = %result.message, "规则引擎报告兼职排班失败");
                let message = if result.message.is_empty() {
                    "规则引擎未能完成兼职排班".to_string()
                } else {
                    result.message
                };
                SideOutcome::failed(message)
            }
            Err(e) => {
                error!(error = %e, "兼职排班失败");
                SideOutcome::failed(e.to_string())
            }
        };

        // ===== 全职 =====
        let full_time_result = match full_time {
            Ok(plan) => match self.scheduler.assign_full_time(
                plan.strategy,
                plan.max_employees_per_shift,
                today,
            ) {
                Ok(report) => SideOutcome::ok(report),
                Err(e) => {
                    error!(error = %e, strategy = %plan.strategy, "全职排班失败");
                    SideOutcome::failed(e.to_string())
                }
            },
            Err(reason) => {
                error!(error = %reason, "全职排班参数无效");
                SideOutcome::failed(reason)
            }
        };

        let status =
            AutoAssignmentStatus::from_sides(part_time_result.success, full_time_result.success);

        // ===== 报名对账（不影响合并状态）=====
        let (reconciliation, reconciliation_error) = if status == AutoAssignmentStatus::Failure {
            (None, None)
        } else {
            match self.reconciler.reconcile_next_week(today) {
                Ok(report) => (Some(report), None),
                Err(e) => {
                    warn!(error = %e, "报名对账失败，忽略");
                    (None, Some(e.to_string()))
                }
            }
        };

        let message = match status {
            AutoAssignmentStatus::Success => "自动排班完成".to_string(),
            AutoAssignmentStatus::PartialSuccess if part_time_result.success => {
                "自动排班部分成功: 全职排班失败".to_string()
            }
            AutoAssignmentStatus::PartialSuccess => "自动排班部分成功: 兼职排班失败".to_string(),
            AutoAssignmentStatus::Failure => "自动排班失败: 兼职与全职均未完成".to_string(),
        };

        info!(status = ?status, message = %message, "自动排班结束");

        AutoAssignmentOutcome {
            success: status != AutoAssignmentStatus::Failure,
            status,
            message,
            part_time_result,
            full_time_result,
            reconciliation,
            reconciliation_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(AutoAssignmentStatus::from_sides(true, true).http_status(), 201);
        assert_eq!(AutoAssignmentStatus::from_sides(true, false).http_status(), 207);
        assert_eq!(AutoAssignmentStatus::from_sides(false, true).http_status(), 207);
        assert_eq!(AutoAssignmentStatus::from_sides(false, false).http_status(), 500);
    }
}

// ==========================================
// 俱乐部运营平台 - 报名状态对账
// ==========================================
// 排班完成后，按下周排班结果重新推导报名状态:
// - 有对应排班      -> assigned
// - 没有对应排班    -> not assigned
// - 已经是正确状态  -> 跳过（幂等）
// ==========================================

use crate::domain::assignment::SlotKey;
use crate::domain::types::EnrollmentStatus;
use crate::engine::error::SchedulingResult;
use crate::engine::week::next_week;
use crate::repository::gateway::ShiftDataGateway;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub updated: usize,
    pub assigned: usize,
    pub not_assigned: usize,
    pub skipped: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReconciliationReport {
    fn empty(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

pub struct EnrollmentReconciler {
    gateway: Arc<dyn ShiftDataGateway>,
}

impl EnrollmentReconciler {
    pub fn new(gateway: Arc<dyn ShiftDataGateway>) -> Self {
        Self { gateway }
    }

    /// 对账下周的报名状态
    pub fn reconcile_next_week(&self, today: NaiveDate) -> SchedulingResult<ReconciliationReport> {
        let week = next_week(today);

        let assignments = self.gateway.list_assignments(&week, None)?;
        if assignments.is_empty() {
            info!(week_start = %week.start, "下周没有排班记录，跳过报名对账");
            return Ok(ReconciliationReport::empty("下周没有排班记录"));
        }

        let enrollments = self.gateway.list_enrollments(&week)?;
        if enrollments.is_empty() {
            info!(week_start = %week.start, "下周没有报名记录，跳过报名对账");
            return Ok(ReconciliationReport::empty("下周没有报名记录"));
        }

        let assigned_keys: HashSet<SlotKey> = assignments.iter().map(|a| a.key()).collect();

        let mut updates: Vec<(SlotKey, EnrollmentStatus)> = Vec::new();
        let mut report = ReconciliationReport {
            total: enrollments.len(),
            ..ReconciliationReport::default()
        };

        for enrollment in &enrollments {
            let target = if assigned_keys.contains(&enrollment.key()) {
                EnrollmentStatus::Assigned
            } else {
                EnrollmentStatus::NotAssigned
            };

            if target.matches(enrollment.enrollment_status.as_deref()) {
                report.skipped += 1;
                continue;
            }

            match target {
                EnrollmentStatus::Assigned => report.assigned += 1,
                EnrollmentStatus::NotAssigned => report.not_assigned += 1,
            }
            updates.push((enrollment.key(), target));
        }

        if !updates.is_empty() {
            report.updated = self.gateway.update_enrollment_statuses(&updates)?;
        }

        info!(
            week_start = %week.start,
            total = report.total,
            updated = report.updated,
            assigned = report.assigned,
            not_assigned = report.not_assigned,
            skipped = report.skipped,
            "报名对账完成"
        );
        Ok(report)
    }
}

// ==========================================
// 俱乐部运营平台 - 报名对账 API
// ==========================================

use crate::api::error::ApiResult;
use crate::engine::reconciliation::{EnrollmentReconciler, ReconciliationReport};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

pub struct EnrollmentApi {
    reconciler: Arc<EnrollmentReconciler>,
}

impl EnrollmentApi {
    pub fn new(reconciler: Arc<EnrollmentReconciler>) -> Self {
        Self { reconciler }
    }

    pub fn reconcile_next_week(&self) -> ApiResult<ReconciliationReport> {
        self.reconcile_next_week_on(Local::now().date_naive())
    }

    pub fn reconcile_next_week_on(&self, today: NaiveDate) -> ApiResult<ReconciliationReport> {
        Ok(self.reconciler.reconcile_next_week(today)?)
    }
}

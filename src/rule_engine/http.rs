// ==========================================
// 俱乐部运营平台 - 规则引擎 HTTP 客户端
// ==========================================
// POST {base}/api/auto-assignment/  body: {sortOption}
// POST {base}/api/drools/reload
// 不设超时、不重试：失败一次即上报
// ==========================================

use crate::rule_engine::client::{PartTimeAssignmentResult, RuleEngineClient, RuleEngineError};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct HttpRuleEngineClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRuleEngineClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auto_assignment_url(&self) -> String {
        format!("{}/api/auto-assignment/", self.base_url)
    }

    fn reload_url(&self) -> String {
        format!("{}/api/drools/reload", self.base_url)
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RuleEngineError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RuleEngineError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl RuleEngineClient for HttpRuleEngineClient {
    async fn auto_assign(&self, sort_option: i64) -> Result<PartTimeAssignmentResult, RuleEngineError> {
        let url = self.auto_assignment_url();
        debug!(url = %url, sort_option, "调用规则引擎兼职排班");

        let body = serde_json::json!({ "sortOption": sort_option });
        let resp = self.client.post(&url).json(&body).send().await?;
        let resp = Self::check_status(resp).await?;

        let result: PartTimeAssignmentResult = resp.json().await?;
        info!(
            total_assignments = result.total_assignments,
            employees_processed = result.employees_processed,
            shifts_processed = result.shifts_processed,
            success = result.success,
            "规则引擎兼职排班完成"
        );
        Ok(result)
    }

    async fn reload(&self) -> Result<(), RuleEngineError> {
        let url = self.reload_url();
        let resp = self.client.post(&url).send().await?;
        Self::check_status(resp).await?;
        info!(url = %url, "规则引擎已重新加载决策表");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = HttpRuleEngineClient::new("http://engine:8080/");
        assert_eq!(client.base_url(), "http://engine:8080");
        assert_eq!(client.auto_assignment_url(), "http://engine:8080/api/auto-assignment/");
        assert_eq!(client.reload_url(), "http://engine:8080/api/drools/reload");
    }

    #[test]
    fn test_result_tolerates_missing_fields() {
        let result: PartTimeAssignmentResult =
            serde_json::from_str(r#"{"success": true, "totalAssignments": 3}"#).unwrap();
        assert!(result.success);
        assert_eq!(result.total_assignments, 3);
        assert!(result.assignments.is_empty());
        assert_eq!(result.sort_option_used, None);
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_http_error() {
        // 端口 9 (discard) 通常无人监听
        let client = HttpRuleEngineClient::new("http://127.0.0.1:9");
        let err = client.reload().await.unwrap_err();
        assert!(matches!(err, RuleEngineError::Http(_)));
    }
}

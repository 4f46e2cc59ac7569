// ==========================================
// 俱乐部运营平台 - 决策表规则 API
// ==========================================
// GET  -> {data: Rule[]}
// PUT  -> {data: [{type, cols}]}  按列整体替换
// 单条规则的增删改在存储的写锁内完成读取-编辑-写回
// 词汇表接口提供每类规则的条件/动作及展示名称
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::decision_table::{DecisionTableStore, PositionalRow, ReplaceOutcome};
use crate::domain::rule::{action_label, condition_label, ConditionKind, Rule, RuleType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesResponse {
    pub data: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutRowsRequest {
    pub data: Vec<PositionalRow>,
}

/// 单个条件或动作的词汇条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConditionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleVocabulary {
    pub rule_type: RuleType,
    pub block_name: &'static str,
    pub conditions: Vec<VocabularyEntry>,
    pub actions: Vec<VocabularyEntry>,
}

pub struct RuleApi {
    store: Arc<DecisionTableStore>,
}

impl RuleApi {
    pub fn new(store: Arc<DecisionTableStore>) -> Self {
        Self { store }
    }

    /// 四类规则的条件与动作词汇（编辑界面使用）
    pub fn vocabulary(&self) -> Vec<RuleVocabulary> {
        RuleType::ALL
            .into_iter()
            .map(|rule_type| RuleVocabulary {
                rule_type,
                block_name: rule_type.block_name(),
                conditions: rule_type
                    .condition_vocabulary()
                    .iter()
                    .map(|spec| VocabularyEntry {
                        name: spec.name,
                        label: condition_label(spec.name),
                        kind: Some(spec.kind),
                    })
                    .collect(),
                actions: rule_type
                    .action_vocabulary()
                    .iter()
                    .map(|&name| VocabularyEntry {
                        name,
                        label: action_label(name),
                        kind: None,
                    })
                    .collect(),
            })
            .collect()
    }

    pub async fn get_rules(&self) -> ApiResult<RulesResponse> {
        let outcome = self.store.read_rule_blocks().await?;
        Ok(RulesResponse {
            data: outcome.rules,
        })
    }

    pub async fn put_rows(&self, request: &PutRowsRequest) -> ApiResult<ReplaceOutcome> {
        let outcome = self.store.replace_rule_blocks(&request.data).await?;
        info!(
            rows = request.data.len(),
            inserted = outcome.inserted_rows,
            skipped = outcome.skipped_rows,
            "决策表按列写入完成"
        );
        Ok(outcome)
    }

    /// 新建规则，名称必须唯一
    pub async fn create_rule(&self, rule: Rule) -> ApiResult<ReplaceOutcome> {
        let name = rule.rule_name.clone();
        let outcome = self
            .store
            .edit_rules(|set| set.create(rule).map_err(ApiError::from))
            .await?;
        info!(rule = %name, "规则已创建");
        Ok(outcome)
    }

    /// 修改规则（允许改名，但不能与其他规则重名）
    pub async fn update_rule(&self, original_name: &str, rule: Rule) -> ApiResult<ReplaceOutcome> {
        let outcome = self
            .store
            .edit_rules(|set| set.update(original_name, rule).map_err(ApiError::from))
            .await?;
        info!(rule = %original_name, "规则已修改");
        Ok(outcome)
    }

    pub async fn delete_rule(&self, name: &str) -> ApiResult<ReplaceOutcome> {
        let outcome = self
            .store
            .edit_rules(|set| set.delete(name).map(|_| ()).map_err(ApiError::from))
            .await?;
        info!(rule = %name, "规则已删除");
        Ok(outcome)
    }

    /// 清空规则的某个条件
    pub async fn clear_condition(&self, rule_name: &str, condition: &str) -> ApiResult<ReplaceOutcome> {
        self.store
            .edit_rules(|set| -> ApiResult<()> {
                let mut rule = set
                    .find(rule_name)
                    .cloned()
                    .ok_or_else(|| ApiError::NotFound(format!("规则不存在: {}", rule_name)))?;
                rule.clear_condition(condition)?;
                set.update(rule_name, rule)?;
                Ok(())
            })
            .await
    }
}

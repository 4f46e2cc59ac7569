// ==========================================
// 俱乐部运营平台 - 决策表改写
// ==========================================
// 两阶段（在内存中的工作表上完成，落盘由 store 负责）:
// 1. 删除所有规则块的数据行（从最下方的块开始，保证上方块的行号不变）
// 2. 逐行插入到对应规则块表头 +5 行（后插入的排在前面）
// ==========================================

use crate::decision_table::error::{DecisionTableError, DecisionTableResult};
use crate::decision_table::grid::{data_range, find_block_headers, DATA_ROW_OFFSET};
use crate::decision_table::schema::RuleBlockSchema;
use crate::domain::rule::{Rule, RuleType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use umya_spreadsheet::Worksheet;

// ==========================================
// PositionalRow - 按列写入的行
// ==========================================
// cols = [description, ruleName, 条件..., 动作...]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalRow {
    #[serde(rename = "type")]
    pub row_type: String,
    #[serde(default)]
    pub cols: Vec<serde_json::Value>,
}

impl PositionalRow {
    pub fn new(rule_type: RuleType, cols: Vec<String>) -> Self {
        Self {
            row_type: rule_type.as_str().to_string(),
            cols: cols.into_iter().map(serde_json::Value::String).collect(),
        }
    }

    /// 经由规则块结构把规则对象转换为按列写入的行
    pub fn from_rule(schema: &RuleBlockSchema, rule: &Rule) -> Self {
        Self::new(rule.rule_type, schema.positional_cols(rule))
    }

    pub fn rule_type(&self) -> DecisionTableResult<RuleType> {
        self.row_type
            .parse::<RuleType>()
            .map_err(|_| DecisionTableError::UnknownRuleType(self.row_type.clone()))
    }

    fn col_texts(&self) -> Vec<String> {
        self.cols
            .iter()
            .map(|v| match v {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// 补齐预留子对象列与末尾规则族标记
///
/// 员工类规则在第 3 列插入两个 "-" 占位；所有类型末尾追加一个空列和规则族标记。
pub fn layout_row(rule_type: RuleType, cols: &[String]) -> Vec<String> {
    let mut cells = cols.to_vec();
    let reserved = rule_type.reserved_sub_columns();
    if reserved > 0 {
        if cells.len() < 2 {
            cells.resize(2, String::new());
        }
        for _ in 0..reserved {
            cells.insert(2, "-".to_string());
        }
    }
    cells.push(String::new());
    cells.push(rule_type.family_marker().to_string());
    cells
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub deleted_rows: u32,
    pub inserted_rows: u32,
    pub processed_blocks: usize,
    pub skipped_rows: usize,
}

/// 删除所有规则块的数据行
///
/// # 返回
/// (删除行数, 处理的规则块数)
pub fn delete_data_rows(sheet: &mut Worksheet) -> (u32, usize) {
    let mut headers = find_block_headers(&*sheet);
    headers.sort_by(|a, b| b.row.cmp(&a.row));

    let mut deleted = 0;
    for header in &headers {
        let (start, end) = data_range(&*sheet, header.row);
        let count = end - start;
        if count == 0 {
            continue;
        }
        debug!(block = %header.name, start, count, "删除规则块数据行");
        sheet.remove_row(&start, &count);
        deleted += count;
    }
    (deleted, headers.len())
}

/// 逐行插入到对应规则块
///
/// # 返回
/// (插入行数, 跳过行数)
pub fn insert_rows(sheet: &mut Worksheet, rows: &[PositionalRow]) -> (u32, usize) {
    let mut inserted = 0;
    let mut skipped = 0;

    for row in rows {
        let rule_type = match row.rule_type() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "跳过未知类型的行");
                skipped += 1;
                continue;
            }
        };

        // 每次插入后行号会变化，表头需要重新定位
        let header = find_block_headers(&*sheet)
            .into_iter()
            .find(|h| h.name.eq_ignore_ascii_case(rule_type.block_name()));
        let header = match header {
            Some(h) => h,
            None => {
                warn!(block = rule_type.block_name(), "找不到对应规则块，跳过该行");
                skipped += 1;
                continue;
            }
        };

        let target = header.row + DATA_ROW_OFFSET;
        let cells = layout_row(rule_type, &row.col_texts());
        sheet.insert_new_row(&target, &1);
        for (i, value) in cells.into_iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .get_cell_mut(((i + 1) as u32, target))
                .set_value_string(value);
        }
        inserted += 1;
    }
    (inserted, skipped)
}

/// 完整的替换流程（删除 + 插入）
pub fn apply_replace(sheet: &mut Worksheet, rows: &[PositionalRow]) -> WriteSummary {
    let (deleted_rows, processed_blocks) = delete_data_rows(sheet);
    let (inserted_rows, skipped_rows) = insert_rows(sheet, rows);
    WriteSummary {
        deleted_rows,
        inserted_rows,
        processed_blocks,
        skipped_rows,
    }
}

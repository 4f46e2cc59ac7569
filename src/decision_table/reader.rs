// ==========================================
// 俱乐部运营平台 - 决策表读取
// ==========================================

use crate::decision_table::error::{DecisionTableError, DecisionTableResult};
use crate::decision_table::grid::{data_range, find_block_headers, CellGrid};
use crate::decision_table::schema::RuleBlockSchema;
use crate::domain::rule::Rule;
use calamine::{open_workbook, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// 一次扫描的结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockScanStatus {
    /// 没有任何 RuleTable 声明
    NoDeclarations,
    /// 有声明但没有数据行
    NoDataRows,
    Found,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOutcome {
    pub blocks_found: usize,
    pub rules: Vec<Rule>,
}

impl ReadOutcome {
    pub fn status(&self) -> BlockScanStatus {
        if self.blocks_found == 0 {
            BlockScanStatus::NoDeclarations
        } else if self.rules.is_empty() {
            BlockScanStatus::NoDataRows
        } else {
            BlockScanStatus::Found
        }
    }
}

/// 解析所有规则块
pub fn read_blocks<G: CellGrid + ?Sized>(grid: &G) -> ReadOutcome {
    let headers = find_block_headers(grid);
    let mut rules = Vec::new();

    for header in &headers {
        let schema = RuleBlockSchema::resolve(grid, header);
        let rule_type = match schema.rule_type {
            Some(t) => t,
            None => {
                warn!(block = %header.name, row = header.row, "未知规则块，跳过其数据行");
                continue;
            }
        };

        let (start, end) = data_range(grid, header.row);
        debug!(
            block = %header.name,
            header_row = header.row,
            start,
            end,
            "读取规则块"
        );
        for row in start..end {
            rules.push(schema.row_to_rule(grid, row, rule_type));
        }
    }

    ReadOutcome {
        blocks_found: headers.len(),
        rules,
    }
}

/// 打开工作簿并读取指定工作表中的规则
pub fn read_workbook(path: &Path, sheet: &str) -> DecisionTableResult<ReadOutcome> {
    if !path.exists() {
        return Err(DecisionTableError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| DecisionTableError::ExcelRead(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(DecisionTableError::WorksheetNotFound {
            sheet: sheet.to_string(),
            available: sheet_names,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| DecisionTableError::ExcelRead(e.to_string()))?;

    let outcome = read_blocks(&range);
    match outcome.status() {
        BlockScanStatus::NoDeclarations => {
            info!(path = %path.display(), sheet, "没有找到 RuleTable 声明")
        }
        BlockScanStatus::NoDataRows => {
            info!(blocks = outcome.blocks_found, "规则块中没有数据行")
        }
        BlockScanStatus::Found => info!(
            blocks = outcome.blocks_found,
            rules = outcome.rules.len(),
            "决策表读取完成"
        ),
    }
    Ok(outcome)
}

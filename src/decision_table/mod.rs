// ==========================================
// 俱乐部运营平台 - 决策表存储层
// ==========================================
// 职责: 读写外部规则引擎使用的 xlsx 决策表
// 结构: 每个 "RuleTable <Name>" 是一个规则块，
//       表头 +4 行为列声明，+5 行起为数据行，直到第一个全空行
// ==========================================

pub mod backup;
pub mod error;
pub mod grid;
pub mod reader;
pub mod schema;
pub mod store;
pub mod writer;

pub use error::{DecisionTableError, DecisionTableResult};
pub use grid::{BlockHeader, CellGrid};
pub use reader::{read_blocks, read_workbook, BlockScanStatus, ReadOutcome};
pub use schema::{ColumnField, RuleBlockSchema};
pub use store::{DecisionTableStore, ReplaceOutcome};
pub use writer::{apply_replace, layout_row, PositionalRow, WriteSummary};

// ==========================================
// 俱乐部运营平台 - 决策表存储
// ==========================================
// 职责: 决策表文档的唯一访问入口
// 并发: 读写锁（单写多读），所有改写串行执行
// 改写顺序:
// 1. 校验文件与工作表（失败则不做任何改动）
// 2. 创建备份
// 3. 内存中删除 + 插入
// 4. 一次性落盘
// 5. 通知规则引擎重新加载（尽力而为）
// ==========================================

use crate::config::{AssignmentConfigReader, ConfigResult};
use crate::decision_table::backup::{create_backup, default_backup_dir};
use crate::decision_table::error::{DecisionTableError, DecisionTableResult};
use crate::decision_table::grid::find_block_headers;
use crate::decision_table::reader::{read_blocks, read_workbook, BlockScanStatus, ReadOutcome};
use crate::decision_table::schema::RuleBlockSchema;
use crate::decision_table::writer::{apply_replace, PositionalRow};
use crate::domain::rule::{Rule, RuleSet};
use crate::rule_engine::RuleEngineClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub backup_path: PathBuf,
    pub deleted_rows: u32,
    pub inserted_rows: u32,
    pub processed_blocks: usize,
    pub skipped_rows: usize,
    pub status: BlockScanStatus,
    pub reloaded: bool,
}

pub struct DecisionTableStore {
    document_path: PathBuf,
    sheet_name: String,
    backup_dir: PathBuf,
    rule_engine: Option<Arc<dyn RuleEngineClient>>,
    lock: RwLock<()>,
}

impl DecisionTableStore {
    pub fn new(document_path: impl Into<PathBuf>, sheet_name: &str) -> Self {
        let document_path = document_path.into();
        let backup_dir = default_backup_dir(&document_path);
        Self {
            document_path,
            sheet_name: sheet_name.to_string(),
            backup_dir,
            rule_engine: None,
            lock: RwLock::new(()),
        }
    }

    pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = backup_dir.into();
        self
    }

    /// 写入成功后用于发送重新加载信号
    pub fn with_rule_engine(mut self, rule_engine: Arc<dyn RuleEngineClient>) -> Self {
        self.rule_engine = Some(rule_engine);
        self
    }

    /// 从配置构造
    pub async fn from_config(config: &dyn AssignmentConfigReader) -> ConfigResult<Self> {
        let path = config.get_decision_table_path().await?;
        let sheet = config.get_decision_table_sheet().await?;
        let mut store = Self::new(path, &sheet);
        if let Some(dir) = config.get_decision_table_backup_dir().await? {
            store = store.with_backup_dir(dir);
        }
        Ok(store)
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    // ==========================================
    // 读取
    // ==========================================

    pub async fn read_rule_blocks(&self) -> DecisionTableResult<ReadOutcome> {
        let _guard = self.lock.read().await;
        read_workbook(&self.document_path, &self.sheet_name)
    }

    pub async fn load_rule_set(&self) -> DecisionTableResult<RuleSet> {
        Ok(RuleSet::new(self.read_rule_blocks().await?.rules))
    }

    // ==========================================
    // 改写
    // ==========================================

    /// 按列写入格式整体替换所有规则块的数据行
    pub async fn replace_rule_blocks(&self, rows: &[PositionalRow]) -> DecisionTableResult<ReplaceOutcome> {
        let _guard = self.lock.write().await;
        let mut book = self.open_for_write()?;
        self.replace_locked(&mut book, rows).await
    }

    /// 按规则对象整体替换
    ///
    /// 每条规则经由其规则块的列结构转换为按列写入的行。
    pub async fn replace_rules(&self, rules: &[Rule]) -> DecisionTableResult<ReplaceOutcome> {
        let _guard = self.lock.write().await;
        let mut book = self.open_for_write()?;
        let rows = self.rows_for_rules(&book, rules)?;
        self.replace_locked(&mut book, &rows).await
    }

    /// 读取-编辑-写回，整个过程持有写锁
    ///
    /// 编辑失败时不做备份，也不修改文档。
    pub async fn edit_rules<F, E>(&self, edit: F) -> Result<ReplaceOutcome, E>
    where
        F: FnOnce(&mut RuleSet) -> Result<(), E>,
        E: From<DecisionTableError>,
    {
        let _guard = self.lock.write().await;
        let mut book = self.open_for_write()?;

        let mut rule_set = RuleSet::new(read_blocks(self.sheet(&book)?).rules);
        edit(&mut rule_set)?;

        let rows = self.rows_for_rules(&book, rule_set.rules())?;
        Ok(self.replace_locked(&mut book, &rows).await?)
    }

    /// 插入是后进先出，因此逆序生成，使文档顺序与规则顺序一致
    fn rows_for_rules(
        &self,
        book: &umya_spreadsheet::Spreadsheet,
        rules: &[Rule],
    ) -> DecisionTableResult<Vec<PositionalRow>> {
        let sheet = self.sheet(book)?;
        let schemas: HashMap<&'static str, RuleBlockSchema> = find_block_headers(sheet)
            .iter()
            .map(|h| RuleBlockSchema::resolve(sheet, h))
            .filter_map(|s| s.rule_type.map(|t| (t.block_name(), s)))
            .collect();

        rules
            .iter()
            .rev()
            .map(|rule| {
                let block = rule.rule_type.block_name();
                schemas
                    .get(block)
                    .map(|schema| PositionalRow::from_rule(schema, rule))
                    .ok_or_else(|| DecisionTableError::BlockNotFound(block.to_string()))
            })
            .collect()
    }

    fn open_for_write(&self) -> DecisionTableResult<umya_spreadsheet::Spreadsheet> {
        if !self.document_path.exists() {
            return Err(DecisionTableError::FileNotFound(
                self.document_path.display().to_string(),
            ));
        }
        let book = umya_spreadsheet::reader::xlsx::read(&self.document_path)
            .map_err(|e| DecisionTableError::ExcelRead(e.to_string()))?;
        self.sheet(&book)?;
        Ok(book)
    }

    fn sheet<'a>(
        &self,
        book: &'a umya_spreadsheet::Spreadsheet,
    ) -> DecisionTableResult<&'a umya_spreadsheet::Worksheet> {
        book.get_sheet_by_name(&self.sheet_name)
            .ok_or_else(|| DecisionTableError::WorksheetNotFound {
                sheet: self.sheet_name.clone(),
                available: book
                    .get_sheet_collection()
                    .iter()
                    .map(|s| s.get_name().to_string())
                    .collect(),
            })
    }

    /// 调用方必须已持有写锁
    async fn replace_locked(
        &self,
        book: &mut umya_spreadsheet::Spreadsheet,
        rows: &[PositionalRow],
    ) -> DecisionTableResult<ReplaceOutcome> {
        let backup_path = create_backup(&self.document_path, &self.backup_dir)?;

        let sheet = book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| DecisionTableError::WorksheetNotFound {
                sheet: self.sheet_name.clone(),
                available: Vec::new(),
            })?;
        let summary = apply_replace(sheet, rows);

        let status = if summary.processed_blocks == 0 {
            BlockScanStatus::NoDeclarations
        } else if summary.deleted_rows == 0 && summary.inserted_rows == 0 {
            BlockScanStatus::NoDataRows
        } else {
            BlockScanStatus::Found
        };

        let written = status == BlockScanStatus::Found;
        if written {
            umya_spreadsheet::writer::xlsx::write(book, &self.document_path)
                .map_err(|e| DecisionTableError::ExcelWrite(e.to_string()))?;
            info!(
                path = %self.document_path.display(),
                deleted_rows = summary.deleted_rows,
                inserted_rows = summary.inserted_rows,
                skipped_rows = summary.skipped_rows,
                backup = %backup_path.display(),
                "决策表已写入"
            );
        } else {
            info!(status = ?status, "决策表没有变化，未写入");
        }

        let reloaded = if written { self.signal_reload().await } else { false };

        Ok(ReplaceOutcome {
            backup_path,
            deleted_rows: summary.deleted_rows,
            inserted_rows: summary.inserted_rows,
            processed_blocks: summary.processed_blocks,
            skipped_rows: summary.skipped_rows,
            status,
            reloaded,
        })
    }

    /// 重新加载失败只记录告警，数据已经落盘
    async fn signal_reload(&self) -> bool {
        let Some(engine) = &self.rule_engine else {
            return false;
        };
        match engine.reload().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "规则引擎重新加载失败，忽略");
                false
            }
        }
    }
}

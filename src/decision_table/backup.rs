// ==========================================
// 俱乐部运营平台 - 决策表备份
// ==========================================
// 命名: <原文件名去掉 .drl.xlsx>_backup_<毫秒时间戳>.drl.xlsx
// 同一毫秒内重名时追加 _1、_2 ...，已有备份永不覆盖
// 不做自动回滚，备份路径返回给调用方用于人工恢复
// ==========================================

use crate::config::defaults::BACKUP_DIR_NAME;
use crate::decision_table::error::{DecisionTableError, DecisionTableResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::info;

const VERSIONED_SUFFIX: &str = ".drl.xlsx";
const MAX_NAME_ATTEMPTS: u32 = 100;

/// 备份文件名
pub fn backup_file_name(document: &Path, timestamp_ms: i64) -> String {
    tagged_file_name(document, &timestamp_ms.to_string())
}

fn tagged_file_name(document: &Path, tag: &str) -> String {
    let file_name = document
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("decision_table.xlsx");

    match file_name.strip_suffix(VERSIONED_SUFFIX) {
        Some(stem) => format!("{}_backup_{}{}", stem, tag, VERSIONED_SUFFIX),
        None => {
            let path = Path::new(file_name);
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
            match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{}_backup_{}.{}", stem, tag, ext),
                None => format!("{}_backup_{}", stem, tag),
            }
        }
    }
}

/// 默认备份目录: 文档同级的 excel_backup
pub fn default_backup_dir(document: &Path) -> PathBuf {
    document
        .parent()
        .map(|p| p.join(BACKUP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME))
}

/// 复制一份带时间戳的备份
pub fn create_backup(document: &Path, backup_dir: &Path) -> DecisionTableResult<PathBuf> {
    create_backup_at(document, backup_dir, chrono::Utc::now().timestamp_millis())
}

fn create_backup_at(
    document: &Path,
    backup_dir: &Path,
    timestamp_ms: i64,
) -> DecisionTableResult<PathBuf> {
    fs::create_dir_all(backup_dir).map_err(|e| {
        DecisionTableError::Backup(format!("无法创建备份目录 {}: {}", backup_dir.display(), e))
    })?;

    let mut source = File::open(document).map_err(|e| {
        DecisionTableError::Backup(format!("无法读取 {}: {}", document.display(), e))
    })?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let tag = match attempt {
            0 => timestamp_ms.to_string(),
            n => format!("{}_{}", timestamp_ms, n),
        };
        let backup_path = backup_dir.join(tagged_file_name(document, &tag));

        let mut target = match OpenOptions::new().write(true).create_new(true).open(&backup_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(DecisionTableError::Backup(format!(
                    "无法创建 {}: {}",
                    backup_path.display(),
                    e
                )))
            }
        };

        if let Err(e) = io::copy(&mut source, &mut target) {
            drop(target);
            let _ = fs::remove_file(&backup_path);
            return Err(DecisionTableError::Backup(format!(
                "无法复制 {} -> {}: {}",
                document.display(),
                backup_path.display(),
                e
            )));
        }

        info!(backup = %backup_path.display(), "已创建决策表备份");
        return Ok(backup_path);
    }

    Err(DecisionTableError::Backup(format!(
        "备份文件名冲突: {} 下已存在 {} 个同一时间戳的备份",
        backup_dir.display(),
        MAX_NAME_ATTEMPTS
    )))
}

// ==========================================
// 俱乐部运营平台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::assignment_config_trait::{AssignmentConfigReader, ConfigResult};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值，格式错误时告警并回落到默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// AssignmentConfigReader Trait 实现
// ==========================================
#[async_trait]
impl AssignmentConfigReader for ConfigManager {
    // ===== 决策表 =====

    async fn get_decision_table_path(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::DECISION_TABLE_PATH, defaults::DECISION_TABLE_PATH)
    }

    async fn get_decision_table_sheet(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::DECISION_TABLE_SHEET, defaults::DECISION_TABLE_SHEET)
    }

    async fn get_decision_table_backup_dir(&self) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::DECISION_TABLE_BACKUP_DIR)?
            .filter(|v| !v.trim().is_empty()))
    }

    async fn get_rule_engine_base_url(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::RULE_ENGINE_BASE_URL, defaults::RULE_ENGINE_BASE_URL)
    }

    // ===== 全职排班 =====

    async fn get_system_employee_id(&self) -> ConfigResult<i64> {
        self.get_parsed_or_default(config_keys::SYSTEM_EMPLOYEE_ID, defaults::SYSTEM_EMPLOYEE_ID)
    }

    async fn get_max_employees_per_shift(&self) -> ConfigResult<usize> {
        let value = self.get_parsed_or_default(
            config_keys::MAX_EMPLOYEES_PER_SHIFT,
            defaults::MAX_EMPLOYEES_PER_SHIFT,
        )?;
        if value == 0 {
            tracing::warn!(
                config_key = config_keys::MAX_EMPLOYEES_PER_SHIFT,
                "配置值必须大于 0，使用默认值"
            );
            return Ok(defaults::MAX_EMPLOYEES_PER_SHIFT);
        }
        Ok(value)
    }

    async fn get_rotate_shift_ids(&self) -> ConfigResult<(i64, i64)> {
        let morning = self.get_parsed_or_default(
            config_keys::ROTATE_MORNING_SHIFT_ID,
            defaults::ROTATE_MORNING_SHIFT_ID,
        )?;
        let evening = self.get_parsed_or_default(
            config_keys::ROTATE_EVENING_SHIFT_ID,
            defaults::ROTATE_EVENING_SHIFT_ID,
        )?;
        Ok((morning, evening))
    }

    async fn get_rotate_exclusive_cutoff(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(
            config_keys::ROTATE_EXCLUSIVE_CUTOFF,
            defaults::ROTATE_EXCLUSIVE_CUTOFF,
        )
    }

    async fn get_random_seed(&self) -> ConfigResult<Option<u64>> {
        let raw = match self.get_config_value(config_keys::RANDOM_SEED)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(None),
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => Ok(Some(seed)),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::RANDOM_SEED,
                    raw_value = %raw,
                    "随机种子格式错误，忽略"
                );
                Ok(None)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 决策表
    pub const DECISION_TABLE_PATH: &str = "decision_table_path";
    pub const DECISION_TABLE_SHEET: &str = "decision_table_sheet";
    pub const DECISION_TABLE_BACKUP_DIR: &str = "decision_table_backup_dir";

    // 外部规则引擎
    pub const RULE_ENGINE_BASE_URL: &str = "rule_engine_base_url";

    // 全职排班
    pub const SYSTEM_EMPLOYEE_ID: &str = "system_employee_id";
    pub const MAX_EMPLOYEES_PER_SHIFT: &str = "max_employees_per_shift";
    pub const ROTATE_MORNING_SHIFT_ID: &str = "rotate_morning_shift_id";
    pub const ROTATE_EVENING_SHIFT_ID: &str = "rotate_evening_shift_id";
    pub const ROTATE_EXCLUSIVE_CUTOFF: &str = "rotate_exclusive_cutoff";
    pub const RANDOM_SEED: &str = "random_seed";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const DECISION_TABLE_PATH: &str = "dtables/drools_decisiontable.drl.xlsx";
    pub const DECISION_TABLE_SHEET: &str = "Sheet1";
    pub const BACKUP_DIR_NAME: &str = "excel_backup";
    pub const RULE_ENGINE_BASE_URL: &str = "http://localhost:8080";
    pub const SYSTEM_EMPLOYEE_ID: i64 = 1;
    pub const MAX_EMPLOYEES_PER_SHIFT: usize = 1;
    pub const ROTATE_MORNING_SHIFT_ID: i64 = 1;
    pub const ROTATE_EVENING_SHIFT_ID: i64 = 2;
    pub const ROTATE_EXCLUSIVE_CUTOFF: usize = 5;
}

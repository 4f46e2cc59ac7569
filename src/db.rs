// ==========================================
// 俱乐部运营平台 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供排班子系统所需的最小 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 建表（幂等）
///
/// 员工/班次/班次实例由其他子系统维护，这里只保证排班所需的列存在。
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            employee_id          INTEGER PRIMARY KEY,
            full_name            TEXT NOT NULL,
            employee_type        TEXT NOT NULL,
            preferred_shift_type TEXT
        );

        CREATE TABLE IF NOT EXISTS shifts (
            shift_id    INTEGER PRIMARY KEY,
            shift_name  TEXT NOT NULL,
            shift_type  TEXT NOT NULL,
            start_hour  INTEGER NOT NULL,
            end_hour    INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shift_date (
            shift_id    INTEGER NOT NULL REFERENCES shifts(shift_id),
            shift_date  TEXT NOT NULL,
            PRIMARY KEY (shift_id, shift_date)
        );

        CREATE TABLE IF NOT EXISTS shift_assignment (
            employee_id       INTEGER NOT NULL REFERENCES employees(employee_id),
            shift_id          INTEGER NOT NULL REFERENCES shifts(shift_id),
            shift_date        TEXT NOT NULL,
            assignment_status TEXT NOT NULL,
            PRIMARY KEY (employee_id, shift_id, shift_date)
        );

        CREATE TABLE IF NOT EXISTS shift_enrollment (
            employee_id       INTEGER NOT NULL REFERENCES employees(employee_id),
            shift_id          INTEGER NOT NULL REFERENCES shifts(shift_id),
            shift_date        TEXT NOT NULL,
            enrollment_status TEXT,
            PRIMARY KEY (employee_id, shift_id, shift_date)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), None);
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}

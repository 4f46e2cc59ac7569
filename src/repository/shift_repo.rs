// ==========================================
// 俱乐部运营平台 - 班次与班次实例仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assignment::WeekWindow;
use crate::domain::employee::{Shift, ShiftDateInstance};
use crate::domain::types::EmploymentType;
use crate::repository::error::{parse_db_date, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ShiftRepository - 班次仓储
// ==========================================
/// 职责: shifts / shift_date 表访问
/// 班次实例由外部周任务生成，这里只读（insert 供种子数据使用）
pub struct ShiftRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert_shift(&self, shift: &Shift) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO shifts (shift_id, shift_name, shift_type, start_hour, end_hour)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                shift.shift_id,
                shift.shift_name,
                shift.shift_type.as_db_str(),
                shift.start_hour,
                shift.end_hour,
            ],
        )?;
        Ok(())
    }

    pub fn insert_instance(&self, instance: &ShiftDateInstance) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO shift_date (shift_id, shift_date) VALUES (?1, ?2)",
            params![instance.shift_id, instance.shift_date.to_string()],
        )?;
        Ok(())
    }

    /// 查询窗口内某类班次的所有实例
    ///
    /// # 返回
    /// 按 (日期, 班次ID) 升序
    pub fn list_instances(
        &self,
        window: &WeekWindow,
        kind: EmploymentType,
    ) -> RepositoryResult<Vec<ShiftDateInstance>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sd.shift_id, sd.shift_date
            FROM shift_date sd
            JOIN shifts s ON s.shift_id = sd.shift_id
            WHERE LOWER(s.shift_type) = LOWER(?1)
              AND sd.shift_date BETWEEN ?2 AND ?3
            ORDER BY sd.shift_date, sd.shift_id
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                kind.as_db_str(),
                window.start.to_string(),
                window.end.to_string()
            ],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut instances = Vec::new();
        for row in rows {
            let (shift_id, raw_date) = row?;
            instances.push(ShiftDateInstance::new(
                shift_id,
                parse_db_date("shift_date", &raw_date)?,
            ));
        }
        Ok(instances)
    }
}

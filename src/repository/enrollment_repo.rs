// ==========================================
// 俱乐部运营平台 - 报名记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assignment::{ShiftEnrollment, SlotKey, WeekWindow};
use crate::domain::types::EnrollmentStatus;
use crate::repository::error::{parse_db_date, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ShiftEnrollmentRepository - 报名记录仓储
// ==========================================
pub struct ShiftEnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftEnrollmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, enrollment: &ShiftEnrollment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO shift_enrollment (employee_id, shift_id, shift_date, enrollment_status)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                enrollment.employee_id,
                enrollment.shift_id,
                enrollment.shift_date.to_string(),
                enrollment.enrollment_status,
            ],
        )?;
        Ok(())
    }

    /// 查询窗口内的全部报名记录
    pub fn list(&self, window: &WeekWindow) -> RepositoryResult<Vec<ShiftEnrollment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT employee_id, shift_id, shift_date, enrollment_status
            FROM shift_enrollment
            WHERE shift_date BETWEEN ?1 AND ?2
            ORDER BY shift_date, shift_id, employee_id
            "#,
        )?;

        let rows = stmt.query_map(
            params![window.start.to_string(), window.end.to_string()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )?;

        let mut enrollments = Vec::new();
        for row in rows {
            let (employee_id, shift_id, raw_date, enrollment_status) = row?;
            enrollments.push(ShiftEnrollment {
                employee_id,
                shift_id,
                shift_date: parse_db_date("shift_date", &raw_date)?,
                enrollment_status,
            });
        }
        Ok(enrollments)
    }

    /// 批量更新报名状态（单事务）
    ///
    /// # 返回
    /// 实际更新的行数
    pub fn update_statuses(&self, updates: &[(SlotKey, EnrollmentStatus)]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut affected = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                UPDATE shift_enrollment SET enrollment_status = ?1
                WHERE employee_id = ?2 AND shift_id = ?3 AND shift_date = ?4
                "#,
            )?;
            for ((employee_id, shift_id, shift_date), status) in updates {
                affected += stmt.execute(params![
                    status.as_str(),
                    employee_id,
                    shift_id,
                    shift_date.to_string(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }
}

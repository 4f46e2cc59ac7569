// ==========================================
// 俱乐部运营平台 - 排班记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 主键: (employee_id, shift_id, shift_date)
// ==========================================

use crate::domain::assignment::{ShiftAssignment, WeekWindow};
use crate::domain::types::EmploymentType;
use crate::repository::error::{parse_db_date, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ShiftAssignmentRepository - 排班记录仓储
// ==========================================
pub struct ShiftAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftAssignmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询窗口内的排班记录
    ///
    /// # 参数
    /// - window: 周窗口（闭区间）
    /// - kind: 班次雇佣类型；None 表示不区分全职/兼职
    pub fn list(
        &self,
        window: &WeekWindow,
        kind: Option<EmploymentType>,
    ) -> RepositoryResult<Vec<ShiftAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sa.employee_id, sa.shift_id, sa.shift_date, sa.assignment_status
            FROM shift_assignment sa
            JOIN shifts s ON s.shift_id = sa.shift_id
            WHERE sa.shift_date BETWEEN ?1 AND ?2
              AND (?3 IS NULL OR LOWER(s.shift_type) = LOWER(?3))
            ORDER BY sa.shift_date, sa.shift_id, sa.employee_id
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                window.start.to_string(),
                window.end.to_string(),
                kind.map(|k| k.as_db_str()),
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let mut assignments = Vec::new();
        for row in rows {
            let (employee_id, shift_id, raw_date, status) = row?;
            assignments.push(ShiftAssignment::new(
                employee_id,
                shift_id,
                parse_db_date("shift_date", &raw_date)?,
                &status,
            ));
        }
        Ok(assignments)
    }

    /// 删除窗口内某类班次的全部排班记录
    ///
    /// # 返回
    /// 删除的行数
    pub fn delete(&self, window: &WeekWindow, kind: EmploymentType) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            r#"
            DELETE FROM shift_assignment
            WHERE shift_date BETWEEN ?1 AND ?2
              AND shift_id IN (SELECT shift_id FROM shifts WHERE LOWER(shift_type) = LOWER(?3))
            "#,
            params![
                window.start.to_string(),
                window.end.to_string(),
                kind.as_db_str()
            ],
        )?;
        Ok(deleted)
    }

    /// 批量写入排班记录（单事务，按主键覆盖）
    pub fn insert_batch(&self, assignments: &[ShiftAssignment]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO shift_assignment (employee_id, shift_id, shift_date, assignment_status)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(employee_id, shift_id, shift_date)
                DO UPDATE SET assignment_status = excluded.assignment_status
                "#,
            )?;
            for a in assignments {
                written += stmt.execute(params![
                    a.employee_id,
                    a.shift_id,
                    a.shift_date.to_string(),
                    a.assignment_status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }
}

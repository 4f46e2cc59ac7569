// ==========================================
// 俱乐部运营平台 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::types::{EmploymentType, ShiftCategory};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
/// 职责: employees 表的读取与 preferred_shift_type 回写
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增员工（种子数据/测试使用）
    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employees (employee_id, full_name, employee_type, preferred_shift_type)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                employee.employee_id,
                employee.full_name,
                employee.employee_type.as_db_str(),
                employee.preferred_shift_type.map(|c| c.as_str()),
            ],
        )?;
        Ok(())
    }

    /// 按雇佣类型查询员工（按 employee_id 升序）
    ///
    /// # 参数
    /// - employee_type: 雇佣类型
    /// - exclude_employee_id: 需要排除的系统账号
    pub fn list_by_type(
        &self,
        employee_type: EmploymentType,
        exclude_employee_id: Option<i64>,
    ) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT employee_id, full_name, employee_type, preferred_shift_type
            FROM employees
            WHERE LOWER(employee_type) = LOWER(?1)
              AND (?2 IS NULL OR employee_id <> ?2)
            ORDER BY employee_id
            "#,
        )?;

        let rows = stmt.query_map(params![employee_type.as_db_str(), exclude_employee_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut employees = Vec::new();
        for row in rows {
            let (employee_id, full_name, kind, preferred) = row?;
            let preferred_shift_type = match preferred.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => match raw.parse::<ShiftCategory>() {
                    Ok(category) => Some(category),
                    Err(e) => {
                        tracing::warn!(employee_id, raw, error = %e, "忽略无法识别的班次类别");
                        None
                    }
                },
            };
            employees.push(Employee {
                employee_id,
                full_name,
                employee_type: EmploymentType::from_db_str(&kind),
                preferred_shift_type,
            });
        }
        Ok(employees)
    }

    /// 批量回写员工的班次类别（单事务）
    pub fn update_preferred_categories(
        &self,
        updates: &[(i64, ShiftCategory)],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut affected = 0;
        {
            let mut stmt = tx.prepare(
                "UPDATE employees SET preferred_shift_type = ?1 WHERE employee_id = ?2",
            )?;
            for (employee_id, category) in updates {
                affected += stmt.execute(params![category.as_str(), employee_id])?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }

    /// 查询单个员工的班次类别
    pub fn find_preferred_category(&self, employee_id: i64) -> RepositoryResult<Option<ShiftCategory>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT preferred_shift_type FROM employees WHERE employee_id = ?1",
                params![employee_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "Employee".to_string(),
                    id: employee_id.to_string(),
                },
                other => other.into(),
            })?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }
}

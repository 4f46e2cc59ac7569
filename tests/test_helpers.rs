// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、种子数据、决策表样例与规则引擎桩
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use club_shift_ops::db::{ensure_schema, open_sqlite_connection};
use club_shift_ops::domain::{
    Employee, EmploymentType, Shift, ShiftAssignment, ShiftDateInstance, ShiftEnrollment,
    WeekWindow,
};
use club_shift_ops::logging;
use club_shift_ops::repository::SqliteShiftGateway;
use club_shift_ops::rule_engine::{PartTimeAssignmentResult, RuleEngineClient, RuleEngineError};
use rusqlite::Connection;
use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 早班/晚班模板ID（与默认配置一致）
pub const MORNING_SHIFT_ID: i64 = 1;
pub const EVENING_SHIFT_ID: i64 = 2;
/// 系统账号
pub const SYSTEM_EMPLOYEE_ID: i64 = 1;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("临时路径不是 UTF-8")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn open_shared(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 测试环境: 临时库 + 网关
pub struct ShiftTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub gateway: Arc<SqliteShiftGateway>,
}

impl ShiftTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let conn = open_shared(&db_path)?;
        let gateway = Arc::new(SqliteShiftGateway::from_connection(conn.clone()));
        Ok(Self {
            _temp_file: temp_file,
            db_path,
            conn,
            gateway,
        })
    }

    pub fn seed_employees(&self, employees: &[Employee]) -> Result<(), Box<dyn Error>> {
        for employee in employees {
            self.gateway.employee_repo.insert(employee)?;
        }
        Ok(())
    }

    /// 早班 + 晚班两个全职模板，再加一个兼职模板
    pub fn seed_shift_templates(&self) -> Result<(), Box<dyn Error>> {
        let templates = [
            (MORNING_SHIFT_ID, "早班", EmploymentType::FullTime, 8, 14),
            (EVENING_SHIFT_ID, "晚班", EmploymentType::FullTime, 14, 22),
            (3, "周末兼职", EmploymentType::PartTime, 10, 18),
        ];
        for (shift_id, name, kind, start_hour, end_hour) in templates {
            self.gateway.shift_repo.insert_shift(&Shift {
                shift_id,
                shift_name: name.to_string(),
                shift_type: kind,
                start_hour,
                end_hour,
            })?;
        }
        Ok(())
    }

    /// 为窗口内每天生成指定模板的实例
    pub fn seed_week_instances(
        &self,
        week: &WeekWindow,
        shift_ids: &[i64],
    ) -> Result<Vec<ShiftDateInstance>, Box<dyn Error>> {
        let mut instances = Vec::new();
        for day in week.days() {
            for shift_id in shift_ids {
                let instance = ShiftDateInstance::new(*shift_id, day);
                self.gateway.shift_repo.insert_instance(&instance)?;
                instances.push(instance);
            }
        }
        Ok(instances)
    }

    pub fn seed_assignments(&self, assignments: &[ShiftAssignment]) -> Result<(), Box<dyn Error>> {
        self.gateway.assignment_repo.insert_batch(assignments)?;
        Ok(())
    }

    pub fn seed_enrollments(&self, enrollments: &[ShiftEnrollment]) -> Result<(), Box<dyn Error>> {
        for enrollment in enrollments {
            self.gateway.enrollment_repo.insert(enrollment)?;
        }
        Ok(())
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("无效日期")
}

// ==========================================
// 决策表样例
// ==========================================

/// 一个规则块的样例定义
pub struct BlockFixture<'a> {
    pub name: &'a str,
    /// 元数据行（从第 3 列开始）
    pub metadata: &'a [&'a str],
    /// 数据行（从第 1 列开始）
    pub rows: &'a [&'a [&'a str]],
}

/// 员工块元数据
pub const EMPLOYEE_METADATA: &[&str] = &[
    "sub:employee",
    "sub:shift",
    "condition:assignedShiftInDay",
    "condition:assignedShiftInWeek",
    "condition:isEligible",
    "condition:isAssigned",
    "action:setEligible",
];

pub const ENROLLMENT_EMPLOYEE_METADATA: &[&str] = &[
    "sub:employee",
    "sub:shift",
    "condition:assignedShiftInDay",
    "condition:assignedShiftInWeek",
    "condition:isEligible",
    "condition:isAssigned",
    "condition:isEnrolled",
    "action:setEligible",
];

pub const SHIFT_METADATA: &[&str] = &[
    "condition:assignedEmployees",
    "condition:isAssignable",
    "action:setAssignable",
];

pub const ENROLLMENT_SHIFT_METADATA: &[&str] = &[
    "condition:assignedEmployees",
    "condition:isAssignable",
    "condition:isEnrolled",
    "action:setAssignable",
];

/// 按顺序写出规则块，块之间空两行
///
/// 每个块: 表头（第 2 列）、表头+4 元数据行、表头+5 起数据行
pub fn write_decision_table(
    path: &Path,
    sheet_name: &str,
    blocks: &[BlockFixture<'_>],
) -> Result<(), Box<dyn Error>> {
    let mut book = umya_spreadsheet::new_file();
    if sheet_name != "Sheet1" {
        let sheet = book.get_sheet_by_name_mut("Sheet1").ok_or("缺少默认工作表")?;
        sheet.set_name(sheet_name);
    }
    let sheet = book.get_sheet_by_name_mut(sheet_name).ok_or("缺少工作表")?;

    sheet.get_cell_mut((1, 1)).set_value("俱乐部排班决策表");
    let mut header_row = 3u32;
    for block in blocks {
        sheet
            .get_cell_mut((2, header_row))
            .set_value(format!("RuleTable {}", block.name));
        sheet.get_cell_mut((2, header_row + 1)).set_value("CONDITION");

        let metadata_row = header_row + 4;
        sheet.get_cell_mut((1, metadata_row)).set_value("说明");
        sheet.get_cell_mut((2, metadata_row)).set_value("规则名称");
        for (i, text) in block.metadata.iter().enumerate() {
            sheet
                .get_cell_mut(((i + 3) as u32, metadata_row))
                .set_value(*text);
        }

        let mut row = header_row + 5;
        for cells in block.rows {
            for (i, text) in cells.iter().enumerate() {
                if !text.is_empty() {
                    sheet.get_cell_mut(((i + 1) as u32, row)).set_value(*text);
                }
            }
            row += 1;
        }
        header_row = row + 2;
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| e.to_string())?;
    Ok(())
}

/// 四个规则块 + 一个排序块的标准样例
pub fn write_standard_decision_table(path: &Path) -> Result<(), Box<dyn Error>> {
    write_decision_table(
        path,
        "Sheet1",
        &[
            BlockFixture {
                name: "EligibleEmployees",
                metadata: EMPLOYEE_METADATA,
                rows: &[
                    &["每天最多一个班", "E-day", "-", "-", "< 1", "", "", "", "true", "", "EmployeeRule"],
                    &["每周最多五个班", "E-week", "-", "-", "", "< 5", "", "", "true", "", "EmployeeRule"],
                ],
            },
            BlockFixture {
                name: "EligibleEnrollmentEmployees",
                metadata: ENROLLMENT_EMPLOYEE_METADATA,
                rows: &[&[
                    "报名优先", "EE-enrolled", "-", "-", "", "", "", "", "true", "true", "", "EnrollmentEmployeeRule",
                ]],
            },
            BlockFixture {
                name: "AssignableShifts",
                metadata: SHIFT_METADATA,
                rows: &[&["每班最多两人", "S-cap", "< 2", "", "true", "", "ShiftRule"]],
            },
            BlockFixture {
                name: "AssignableEnrollmentShifts",
                metadata: ENROLLMENT_SHIFT_METADATA,
                rows: &[],
            },
            BlockFixture {
                name: "SortEmployees",
                metadata: &["condition:priority"],
                rows: &[&["排序", "SORT-1", "1"]],
            },
        ],
    )
}

// ==========================================
// 规则引擎桩
// ==========================================

/// 记录调用次数的规则引擎桩
pub struct RecordingRuleEngine {
    auto_assign_ok: bool,
    reload_ok: bool,
    pub auto_assign_calls: AtomicUsize,
    pub reload_calls: AtomicUsize,
    pub last_sort_option: Mutex<Option<i64>>,
}

impl RecordingRuleEngine {
    pub fn succeeding() -> Self {
        Self::new(true, true)
    }

    pub fn failing() -> Self {
        Self::new(false, false)
    }

    pub fn new(auto_assign_ok: bool, reload_ok: bool) -> Self {
        Self {
            auto_assign_ok,
            reload_ok,
            auto_assign_calls: AtomicUsize::new(0),
            reload_calls: AtomicUsize::new(0),
            last_sort_option: Mutex::new(None),
        }
    }

    pub fn reloads(&self) -> usize {
        self.reload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleEngineClient for RecordingRuleEngine {
    async fn auto_assign(&self, sort_option: i64) -> Result<PartTimeAssignmentResult, RuleEngineError> {
        self.auto_assign_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_sort_option.lock() {
            *last = Some(sort_option);
        }
        if self.auto_assign_ok {
            Ok(PartTimeAssignmentResult {
                total_assignments: 4,
                employees_processed: 3,
                shifts_processed: 2,
                success: true,
                message: "Auto-assignment completed".to_string(),
                sort_option_used: Some(sort_option),
                ..PartTimeAssignmentResult::default()
            })
        } else {
            Err(RuleEngineError::Http("connection refused".to_string()))
        }
    }

    async fn reload(&self) -> Result<(), RuleEngineError> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        if self.reload_ok {
            Ok(())
        } else {
            Err(RuleEngineError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }
}

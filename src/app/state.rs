// ==========================================
// 俱乐部运营平台 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个 SQLite 连接
// ==========================================

use std::sync::{Arc, Mutex};
use rusqlite::Connection;

use crate::api::{AutoAssignmentApi, EnrollmentApi, RuleApi};
use crate::config::config_manager::ConfigManager;
use crate::config::AssignmentConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::decision_table::DecisionTableStore;
use crate::engine::{
    AutoAssignmentOrchestrator, EnrollmentReconciler, FullTimeScheduler, SchedulerSettings,
};
use crate::repository::gateway::{ShiftDataGateway, SqliteShiftGateway};
use crate::rule_engine::{HttpRuleEngineClient, RuleEngineClient};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub config_manager: Arc<ConfigManager>,

    pub gateway: Arc<SqliteShiftGateway>,

    pub decision_table_store: Arc<DecisionTableStore>,

    /// 自动排班API
    pub auto_assignment_api: Arc<AutoAssignmentApi>,

    /// 决策表规则API
    pub rule_api: Arc<RuleApi>,

    /// 报名对账API
    pub enrollment_api: Arc<EnrollmentApi>,
}

impl AppState {
    /// 创建新的AppState实例，规则引擎地址取自配置
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 读取配置
    /// 3. 创建所有Engine与API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let base_url = config_manager
            .get_rule_engine_base_url()
            .await
            .map_err(|e| format!("无法读取规则引擎地址: {}", e))?;
        let rule_engine: Arc<dyn RuleEngineClient> = Arc::new(HttpRuleEngineClient::new(&base_url));

        Self::with_rule_engine(db_path, conn, config_manager, rule_engine).await
    }

    /// 使用指定的规则引擎客户端组装（测试中注入桩实现）
    pub async fn with_rule_engine(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
        config_manager: Arc<ConfigManager>,
        rule_engine: Arc<dyn RuleEngineClient>,
    ) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let gateway = Arc::new(SqliteShiftGateway::from_connection(conn));
        let shared_gateway: Arc<dyn ShiftDataGateway> = gateway.clone();

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let settings = SchedulerSettings::from_config(config_manager.as_ref())
            .await
            .map_err(|e| format!("无法读取排班配置: {}", e))?;
        let scheduler = Arc::new(FullTimeScheduler::new(shared_gateway.clone(), settings));
        let reconciler = Arc::new(EnrollmentReconciler::new(shared_gateway));
        let orchestrator = Arc::new(AutoAssignmentOrchestrator::new(
            scheduler.clone(),
            reconciler.clone(),
            rule_engine.clone(),
        ));

        let decision_table_store = Arc::new(
            DecisionTableStore::from_config(config_manager.as_ref())
                .await
                .map_err(|e| format!("无法读取决策表配置: {}", e))?
                .with_rule_engine(rule_engine),
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let config_reader: Arc<dyn AssignmentConfigReader> = config_manager.clone();
        let auto_assignment_api = Arc::new(AutoAssignmentApi::new(
            orchestrator,
            scheduler,
            config_reader,
        ));
        let rule_api = Arc::new(RuleApi::new(decision_table_store.clone()));
        let enrollment_api = Arc::new(EnrollmentApi::new(reconciler));

        tracing::info!(
            document = %decision_table_store.document_path().display(),
            sheet = decision_table_store.sheet_name(),
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config_manager,
            gateway,
            decision_table_store,
            auto_assignment_api,
            rule_api,
            enrollment_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 CLUB_SHIFT_OPS_DB_PATH，否则放在用户数据目录下
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CLUB_SHIFT_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./club_shift_ops.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("club-shift-ops");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("club_shift_ops.db");
        }
    }

    path.to_string_lossy().to_string()
}

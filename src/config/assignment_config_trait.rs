// ==========================================
// 俱乐部运营平台 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班引擎/决策表存储所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// AssignmentConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 缺失或格式错误的键一律回落到默认值
#[async_trait]
pub trait AssignmentConfigReader: Send + Sync {
    // ===== 决策表 =====

    /// 决策表文档路径
    ///
    /// # 默认值
    /// - dtables/drools_decisiontable.drl.xlsx
    async fn get_decision_table_path(&self) -> ConfigResult<String>;

    /// 规则所在工作表
    ///
    /// # 默认值
    /// - Sheet1
    async fn get_decision_table_sheet(&self) -> ConfigResult<String>;

    /// 备份目录；None 表示使用文档同级的 excel_backup
    async fn get_decision_table_backup_dir(&self) -> ConfigResult<Option<String>>;

    /// 外部规则引擎地址
    ///
    /// # 默认值
    /// - http://localhost:8080
    async fn get_rule_engine_base_url(&self) -> ConfigResult<String>;

    // ===== 全职排班 =====

    /// 不参与全职排班的系统账号
    ///
    /// # 默认值
    /// - 1
    async fn get_system_employee_id(&self) -> ConfigResult<i64>;

    /// 每个班次实例最多分配人数
    ///
    /// # 默认值
    /// - 1
    async fn get_max_employees_per_shift(&self) -> ConfigResult<usize>;

    /// rotate 策略的早班/晚班模板 ID
    ///
    /// # 默认值
    /// - (1, 2)
    async fn get_rotate_shift_ids(&self) -> ConfigResult<(i64, i64)>;

    /// rotate 策略优先使用专属类别员工的实例数
    ///
    /// # 默认值
    /// - 5
    async fn get_rotate_exclusive_cutoff(&self) -> ConfigResult<usize>;

    /// 固定随机种子；None 表示每次运行随机生成
    async fn get_random_seed(&self) -> ConfigResult<Option<u64>>;
}

// ==========================================
// 俱乐部运营平台 - 日志初始化
// ==========================================
// 命令行: 文本输出，RUST_LOG 控制级别
// 定时任务: CLUB_SHIFT_OPS_LOG_JSON 非空时改为 JSON 行
// 测试: debug 级别写入测试输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// 文本日志
///
/// 排班过程按 target 区分模块，例如只看排班引擎:
/// `RUST_LOG=club_shift_ops::engine=debug`
///
/// ```no_run
/// club_shift_ops::logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 日志，每条事件一行
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .init();
}

/// 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

// ==========================================
// 俱乐部运营平台 - 排班命令行入口
// ==========================================
// 用法:
//   club-shift-ops auto-assign <same|rotate|random> <sortOption>
//   club-shift-ops assign-full-time <same|rotate|random> [maxEmployeesPerShift]
//   club-shift-ops reconcile
//   club-shift-ops rules
//   club-shift-ops vocabulary
//   club-shift-ops config <key> [value]
// 环境变量:
//   CLUB_SHIFT_OPS_DB_PATH  数据库路径
//   CLUB_SHIFT_OPS_LOG_JSON 非空时以 JSON 输出日志
// ==========================================

use chrono::Local;
use club_shift_ops::api::AutoAssignmentRequest;
use club_shift_ops::app::{get_default_db_path, AppState};
use club_shift_ops::logging;
use serde::Serialize;

const USAGE: &str = "用法: club-shift-ops <auto-assign <strategy> <sortOption> | assign-full-time <strategy> [max] | reconcile | rules | vocabulary | config <key> [value]>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if std::env::var("CLUB_SHIFT_OPS_LOG_JSON").is_ok_and(|v| !v.trim().is_empty()) {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", club_shift_ops::APP_NAME, club_shift_ops::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).ok_or(USAGE)?;

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).await?;

    match command {
        "auto-assign" => {
            let full_time_option = args.get(1).cloned().ok_or(USAGE)?;
            let part_time_option = match args.get(2) {
                Some(raw) => raw.trim().parse::<i64>()?,
                None => return Err(USAGE.into()),
            };
            let request = AutoAssignmentRequest {
                full_time_option,
                part_time_option,
            };
            let (status, body) = state.auto_assignment_api.perform(&request).await;
            println!("status={}", status);
            print_json(&body)?;
        }
        "assign-full-time" => {
            let strategy = args.get(1).ok_or(USAGE)?;
            let max = match args.get(2) {
                Some(raw) => Some(raw.trim().parse::<usize>()?),
                None => None,
            };
            match state
                .auto_assignment_api
                .assign_full_time_on(strategy, max, Local::now().date_naive())
                .await
            {
                Ok(report) => print_json(&report)?,
                Err(e) => {
                    println!("status={}", e.http_status());
                    print_json(&e.to_body())?;
                    return Err(e.into());
                }
            }
        }
        "reconcile" => {
            let report = state.enrollment_api.reconcile_next_week()?;
            print_json(&report)?;
        }
        "rules" => {
            let rules = state.rule_api.get_rules().await?;
            print_json(&rules)?;
        }
        "vocabulary" => {
            print_json(&state.rule_api.vocabulary())?;
        }
        "config" => {
            let key = args.get(1).ok_or(USAGE)?;
            match args.get(2) {
                Some(value) => {
                    state.config_manager.set_global_config_value(key, value)?;
                    println!("{}={}", key, value);
                }
                None => {
                    let value = state.config_manager.get_global_config_value(key)?;
                    println!("{}={}", key, value.unwrap_or_default());
                }
            }
        }
        other => {
            return Err(format!("未知命令: {}\n{}", other, USAGE).into());
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ==========================================
// 自动排班端到端测试
// ==========================================
// 通过 AppState 组装全部组件，规则引擎替换为录制桩
// 覆盖 201 / 207 / 500 三种结果及全职参数非法的情形
// ==========================================

mod helpers;
mod test_helpers;

use club_shift_ops::api::AutoAssignmentRequest;
use club_shift_ops::app::AppState;
use club_shift_ops::config::ConfigManager;
use club_shift_ops::engine::{next_week, AutoAssignmentStatus};
use club_shift_ops::repository::ShiftDataGateway;
use club_shift_ops::rule_engine::RuleEngineClient;
use helpers::test_data_builder::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use test_helpers::*;

fn today() -> chrono::NaiveDate {
    date(2026, 10, 14)
}

/// 4 名全职员工 + 下周早晚班实例 + 一条下周报名
fn seeded_env() -> ShiftTestEnv {
    let env = ShiftTestEnv::new().unwrap();
    env.seed_employees(&full_time_staff(4)).unwrap();
    env.seed_shift_templates().unwrap();
    env.seed_week_instances(&next_week(today()), &[MORNING_SHIFT_ID, EVENING_SHIFT_ID])
        .unwrap();
    env.seed_enrollments(&[enrollment(2, MORNING_SHIFT_ID, date(2026, 10, 19), None)])
        .unwrap();
    env
}

async fn app_state(env: &ShiftTestEnv, engine: Arc<RecordingRuleEngine>) -> AppState {
    let config = Arc::new(ConfigManager::from_connection(env.conn.clone()).unwrap());
    let engine: Arc<dyn RuleEngineClient> = engine;
    AppState::with_rule_engine(env.db_path.clone(), env.conn.clone(), config, engine)
        .await
        .unwrap()
}

fn request(strategy: &str, sort_option: i64) -> AutoAssignmentRequest {
    AutoAssignmentRequest {
        full_time_option: strategy.to_string(),
        part_time_option: sort_option,
    }
}

#[tokio::test]
async fn test_both_sides_succeed() {
    let env = seeded_env();
    env.set_config("random_seed", "42").unwrap();
    let engine = Arc::new(RecordingRuleEngine::succeeding());
    let state = app_state(&env, engine.clone()).await;

    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("random", 2), today())
        .await;
    assert_eq!(status, 201);

    assert!(outcome.success);
    assert_eq!(outcome.status, AutoAssignmentStatus::Success);

    let part_time = outcome.part_time_result.data.unwrap();
    assert_eq!(part_time.total_assignments, 4);
    assert_eq!(part_time.sort_option_used, Some(2));
    assert_eq!(*engine.last_sort_option.lock().unwrap(), Some(2));

    let full_time = outcome.full_time_result.data.unwrap();
    assert_eq!(full_time.created, 14);
    assert_eq!(full_time.seed, Some(42));

    // 报名对账在排班之后执行
    let reconciliation = outcome.reconciliation.unwrap();
    assert_eq!(reconciliation.total, 1);
    assert_eq!(reconciliation.updated, 1);
    let enrollments = env.gateway.list_enrollments(&next_week(today())).unwrap();
    assert!(enrollments[0].enrollment_status.is_some());
}

#[tokio::test]
async fn test_part_time_failure_is_partial_success() {
    let env = seeded_env();
    let engine = Arc::new(RecordingRuleEngine::failing());
    let state = app_state(&env, engine.clone()).await;

    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("rotate", 1), today())
        .await;
    assert_eq!(status, 207);

    assert!(outcome.success);
    assert_eq!(outcome.status, AutoAssignmentStatus::PartialSuccess);
    assert!(!outcome.part_time_result.success);
    assert!(outcome
        .part_time_result
        .error
        .unwrap()
        .contains("connection refused"));
    assert!(outcome.full_time_result.success);
    assert_eq!(engine.auto_assign_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_full_time_failure_is_partial_success() {
    let env = seeded_env();
    let state = app_state(&env, Arc::new(RecordingRuleEngine::succeeding())).await;

    // 本周没有排班，same 无法复制
    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("same", 1), today())
        .await;
    assert_eq!(status, 207);

    assert!(outcome.success);
    assert!(outcome.part_time_result.success);
    assert!(!outcome.full_time_result.success);
    assert!(outcome.full_time_result.error.is_some());
}

#[tokio::test]
async fn test_both_sides_fail() {
    let env = ShiftTestEnv::new().unwrap();
    let state = app_state(&env, Arc::new(RecordingRuleEngine::failing())).await;

    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("random", 1), today())
        .await;
    assert_eq!(status, 500);

    assert!(!outcome.success);
    assert_eq!(outcome.status, AutoAssignmentStatus::Failure);
    assert!(outcome.reconciliation.is_none());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], "failure");
    assert!(json["partTimeResult"]["error"].is_string());
}

#[tokio::test]
async fn test_unknown_strategy_fails_only_the_full_time_side() {
    let env = seeded_env();
    let engine = Arc::new(RecordingRuleEngine::succeeding());
    let state = app_state(&env, engine.clone()).await;

    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("weekly", 1), today())
        .await;
    assert_eq!(status, 207);
    assert_eq!(outcome.status, AutoAssignmentStatus::PartialSuccess);

    // 兼职侧照常调用规则引擎
    assert_eq!(engine.auto_assign_calls.load(Ordering::SeqCst), 1);
    assert!(outcome.part_time_result.success);

    assert!(!outcome.full_time_result.success);
    assert!(outcome.full_time_result.error.unwrap().contains("weekly"));
    assert!(env
        .gateway
        .list_assignments(&next_week(today()), None)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_strategy_with_failing_rule_engine_is_failure() {
    let env = seeded_env();
    let engine = Arc::new(RecordingRuleEngine::failing());
    let state = app_state(&env, engine.clone()).await;

    let (status, outcome) = state
        .auto_assignment_api
        .perform_on(&request("weekly", 1), today())
        .await;
    assert_eq!(status, 500);
    assert_eq!(outcome.status, AutoAssignmentStatus::Failure);
    assert_eq!(engine.auto_assign_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_max_employees_per_shift_from_config() {
    let env = seeded_env();
    env.set_config("max_employees_per_shift", "2").unwrap();
    let state = app_state(&env, Arc::new(RecordingRuleEngine::succeeding())).await;

    let (_, outcome) = state
        .auto_assignment_api
        .perform_on(&request("random", 0), today())
        .await;
    let full_time = outcome.full_time_result.data.unwrap();
    assert_eq!(full_time.created, 28);
}

#[tokio::test]
async fn test_assign_full_time_only() {
    let env = seeded_env();
    let engine = Arc::new(RecordingRuleEngine::succeeding());
    let state = app_state(&env, engine.clone()).await;
    let api = &state.auto_assignment_api;

    let report = api
        .assign_full_time_on("ROTATE", Some(1), today())
        .await
        .unwrap();
    assert_eq!(report.created, 14);
    assert_eq!(report.categories_updated, 4);
    // 只执行全职排班，不调用规则引擎
    assert_eq!(engine.auto_assign_calls.load(Ordering::SeqCst), 0);

    let err = api.assign_full_time_on("weekly", None, today()).await.unwrap_err();
    assert_eq!(err.http_status(), 400);

    let err = api.assign_full_time_on("random", Some(0), today()).await.unwrap_err();
    assert_eq!(err.http_status(), 400);

    let err = api.assign_full_time_on("same", None, today()).await.unwrap_err();
    assert_eq!(err.http_status(), 409);
}

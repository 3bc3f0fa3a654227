use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{extract::State, Json};
use chrono::Weekday;

use schedule_cell::handlers::{get_schedule, save_schedule};
use schedule_cell::models::ScheduleConfigurationRecord;
use schedule_cell::store::InMemoryScheduleStore;
use schedule_cell::{DayHours, ScheduleService};
use shared_models::error::AppError;

fn service() -> Arc<ScheduleService> {
    Arc::new(ScheduleService::new(Arc::new(InMemoryScheduleStore::new())))
}

fn record(duration: i32, days: Vec<DayHours>) -> ScheduleConfigurationRecord {
    ScheduleConfigurationRecord {
        consult_duration_minutes: duration,
        days,
    }
}

#[tokio::test]
async fn test_get_schedule_before_save_is_not_found() {
    let result = get_schedule(State(service())).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_save_then_get_schedule() {
    let state = service();
    let monday = DayHours::active(Weekday::Mon, "08:00".parse().unwrap(), "12:00".parse().unwrap());

    let Json(saved) = save_schedule(State(state.clone()), Json(record(20, vec![monday])))
        .await
        .unwrap();
    assert_eq!(saved["success"], true);

    let Json(body) = get_schedule(State(state)).await.unwrap();
    assert_eq!(body["consult_duration_minutes"], 20);
    assert_eq!(body["days"][0]["weekday"], "Mon");
    assert_eq!(body["days"][0]["end_time"], "12:00");
}

#[tokio::test]
async fn test_save_rejects_duplicate_weekday() {
    let days = vec![DayHours::inactive(Weekday::Tue), DayHours::inactive(Weekday::Tue)];
    let result = save_schedule(State(service()), Json(record(30, days))).await;
    assert_matches!(result, Err(AppError::Configuration(_)));
}

#[tokio::test]
async fn test_save_rejects_non_positive_duration() {
    let result = save_schedule(State(service()), Json(record(0, vec![]))).await;
    assert_matches!(result, Err(AppError::Configuration(msg)) if msg.contains("positive"));
}

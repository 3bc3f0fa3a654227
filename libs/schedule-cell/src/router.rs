// libs/schedule-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::schedule::ScheduleService;

pub fn schedule_routes(state: Arc<ScheduleService>) -> Router {
    Router::new()
        .route("/", get(handlers::get_schedule).put(handlers::save_schedule))
        .with_state(state)
}

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::{appointment_routes, AppointmentState};
use schedule_cell::{schedule_routes, ScheduleService};

pub fn create_router(schedule: Arc<ScheduleService>, appointments: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Veterinary clinic API is running!" }))
        .nest("/schedule", schedule_routes(schedule))
        .nest("/appointments", appointment_routes(appointments))
}

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{DayHours, ScheduleConfiguration, ScheduleError, SlotTime};
pub use router::schedule_routes;
pub use services::schedule::ScheduleService;
pub use services::slots::{generate, Slots};

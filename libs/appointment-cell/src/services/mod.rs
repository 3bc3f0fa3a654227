pub mod availability;
pub mod lifecycle;
pub mod occupancy;
pub mod past_time;
pub mod reservation;

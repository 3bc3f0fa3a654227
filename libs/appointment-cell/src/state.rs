use std::sync::Arc;

use schedule_cell::ScheduleService;
use shared_utils::Clock;

use crate::services::availability::AvailabilityService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::reservation::ReservationWriter;
use crate::store::AppointmentStore;

/// Services shared by every appointment request.
pub struct AppointmentState {
    pub availability: AvailabilityService,
    pub reservations: ReservationWriter,
    pub lifecycle: AppointmentLifecycleService,
}

impl AppointmentState {
    pub fn new(
        schedule: Arc<ScheduleService>,
        store: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            availability: AvailabilityService::new(Arc::clone(&schedule), Arc::clone(&store), clock),
            reservations: ReservationWriter::new(schedule, Arc::clone(&store)),
            lifecycle: AppointmentLifecycleService::new(store),
        }
    }
}

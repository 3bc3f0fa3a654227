// libs/appointment-cell/src/services/occupancy.rs
use std::collections::HashSet;

use schedule_cell::SlotTime;

use crate::models::Appointment;

/// Times already held by a non-cancelled appointment.
pub fn booked_slots(appointments: &[Appointment]) -> HashSet<SlotTime> {
    appointments
        .iter()
        .filter(|a| a.occupies_slot())
        .map(|a| a.time_of_day)
        .collect()
}

/// Drops booked times, keeping the original order.
pub fn filter<I>(slots: I, booked: &HashSet<SlotTime>) -> Vec<SlotTime>
where
    I: IntoIterator<Item = SlotTime>,
{
    slots.into_iter().filter(|slot| !booked.contains(slot)).collect()
}

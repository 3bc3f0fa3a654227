// libs/appointment-cell/src/services/past_time.rs
use chrono::{NaiveDate, NaiveDateTime};

use schedule_cell::SlotTime;

/// Past dates have no bookable slots at all.
pub fn is_past(query_date: NaiveDate, now: NaiveDateTime) -> bool {
    query_date < now.date()
}

/// Removes slots that have already started relative to `now`.
///
/// Future dates pass through untouched and today keeps only times strictly
/// after `now`.
pub fn filter<I>(slots: I, query_date: NaiveDate, now: NaiveDateTime) -> Vec<SlotTime>
where
    I: IntoIterator<Item = SlotTime>,
{
    if is_past(query_date, now) {
        return Vec::new();
    }

    if query_date == now.date() {
        let current = now.time();
        slots.into_iter().filter(|slot| slot.time() > current).collect()
    } else {
        slots.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hm(raw: &str) -> SlotTime {
        raw.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        today().and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn test_today_drops_elapsed_slots() {
        let kept = filter(vec![hm("14:00"), hm("14:30")], today(), at(14, 5, 0));
        assert_eq!(kept, vec![hm("14:30")]);
    }

    #[test]
    fn test_slot_equal_to_now_is_dropped() {
        let kept = filter(vec![hm("14:00"), hm("14:30")], today(), at(14, 30, 0));
        assert!(kept.is_empty());

        let kept = filter(vec![hm("14:30")], today(), at(14, 29, 59));
        assert_eq!(kept, vec![hm("14:30")]);
    }

    #[test]
    fn test_future_date_is_untouched() {
        let slots = vec![hm("08:00"), hm("23:00")];
        let tomorrow = today().succ_opt().unwrap();
        assert_eq!(filter(slots.clone(), tomorrow, at(23, 59, 0)), slots);
    }

    #[test]
    fn test_past_date_has_no_slots() {
        let yesterday = today().pred_opt().unwrap();
        assert!(filter(vec![hm("08:00")], yesterday, at(0, 1, 0)).is_empty());
        assert!(is_past(yesterday, at(0, 1, 0)));
        assert!(!is_past(today(), at(23, 59, 0)));
    }
}

// libs/doctor-cell/src/services/slots.rs
//
// Hourly slot enumeration over the fixed 08:00-17:00 UTC working day.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::TimeSlot;

pub const WORKING_DAY_START_HOUR: i64 = 8;
pub const WORKING_DAY_END_HOUR: i64 = 17;
pub const SLOT_LENGTH_MINUTES: i64 = 60;

/// `[08:00, 17:00)` of `day`, in UTC.
pub fn working_day(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = day.and_time(NaiveTime::MIN).and_utc();
    (
        midnight + Duration::hours(WORKING_DAY_START_HOUR),
        midnight + Duration::hours(WORKING_DAY_END_HOUR),
    )
}

/// Free slots of one working day. Iterating never consumes it, so the
/// sequence can be walked as many times as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableSlots {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    booked_millis: HashSet<i64>,
}

impl AvailableSlots {
    pub fn iter(&self) -> SlotIter<'_> {
        SlotIter {
            next: self.start,
            slots: self,
        }
    }

    pub fn to_vec(&self) -> Vec<DateTime<Utc>> {
        self.iter().collect()
    }

    pub fn is_free(&self, instant: DateTime<Utc>) -> bool {
        !self.booked_millis.contains(&instant.timestamp_millis())
    }
}

impl<'a> IntoIterator for &'a AvailableSlots {
    type Item = DateTime<Utc>;
    type IntoIter = SlotIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter<'a> {
    next: DateTime<Utc>,
    slots: &'a AvailableSlots,
}

impl Iterator for SlotIter<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.slots.end {
            let slot = self.next;
            self.next = slot + Duration::minutes(SLOT_LENGTH_MINUTES);
            if self.slots.is_free(slot) {
                return Some(slot);
            }
        }
        None
    }
}

/// Hour-aligned starts in `[08:00, 17:00)` of `day` minus the booked instants.
/// A booking only removes the slot whose start it equals to the millisecond.
pub fn available_slots<I>(day: NaiveDate, booked: I) -> AvailableSlots
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let (start, end) = working_day(day);
    AvailableSlots {
        start,
        end,
        booked_millis: booked.into_iter().map(|instant| instant.timestamp_millis()).collect(),
    }
}

/// Every slot of the working day tagged with its availability.
pub fn day_schedule<I>(day: NaiveDate, booked: I) -> Vec<TimeSlot>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let slots = available_slots(day, booked);
    let mut schedule = Vec::new();
    let mut current = slots.start;

    while current < slots.end {
        schedule.push(TimeSlot {
            start: current,
            available: slots.is_free(current),
        });
        current += Duration::minutes(SLOT_LENGTH_MINUTES);
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 18).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 18, hour, minute, 0).unwrap()
    }

    #[test]
    fn nine_slots_when_nothing_is_booked() {
        let slots = available_slots(day(), Vec::new()).to_vec();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots.first(), Some(&at(8, 0)));
        assert_eq!(slots.last(), Some(&at(16, 0)));
    }

    #[test]
    fn excludes_booked_hours_in_ascending_order() {
        let hours: Vec<u32> = available_slots(day(), vec![at(9, 0), at(13, 0)])
            .iter()
            .map(|slot| slot.hour())
            .collect();
        assert_eq!(hours, vec![8, 10, 11, 12, 14, 15, 16]);
    }

    #[test]
    fn each_distinct_booked_hour_removes_one_slot() {
        for k in 0..=9u32 {
            let booked: Vec<_> = (0..k).map(|i| at(8 + i, 0)).collect();
            assert_eq!(available_slots(day(), booked).iter().count(), (9 - k) as usize);
        }
    }

    #[test]
    fn never_leaves_the_working_day() {
        let (start, end) = working_day(day());
        let booked = vec![at(7, 0), at(17, 0), at(23, 0)];
        for slot in &available_slots(day(), booked) {
            assert!(slot >= start && slot < end);
        }
    }

    #[test]
    fn off_the_hour_bookings_do_not_match_slots() {
        let slots = available_slots(day(), vec![at(9, 30)]);
        assert_eq!(slots.iter().count(), 9);
    }

    #[test]
    fn iteration_can_restart() {
        let slots = available_slots(day(), vec![at(12, 0)]);
        let first: Vec<_> = slots.iter().collect();
        let second: Vec<_> = slots.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn schedule_tags_booked_slots() {
        let schedule = day_schedule(day(), vec![at(10, 0)]);
        assert_eq!(schedule.len(), 9);
        let unavailable: Vec<_> = schedule.iter().filter(|s| !s.available).map(|s| s.start).collect();
        assert_eq!(unavailable, vec![at(10, 0)]);
    }
}

/*
Derived views over the alarm collection and small time helpers.
Module is kept free of storage / HTTP so it can be tested on its own
*/

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::models::{Alarm, Weekday};

// One day of the weekly schedule view
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: Weekday,
    pub alarms: Vec<Alarm>,
}

// Canonical order: ascending by "HH:MM" string.
// Lexical compare is correct for zero-padded 24-hour times.
// The sort is stable, so equal times keep their insertion order.
pub fn sort_by_time(alarms: &mut [Alarm]) {
    alarms.sort_by(|a, b| a.time.cmp(&b.time));
}

/// Alarms repeating on `day`, ascending by time.
///
/// Lazy and restartable: call again to iterate a second time. The input is
/// expected to be in canonical order already (the store keeps it that way), so
/// no re-sort happens here.
pub fn alarms_for_day(alarms: &[Alarm], day: Weekday) -> impl Iterator<Item = &Alarm> + Clone {
    alarms.iter().filter(move |a| a.repeats_on(day))
}

// Same projection for a collection of unknown order
pub fn sorted_alarms_for_day(alarms: &[Alarm], day: Weekday) -> Vec<Alarm> {
    let mut out: Vec<Alarm> = alarms.iter().filter(|a| a.repeats_on(day)).cloned().collect();
    sort_by_time(&mut out);
    out
}

// Monday..Sunday, each with its day-filtered alarms
pub fn weekly_schedule(alarms: &[Alarm]) -> Vec<DaySchedule> {
    Weekday::ALL
        .into_iter()
        .map(|day| DaySchedule {
            day,
            alarms: sorted_alarms_for_day(alarms, day),
        })
        .collect()
}

// Parse a zero-padded 24-hour "HH:MM" string.
// chrono alone accepts "7:00", the length check rejects it.
pub fn parse_hhmm(hhmm: &str) -> Option<NaiveTime> {
    if hhmm.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(hhmm, "%H:%M").ok()
}

pub fn is_valid_snooze(duration_min: i64) -> bool {
    (1..=15).contains(&duration_min)
}

// Morning is 05:00 up to (not including) 12:00
pub fn is_morning(time: NaiveTime) -> bool {
    (5..12).contains(&time.hour())
}

// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly class schedule helpers.
//!
//! Weekdays are numbered from Sunday (0) to Saturday (6).

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

/// Something that happens at a fixed start time on one weekday every week.
pub trait Scheduled {
    /// Weekday number, 0 = Sunday.
    fn weekday(&self) -> u32;

    /// Start time as `HH:MM` (a bare hour such as `"14"` is also accepted).
    fn start_time(&self) -> &str;
}

const WEEKDAYS: [(&str, &str); 7] = [
    ("domingo", "sunday"),
    ("segunda-feira", "monday"),
    ("terça-feira", "tuesday"),
    ("quarta-feira", "wednesday"),
    ("quinta-feira", "thursday"),
    ("sexta-feira", "friday"),
    ("sábado", "saturday"),
];

/// Parses a weekday name (Portuguese or English, case-insensitive, the
/// Portuguese "-feira" suffix optional) or a number 0..=6.
pub fn weekday_from_name(name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    if let Ok(n) = wanted.parse::<u32>() {
        return (n < 7).then_some(n);
    }
    WEEKDAYS
        .iter()
        .position(|(pt, en)| {
            *pt == wanted || *en == wanted || pt.strip_suffix("-feira") == Some(wanted.as_str())
        })
        .map(|i| i as u32)
}

/// English name of a weekday number.
pub fn weekday_name(day: u32) -> &'static str {
    WEEKDAYS.get(day as usize).map_or("unknown", |(_, en)| en)
}

/// Minutes since midnight for an `HH:MM` (or bare hour) start time.
pub fn parse_start_time(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M") {
        return Some(time.hour() * 60 + time.minute());
    }
    value.parse::<u32>().ok().filter(|h| *h < 24).map(|h| h * 60)
}

/// Next class after `now`.
///
/// A class later today wins; otherwise the earliest class of the first of the
/// next seven days that has one. Slots with an unparseable start time are
/// ignored.
pub fn next_class<T: Scheduled>(slots: &[T], now: NaiveDateTime) -> Option<&T> {
    let today = now.weekday().num_days_from_sunday();
    let now_minutes = now.hour() * 60 + now.minute();

    let earliest_on = |day: u32, after: Option<u32>| {
        slots
            .iter()
            .filter(|slot| slot.weekday() == day)
            .filter_map(|slot| parse_start_time(slot.start_time()).map(|m| (m, slot)))
            .filter(|(minutes, _)| after.is_none_or(|limit| *minutes > limit))
            .min_by_key(|(minutes, _)| *minutes)
            .map(|(_, slot)| slot)
    };

    if let Some(slot) = earliest_on(today, Some(now_minutes)) {
        return Some(slot);
    }
    (1..=7).find_map(|offset| earliest_on((today + offset) % 7, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Slot {
        day: u32,
        start: &'static str,
        course: &'static str,
    }

    impl Scheduled for Slot {
        fn weekday(&self) -> u32 {
            self.day
        }
        fn start_time(&self) -> &str {
            self.start
        }
    }

    fn slot(day: u32, start: &'static str, course: &'static str) -> Slot {
        Slot { day, start, course }
    }

    // 2025-03-10 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn picks_the_next_class_today() {
        let slots = [
            slot(1, "08:00", "Algorithms"),
            slot(1, "14:30", "Databases"),
            slot(1, "10:00", "Compilers"),
        ];
        let next = next_class(&slots, monday_at(9, 15)).unwrap();
        assert_eq!(next.course, "Compilers");
    }

    #[test]
    fn class_starting_now_is_not_next() {
        let slots = [slot(1, "10:00", "Compilers"), slot(2, "08:00", "Networks")];
        let next = next_class(&slots, monday_at(10, 0)).unwrap();
        assert_eq!(next.course, "Networks");
    }

    #[test]
    fn wraps_around_the_week() {
        let slots = [slot(1, "08:00", "Algorithms"), slot(0, "09:00", "Seminar")];
        let next = next_class(&slots, monday_at(18, 0)).unwrap();
        assert_eq!(next.course, "Seminar");
    }

    #[test]
    fn same_weekday_next_week_when_only_option() {
        let slots = [slot(1, "08:00", "Algorithms")];
        let next = next_class(&slots, monday_at(9, 0)).unwrap();
        assert_eq!(next.course, "Algorithms");
    }

    #[test]
    fn empty_schedule_has_no_next_class() {
        let slots: [Slot; 0] = [];
        assert!(next_class(&slots, monday_at(9, 0)).is_none());
    }

    #[test]
    fn weekday_names_in_both_languages() {
        assert_eq!(weekday_from_name("Segunda-feira"), Some(1));
        assert_eq!(weekday_from_name("quarta"), Some(3));
        assert_eq!(weekday_from_name("Saturday"), Some(6));
        assert_eq!(weekday_from_name("0"), Some(0));
        assert_eq!(weekday_from_name("9"), None);
        assert_eq!(weekday_from_name("someday"), None);
        assert_eq!(weekday_name(5), "friday");
    }

    #[test]
    fn start_times() {
        assert_eq!(parse_start_time("08:30"), Some(510));
        assert_eq!(parse_start_time("14"), Some(840));
        assert_eq!(parse_start_time("later"), None);
    }
}

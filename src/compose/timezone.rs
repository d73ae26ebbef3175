use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// A zone with a fixed whole-hour UTC offset. Daylight saving is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone {
    pub name: &'static str,
    pub offset_hours: i32,
}

/// Zones offered by the test email form, in picker order
pub const TIMEZONES: &[Timezone] = &[
    Timezone { name: "UTC", offset_hours: 0 },
    Timezone { name: "Europe/London", offset_hours: 0 },
    Timezone { name: "Europe/Berlin", offset_hours: 1 },
    Timezone { name: "Asia/Tokyo", offset_hours: 9 },
    Timezone { name: "Australia/Sydney", offset_hours: 10 },
    Timezone { name: "Pacific/Honolulu", offset_hours: -10 },
    Timezone { name: "America/Los_Angeles", offset_hours: -8 },
    Timezone { name: "America/Denver", offset_hours: -7 },
    Timezone { name: "America/Chicago", offset_hours: -6 },
    Timezone { name: "America/New_York", offset_hours: -5 },
];

impl Timezone {
    pub fn lookup(name: &str) -> Option<Timezone> {
        TIMEZONES.iter().copied().find(|tz| tz.name == name.trim())
    }

    /// Position in `TIMEZONES`, used by the picker
    pub fn index_of(name: &str) -> Option<usize> {
        TIMEZONES.iter().position(|tz| tz.name == name.trim())
    }
}

/// Hour of day in UTC for a local `hour` in a zone at `offset` hours
pub fn adjust_hour(hour: u32, offset: i32) -> u32 {
    (hour as i32 - offset).rem_euclid(24) as u32
}

/// Local wall-clock date and time converted to UTC
pub fn to_utc(date: NaiveDate, time: NaiveTime, offset: i32) -> NaiveDateTime {
    NaiveDateTime::new(date, time) - TimeDelta::hours(i64::from(offset))
}

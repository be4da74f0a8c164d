//! Broken-down UTC calendar time and the epoch conversions behind it.

const NANOS_PER_SEC: u64 = 1_000_000_000;
const SECS_PER_DAY: u64 = 86_400;

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Converts days since 1970-01-01 to (year, month, day) using Howard Hinnant's
/// civil_from_days algorithm.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719468; // shift epoch to 0000-03-01
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era [0, 399]
    let y = (yoe as i64) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year [0, 365]
    let mp = (5 * doy + 2) / 153; // month proxy [0, 11]
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if month <= 2 { y + 1 } else { y };
    (year, month, day)
}

/// Reverse of `civil_from_days` (Hinnant's days_from_civil).
fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = if month <= 2 {
        year as i64 - 1
    } else {
        year as i64
    };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32;
    let m = month as u32;
    let d = day as u32;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe as i64 - 719468
}

/// A validated UTC date and time with nanosecond precision.
///
/// This is the bridge between nanoseconds since the epoch and the textual
/// fields of a [`Pattern`](crate::Pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl CivilTime {
    /// Returns `None` if any field is out of range for the Gregorian calendar.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day < 1 || day > days_in_month(year, month) {
            return None;
        }
        if hour > 23 {
            return None;
        }
        if minute > 59 {
            return None;
        }
        if second > 59 {
            return None;
        }
        if nanosecond > 999_999_999 {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }
    pub fn month(&self) -> u8 {
        self.month
    }
    pub fn day(&self) -> u8 {
        self.day
    }
    pub fn hour(&self) -> u8 {
        self.hour
    }
    pub fn minute(&self) -> u8 {
        self.minute
    }
    pub fn second(&self) -> u8 {
        self.second
    }
    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// Milliseconds digit group of the sub-second part (0–999).
    pub fn millisecond(&self) -> u16 {
        (self.nanosecond / 1_000_000) as u16
    }

    /// Microseconds digit group of the sub-second part (0–999).
    pub fn microsecond(&self) -> u16 {
        (self.nanosecond / 1_000 % 1_000) as u16
    }

    /// Nanoseconds digit group of the sub-second part (0–999).
    pub fn nanos_fraction(&self) -> u16 {
        (self.nanosecond % 1_000) as u16
    }

    /// Breaks down a non-negative count of nanoseconds since the Unix epoch.
    pub fn from_epoch_nanos(nanos: u64) -> Self {
        let secs = nanos / NANOS_PER_SEC;
        let day_secs = secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days((secs / SECS_PER_DAY) as i64);

        Self {
            year: year as u16,
            month,
            day,
            hour: (day_secs / 3600) as u8,
            minute: ((day_secs % 3600) / 60) as u8,
            second: (day_secs % 60) as u8,
            nanosecond: (nanos % NANOS_PER_SEC) as u32,
        }
    }

    /// Signed seconds since the Unix epoch; negative before 1970.
    pub fn to_epoch_secs(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day) * SECS_PER_DAY as i64
            + self.hour as i64 * 3600
            + self.minute as i64 * 60
            + self.second as i64
    }

    /// Signed nanoseconds since the Unix epoch. Wide enough for every
    /// representable year.
    pub fn to_epoch_nanos(&self) -> i128 {
        self.to_epoch_secs() as i128 * NANOS_PER_SEC as i128 + self.nanosecond as i128
    }
}

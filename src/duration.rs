use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::error::TimeError;
use crate::pattern::DurationPattern;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

// Variant order gives -inf < finite < +inf under the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Repr {
    NegativeInfinity,
    Finite(i64),
    Infinity,
}

/// A signed span of time with nanosecond resolution.
///
/// Besides finite values, a duration can be one of the two sentinels
/// [`Duration::INFINITY`] and [`Duration::NEGATIVE_INFINITY`]. Finite
/// arithmetic that overflows an `i64` nanosecond count is an error; it never
/// saturates into an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(Repr);

impl Default for Duration {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Duration {
    pub const ZERO: Duration = Duration(Repr::Finite(0));
    pub const INFINITY: Duration = Duration(Repr::Infinity);
    pub const NEGATIVE_INFINITY: Duration = Duration(Repr::NegativeInfinity);

    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(Repr::Finite(nanos))
    }

    fn scaled(value: i64, nanos_per_unit: i64) -> Result<Self, TimeError> {
        value
            .checked_mul(nanos_per_unit)
            .map(Self::from_nanos)
            .ok_or(TimeError::Overflow)
    }

    pub fn from_micros(micros: i64) -> Result<Self, TimeError> {
        Self::scaled(micros, NANOS_PER_MICRO)
    }

    pub fn from_millis(millis: i64) -> Result<Self, TimeError> {
        Self::scaled(millis, NANOS_PER_MILLI)
    }

    pub fn from_secs(secs: i64) -> Result<Self, TimeError> {
        Self::scaled(secs, NANOS_PER_SEC)
    }

    pub fn from_mins(mins: i64) -> Result<Self, TimeError> {
        Self::scaled(mins, NANOS_PER_MIN)
    }

    pub fn from_hours(hours: i64) -> Result<Self, TimeError> {
        Self::scaled(hours, NANOS_PER_HOUR)
    }

    pub fn from_days(days: i64) -> Result<Self, TimeError> {
        Self::scaled(days, NANOS_PER_DAY)
    }

    /// Truncates a float nanosecond count toward zero. Anything outside the
    /// `i64` range, including an infinity produced by float overflow, fails.
    fn truncated(nanos: f64) -> Result<Self, TimeError> {
        if nanos.is_nan() {
            return Err(TimeError::NotANumber);
        }
        // i64::MIN is exactly representable; i64::MAX + 1 is the first float past the range.
        if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&nanos) {
            return Err(TimeError::Overflow);
        }
        Ok(Self::from_nanos(nanos as i64))
    }

    /// Only an infinite `value` yields a sentinel; an overflowing product fails.
    fn scaled_f64(value: f64, nanos_per_unit: i64) -> Result<Self, TimeError> {
        if value == f64::INFINITY {
            return Ok(Self::INFINITY);
        }
        if value == f64::NEG_INFINITY {
            return Ok(Self::NEGATIVE_INFINITY);
        }
        Self::truncated(value * nanos_per_unit as f64)
    }

    /// Builds a duration from a fractional nanosecond count. Fractions are
    /// truncated, not rounded; `±f64::INFINITY` yields the matching sentinel.
    pub fn from_nanos_f64(nanos: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(nanos, 1)
    }

    pub fn from_micros_f64(micros: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(micros, NANOS_PER_MICRO)
    }

    pub fn from_millis_f64(millis: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(millis, NANOS_PER_MILLI)
    }

    pub fn from_secs_f64(secs: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(secs, NANOS_PER_SEC)
    }

    pub fn from_mins_f64(mins: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(mins, NANOS_PER_MIN)
    }

    pub fn from_hours_f64(hours: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(hours, NANOS_PER_HOUR)
    }

    pub fn from_days_f64(days: f64) -> Result<Self, TimeError> {
        Self::scaled_f64(days, NANOS_PER_DAY)
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.0, Repr::Finite(_))
    }

    pub fn is_negative(&self) -> bool {
        match self.0 {
            Repr::NegativeInfinity => true,
            Repr::Finite(n) => n < 0,
            Repr::Infinity => false,
        }
    }

    /// Total nanoseconds, or `None` for the infinite sentinels.
    pub fn nanos_count(&self) -> Option<i64> {
        match self.0 {
            Repr::Finite(n) => Some(n),
            _ => None,
        }
    }

    fn magnitude(&self) -> u64 {
        match self.0 {
            Repr::Finite(n) => n.unsigned_abs(),
            _ => 0,
        }
    }

    // --- Components of the absolute value; zero for infinite durations ---

    /// Nanoseconds digit group (0–999).
    pub fn nanoseconds(&self) -> u16 {
        (self.magnitude() % 1_000) as u16
    }

    /// Microseconds digit group (0–999).
    pub fn microseconds(&self) -> u16 {
        (self.magnitude() / NANOS_PER_MICRO as u64 % 1_000) as u16
    }

    /// Milliseconds digit group (0–999).
    pub fn milliseconds(&self) -> u16 {
        (self.magnitude() / NANOS_PER_MILLI as u64 % 1_000) as u16
    }

    pub fn seconds(&self) -> u8 {
        (self.magnitude() / NANOS_PER_SEC as u64 % 60) as u8
    }

    pub fn minutes(&self) -> u8 {
        (self.magnitude() / NANOS_PER_MIN as u64 % 60) as u8
    }

    pub fn hours(&self) -> u8 {
        (self.magnitude() / NANOS_PER_HOUR as u64 % 24) as u8
    }

    /// Whole days.
    pub fn days(&self) -> u64 {
        self.magnitude() / NANOS_PER_DAY as u64
    }

    // --- Fractional totals; ±inf for infinite durations ---

    fn total_in(&self, nanos_per_unit: i64) -> f64 {
        match self.0 {
            Repr::NegativeInfinity => f64::NEG_INFINITY,
            Repr::Finite(n) => n as f64 / nanos_per_unit as f64,
            Repr::Infinity => f64::INFINITY,
        }
    }

    pub fn total_nanoseconds(&self) -> f64 {
        self.total_in(1)
    }

    pub fn total_microseconds(&self) -> f64 {
        self.total_in(NANOS_PER_MICRO)
    }

    pub fn total_milliseconds(&self) -> f64 {
        self.total_in(NANOS_PER_MILLI)
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_in(NANOS_PER_SEC)
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_in(NANOS_PER_MIN)
    }

    pub fn total_hours(&self) -> f64 {
        self.total_in(NANOS_PER_HOUR)
    }

    pub fn total_days(&self) -> f64 {
        self.total_in(NANOS_PER_DAY)
    }

    // --- Arithmetic ---

    pub fn checked_add(self, rhs: Duration) -> Result<Duration, TimeError> {
        match (self.0, rhs.0) {
            (Repr::Finite(a), Repr::Finite(b)) => a
                .checked_add(b)
                .map(Self::from_nanos)
                .ok_or(TimeError::Overflow),
            (Repr::Infinity, Repr::NegativeInfinity) | (Repr::NegativeInfinity, Repr::Infinity) => {
                Err(TimeError::UndefinedInfinity)
            }
            (Repr::Infinity, _) | (_, Repr::Infinity) => Ok(Self::INFINITY),
            (Repr::NegativeInfinity, _) | (_, Repr::NegativeInfinity) => {
                Ok(Self::NEGATIVE_INFINITY)
            }
        }
    }

    pub fn checked_sub(self, rhs: Duration) -> Result<Duration, TimeError> {
        match (self.0, rhs.0) {
            (Repr::Finite(a), Repr::Finite(b)) => a
                .checked_sub(b)
                .map(Self::from_nanos)
                .ok_or(TimeError::Overflow),
            (Repr::Infinity, Repr::Infinity)
            | (Repr::NegativeInfinity, Repr::NegativeInfinity) => {
                Err(TimeError::UndefinedInfinity)
            }
            (Repr::Infinity, _) | (_, Repr::NegativeInfinity) => Ok(Self::INFINITY),
            (Repr::NegativeInfinity, _) | (_, Repr::Infinity) => Ok(Self::NEGATIVE_INFINITY),
        }
    }

    pub fn checked_neg(self) -> Result<Duration, TimeError> {
        match self.0 {
            Repr::NegativeInfinity => Ok(Self::INFINITY),
            Repr::Finite(n) => n
                .checked_neg()
                .map(Self::from_nanos)
                .ok_or(TimeError::Overflow),
            Repr::Infinity => Ok(Self::NEGATIVE_INFINITY),
        }
    }

    /// Flips the sign of an infinite value when `negative` is set.
    fn infinity_with_sign(self, negative: bool) -> Duration {
        match (self.0, negative) {
            (Repr::Infinity, false) | (Repr::NegativeInfinity, true) => Self::INFINITY,
            _ => Self::NEGATIVE_INFINITY,
        }
    }

    pub fn checked_mul(self, factor: i64) -> Result<Duration, TimeError> {
        match self.0 {
            Repr::Finite(n) => n
                .checked_mul(factor)
                .map(Self::from_nanos)
                .ok_or(TimeError::Overflow),
            _ if factor == 0 => Err(TimeError::UndefinedInfinity),
            _ => Ok(self.infinity_with_sign(factor < 0)),
        }
    }

    /// Multiplies by a float, truncating the result toward zero.
    pub fn checked_mul_f64(self, factor: f64) -> Result<Duration, TimeError> {
        if factor.is_nan() {
            return Err(TimeError::NotANumber);
        }
        match self.0 {
            Repr::Finite(0) if factor.is_infinite() => Err(TimeError::UndefinedInfinity),
            Repr::Finite(n) if factor.is_infinite() => {
                Ok(Self::INFINITY.infinity_with_sign((n < 0) != (factor < 0.0)))
            }
            Repr::Finite(n) => Self::truncated(n as f64 * factor),
            _ if factor == 0.0 => Err(TimeError::UndefinedInfinity),
            _ => Ok(self.infinity_with_sign(factor < 0.0)),
        }
    }

    pub fn checked_div(self, divisor: i64) -> Result<Duration, TimeError> {
        if divisor == 0 {
            return Err(TimeError::DivisionByZero);
        }
        match self.0 {
            Repr::Finite(n) => n
                .checked_div(divisor)
                .map(Self::from_nanos)
                .ok_or(TimeError::Overflow),
            _ => Ok(self.infinity_with_sign(divisor < 0)),
        }
    }

    /// Divides by a float, truncating the result toward zero.
    pub fn checked_div_f64(self, divisor: f64) -> Result<Duration, TimeError> {
        if divisor.is_nan() {
            return Err(TimeError::NotANumber);
        }
        if divisor == 0.0 {
            return Err(TimeError::DivisionByZero);
        }
        match self.0 {
            Repr::Finite(n) => Self::truncated(n as f64 / divisor),
            _ if divisor.is_infinite() => Err(TimeError::UndefinedInfinity),
            _ => Ok(self.infinity_with_sign(divisor < 0.0)),
        }
    }

    /// Renders the duration with a custom pattern. See [`DurationPattern`].
    pub fn format(&self, pattern: &DurationPattern) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = pattern.render(*self, &mut out);
        out
    }
}

impl fmt::Display for Duration {
    /// Renders with the default pattern, e.g. `1428d 21:33:09.123456789`,
    /// `inf` or `-inf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DurationPattern::default().render(*self, f)
    }
}

impl Add for Duration {
    type Output = Duration;

    /// # Panics
    ///
    /// Panics on overflow or when adding opposite infinities. See
    /// [`Duration::checked_add`] for a panic-free version.
    fn add(self, rhs: Duration) -> Duration {
        self.checked_add(rhs)
            .unwrap_or_else(|err| panic!("cannot add durations: {err}"))
    }
}

impl Sub for Duration {
    type Output = Duration;

    /// # Panics
    ///
    /// Panics on overflow or when subtracting equal infinities. See
    /// [`Duration::checked_sub`] for a panic-free version.
    fn sub(self, rhs: Duration) -> Duration {
        self.checked_sub(rhs)
            .unwrap_or_else(|err| panic!("cannot subtract durations: {err}"))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.checked_neg()
            .unwrap_or_else(|err| panic!("cannot negate duration: {err}"))
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, factor: i64) -> Duration {
        self.checked_mul(factor)
            .unwrap_or_else(|err| panic!("cannot multiply duration: {err}"))
    }
}

impl Div<i64> for Duration {
    type Output = Duration;

    fn div(self, divisor: i64) -> Duration {
        self.checked_div(divisor)
            .unwrap_or_else(|err| panic!("cannot divide duration: {err}"))
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = TimeError;

    fn try_from(value: std::time::Duration) -> Result<Self, Self::Error> {
        i64::try_from(value.as_nanos())
            .map(Self::from_nanos)
            .map_err(|_| TimeError::Overflow)
    }
}

impl TryFrom<Duration> for std::time::Duration {
    type Error = TimeError;

    /// Fails for negative and infinite durations.
    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        match value.0 {
            Repr::Finite(n) if n >= 0 => Ok(std::time::Duration::from_nanos(n as u64)),
            _ => Err(TimeError::OutOfRange),
        }
    }
}

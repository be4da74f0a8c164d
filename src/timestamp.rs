use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::civil::CivilTime;
use crate::duration::Duration;
use crate::error::TimeError;
use crate::pattern::Pattern;

/// A UTC point in time with nanosecond resolution.
///
/// Internally a timestamp is the finite, non-negative [`Duration`] elapsed
/// since 1970-01-01T00:00:00Z. Equality, ordering and hashing all follow that
/// duration exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    since_epoch: Duration,
}

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp {
        since_epoch: Duration::ZERO,
    };

    /// Fails with [`TimeError::OutOfRange`] for negative or infinite durations.
    pub fn from_duration_since_epoch(duration: Duration) -> Result<Self, TimeError> {
        match duration.nanos_count() {
            Some(nanos) if nanos >= 0 => Ok(Self {
                since_epoch: duration,
            }),
            _ => {
                tracing::debug!(%duration, "duration rejected as timestamp");
                Err(TimeError::OutOfRange)
            }
        }
    }

    pub fn from_nanos_since_epoch(nanos: i64) -> Result<Self, TimeError> {
        Self::from_duration_since_epoch(Duration::from_nanos(nanos))
    }

    /// Current UTC time from the system clock.
    ///
    /// A clock set before 1970 or past 2262 cannot be represented; in that
    /// case a warning is logged and the epoch is returned.
    pub fn now() -> Self {
        Self::try_from(SystemTime::now()).unwrap_or_else(|err| {
            tracing::warn!(%err, "system clock outside timestamp range, using epoch");
            Self::EPOCH
        })
    }

    pub fn from_civil(civil: &CivilTime) -> Result<Self, TimeError> {
        i64::try_from(civil.to_epoch_nanos())
            .map_err(|_| TimeError::OutOfRange)
            .and_then(Self::from_nanos_since_epoch)
    }

    pub fn to_civil(&self) -> CivilTime {
        CivilTime::from_epoch_nanos(self.nanos_since_epoch() as u64)
    }

    pub fn duration_since_epoch(&self) -> Duration {
        self.since_epoch
    }

    pub fn nanos_since_epoch(&self) -> i64 {
        // Finite by construction.
        self.since_epoch.nanos_count().unwrap_or_default()
    }

    /// Nanoseconds digit group of the sub-second part (0–999).
    pub fn nanoseconds(&self) -> u16 {
        self.since_epoch.nanoseconds()
    }

    /// Microseconds digit group of the sub-second part (0–999).
    pub fn microseconds(&self) -> u16 {
        self.since_epoch.microseconds()
    }

    /// Milliseconds digit group of the sub-second part (0–999).
    pub fn milliseconds(&self) -> u16 {
        self.since_epoch.milliseconds()
    }

    pub fn format(&self, pattern: &Pattern) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = pattern.render(self.nanos_since_epoch(), &mut out);
        out
    }

    /// Compiles `pattern` and renders with it. Only an invalid pattern fails.
    pub fn format_with(&self, pattern: &str) -> Result<String, TimeError> {
        Ok(self.format(&Pattern::new(pattern)?))
    }

    /// Parses the default format, e.g. `2009-02-11T12:53:09.123Z`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        Self::parse_with(s, &Pattern::default())
    }

    pub fn parse_with(s: &str, pattern: &Pattern) -> Result<Self, TimeError> {
        Self::from_nanos_since_epoch(pattern.parse(s)?)
    }

    /// Shifts the timestamp by `duration`. Fails if the duration is infinite
    /// or the result would lie before the epoch or past the representable range.
    pub fn checked_add(self, duration: Duration) -> Result<Self, TimeError> {
        if !duration.is_finite() {
            tracing::debug!(%duration, "cannot shift timestamp by an infinite duration");
            return Err(TimeError::OutOfRange);
        }
        Self::from_duration_since_epoch(self.since_epoch.checked_add(duration)?)
    }

    pub fn checked_sub(self, duration: Duration) -> Result<Self, TimeError> {
        if !duration.is_finite() {
            tracing::debug!(%duration, "cannot shift timestamp by an infinite duration");
            return Err(TimeError::OutOfRange);
        }
        Self::from_duration_since_epoch(self.since_epoch.checked_sub(duration)?)
    }

    /// Signed time elapsed from `earlier` to `self`. Negative if `earlier`
    /// is actually later.
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        // Both sides are in 0..=i64::MAX, so the difference cannot overflow.
        Duration::from_nanos(self.nanos_since_epoch() - earlier.nanos_since_epoch())
    }

    /// Equality against an arbitrary value; values of other types are never equal.
    pub fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Timestamp>() == Some(self)
    }

    /// Three-way comparison against an arbitrary value. Values of other types
    /// compare as [`Ordering::Less`].
    pub fn compare_dyn(&self, other: &dyn Any) -> Ordering {
        match other.downcast_ref::<Timestamp>() {
            Some(other) => self.cmp(other),
            None => Ordering::Less,
        }
    }
}

impl fmt::Display for Timestamp {
    /// ISO-8601 with millisecond precision, e.g. `2009-02-11T12:53:09.123Z`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Pattern::default().render(self.nanos_since_epoch(), f)
    }
}

impl FromStr for Timestamp {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    /// # Panics
    ///
    /// Panics if the result cannot be represented. See
    /// [`Timestamp::checked_add`] for a panic-free version.
    fn add(self, rhs: Duration) -> Timestamp {
        self.checked_add(rhs)
            .unwrap_or_else(|err| panic!("cannot add duration to timestamp: {err}"))
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    /// # Panics
    ///
    /// Panics if the result cannot be represented. See
    /// [`Timestamp::checked_sub`] for a panic-free version.
    fn sub(self, rhs: Duration) -> Timestamp {
        self.checked_sub(rhs)
            .unwrap_or_else(|err| panic!("cannot subtract duration from timestamp: {err}"))
    }
}

impl AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl SubAssign<Duration> for Timestamp {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Timestamp) -> Duration {
        self.duration_since(rhs)
    }
}

impl TryFrom<SystemTime> for Timestamp {
    type Error = TimeError;

    fn try_from(value: SystemTime) -> Result<Self, Self::Error> {
        let elapsed = value
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TimeError::OutOfRange)?;
        let nanos = i64::try_from(elapsed.as_nanos()).map_err(|_| TimeError::OutOfRange)?;
        Self::from_nanos_since_epoch(nanos)
    }
}

impl From<Timestamp> for SystemTime {
    fn from(value: Timestamp) -> Self {
        UNIX_EPOCH + std::time::Duration::from_nanos(value.nanos_since_epoch() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const SAMPLE: i64 = 1_234_356_789_123_456_789;

    fn ts(nanos: i64) -> Timestamp {
        Timestamp::from_nanos_since_epoch(nanos).unwrap()
    }

    fn days(n: i64) -> Timestamp {
        Timestamp::from_duration_since_epoch(Duration::from_days(n).unwrap()).unwrap()
    }

    fn hash_of(t: &Timestamp) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_from_duration_since_epoch() {
        let d = Duration::from_days(123).unwrap();
        assert_eq!(
            Timestamp::from_duration_since_epoch(d).unwrap().duration_since_epoch(),
            d
        );
        assert_eq!(
            Timestamp::from_duration_since_epoch(Duration::INFINITY),
            Err(TimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_duration_since_epoch(Duration::NEGATIVE_INFINITY),
            Err(TimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_duration_since_epoch(Duration::from_days(-1).unwrap()),
            Err(TimeError::OutOfRange)
        );
    }

    #[test]
    fn test_default_is_epoch() {
        assert_eq!(Timestamp::default().nanos_since_epoch(), 0);
        assert_eq!(Timestamp::default(), Timestamp::EPOCH);
    }

    #[test]
    fn test_now() {
        assert!(Timestamp::now().duration_since_epoch().total_seconds() > 1e6);
    }

    #[test]
    fn test_sub_second_groups() {
        let t = ts(123_456_789);
        assert_eq!(t.nanoseconds(), 789);
        assert_eq!(t.microseconds(), 456);
        assert_eq!(t.milliseconds(), 123);
    }

    #[test]
    fn test_parse() {
        let t = Timestamp::parse("2009-02-11T12:53:09.123Z").unwrap();
        assert_eq!(t.nanos_since_epoch(), 1_234_356_789_123_000_000);

        let p = Pattern::new("%Y%m%d%H%M%S%3%6%9").unwrap();
        let t = Timestamp::parse_with("20090211125309123456789", &p).unwrap();
        assert_eq!(t.nanos_since_epoch(), SAMPLE);

        let t: Timestamp = "2009-02-11T12:53:09.123Z".parse().unwrap();
        assert_eq!(t.milliseconds(), 123);
    }

    #[test]
    fn test_format() {
        let t = ts(SAMPLE);
        assert_eq!(t.format(&Pattern::default()), "2009-02-11T12:53:09.123Z");
        assert_eq!(
            t.format_with("%Y%m%d%H%M%S%3%6%9").unwrap(),
            "20090211125309123456789"
        );
        assert!(t.format_with("%Q").is_err());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(ts(SAMPLE).to_string(), "2009-02-11T12:53:09.123Z");
    }

    #[test]
    fn test_civil_round_trip() {
        let ct = ts(SAMPLE).to_civil();
        assert_eq!(ct, CivilTime::new(2009, 2, 11, 12, 53, 9, 123_456_789).unwrap());
        assert_eq!(Timestamp::from_civil(&ct).unwrap(), ts(SAMPLE));

        let before_epoch = CivilTime::new(1969, 12, 31, 23, 59, 59, 0).unwrap();
        assert_eq!(Timestamp::from_civil(&before_epoch), Err(TimeError::OutOfRange));
    }

    #[test]
    fn test_operators() {
        let mut t = Timestamp::default();
        t += Duration::from_nanos(8);
        assert_eq!(t.nanos_since_epoch(), 8);
        assert_eq!(
            t.checked_add(Duration::from_millis(-1).unwrap()),
            Err(TimeError::OutOfRange)
        );
        t -= Duration::from_nanos(1);
        assert_eq!(t.nanos_since_epoch(), 7);
        assert_eq!(
            t.checked_sub(Duration::from_millis(1).unwrap()),
            Err(TimeError::OutOfRange)
        );

        assert_eq!((t + Duration::from_nanos(5)).nanos_since_epoch(), 12);
        assert_eq!((t - Duration::from_nanos(2)).nanos_since_epoch(), 5);
        assert_eq!((t - ts(3)).nanos_count(), Some(4));
        assert_eq!((ts(3) - t).nanos_count(), Some(-4));
        assert_eq!(t.nanos_since_epoch(), 7);
    }

    #[test]
    fn test_shift_by_infinity_fails() {
        let t = ts(7);
        assert_eq!(t.checked_add(Duration::INFINITY), Err(TimeError::OutOfRange));
        assert_eq!(
            t.checked_sub(Duration::NEGATIVE_INFINITY),
            Err(TimeError::OutOfRange)
        );
    }

    #[test]
    fn test_shift_past_range_fails() {
        let t = ts(i64::MAX);
        assert_eq!(t.checked_add(Duration::from_nanos(1)), Err(TimeError::Overflow));
        assert!(t.checked_add(Duration::from_nanos(1)).unwrap_err().is_arithmetic());
    }

    #[test]
    #[should_panic(expected = "cannot add duration to timestamp")]
    fn test_add_assign_panics_below_epoch() {
        let mut t = ts(8);
        t += Duration::from_millis(-1).unwrap();
    }

    #[test]
    #[should_panic(expected = "cannot subtract duration from timestamp")]
    fn test_sub_panics_below_epoch() {
        let _ = ts(7) - Duration::from_millis(1).unwrap();
    }

    #[test]
    #[should_panic(expected = "cannot subtract duration from timestamp")]
    fn test_sub_assign_panics_below_epoch() {
        let mut t = ts(7);
        t -= Duration::from_millis(1).unwrap();
    }

    #[test]
    fn test_equality() {
        assert_eq!(ts(7), ts(7));
        assert_ne!(ts(7), ts(8));
        assert_eq!(days(1), days(1));
        assert_ne!(days(1), days(2));
    }

    #[test]
    fn test_ordering() {
        assert!(days(2) < days(3));
        assert!(!(days(3) < days(2)));
        assert!(!(days(3) < days(3)));

        assert!(!(days(2) > days(3)));
        assert!(days(3) > days(2));
        assert!(!(days(3) > days(3)));

        assert!(days(2) <= days(3));
        assert!(!(days(3) <= days(2)));
        assert!(days(3) <= days(3));

        assert!(!(days(2) >= days(3)));
        assert!(days(3) >= days(2));
        assert!(days(3) >= days(3));
    }

    #[test]
    fn test_eq_dyn() {
        assert!(days(1).eq_dyn(&days(1)));
        assert!(!days(1).eq_dyn(&days(2)));
        assert!(!days(1).eq_dyn(&""));
        assert!(!days(1).eq_dyn(&Duration::from_days(1).unwrap()));
    }

    #[test]
    fn test_compare_dyn() {
        assert_eq!(days(1).compare_dyn(&""), Ordering::Less);
        assert_eq!(days(1).compare_dyn(&days(2)), Ordering::Less);
        assert_eq!(days(1).compare_dyn(&days(1)), Ordering::Equal);
        assert_eq!(days(2).compare_dyn(&days(1)), Ordering::Greater);
    }

    #[test]
    fn test_hash() {
        assert_eq!(hash_of(&days(1)), hash_of(&days(1)));
        assert_ne!(hash_of(&days(1)), hash_of(&days(2)));
    }

    #[test]
    fn test_system_time_interop() {
        let t = ts(SAMPLE);
        let st = SystemTime::from(t);
        assert_eq!(Timestamp::try_from(st).unwrap(), t);

        let before_epoch = UNIX_EPOCH - std::time::Duration::from_secs(1);
        assert_eq!(Timestamp::try_from(before_epoch), Err(TimeError::OutOfRange));
    }
}

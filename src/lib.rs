//! Nanosecond-resolution UTC timestamps and signed durations.
//!
//! [`Duration`] is a signed span of time counted in nanoseconds, with
//! [`Duration::INFINITY`] and [`Duration::NEGATIVE_INFINITY`] sentinels.
//! [`Timestamp`] is the finite, non-negative [`Duration`] elapsed since
//! 1970-01-01T00:00:00Z. Both are small `Copy` values; every operation returns
//! a new value.
//!
//! ```
//! use nanostamp::{Duration, Pattern, Timestamp};
//!
//! let t = Timestamp::parse("2009-02-11T12:53:09.123Z").unwrap();
//! assert_eq!(t.nanos_since_epoch(), 1_234_356_789_123_000_000);
//!
//! let later = t + Duration::from_nanos(456_789);
//! assert_eq!(later.to_string(), "2009-02-11T12:53:09.123Z");
//! assert_eq!(later.format_with("%T.%3%6%9").unwrap(), "12:53:09.123456789");
//! assert_eq!(later - t, Duration::from_nanos(456_789));
//!
//! // Nothing may move a timestamp before the epoch.
//! assert!(Timestamp::EPOCH.checked_sub(Duration::from_nanos(1)).is_err());
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Timestamp`] and [`Duration`].

mod civil;
mod duration;
mod error;
mod pattern;
#[cfg(feature = "serde")]
mod serde_impl;
mod timestamp;

pub use civil::CivilTime;
pub use duration::Duration;
pub use error::TimeError;
pub use pattern::{
    DurationPattern, Pattern, DEFAULT_DURATION_PATTERN, DEFAULT_INFINITY_PATTERN,
    DEFAULT_TIMESTAMP_PATTERN, PRECISE_TIMESTAMP_PATTERN,
};
pub use timestamp::Timestamp;

//! `serde` support, enabled with the `serde` feature.
//!
//! Timestamps are written as RFC 3339 strings with nanosecond precision and
//! read back from either that form or the default millisecond form.
//! Durations are written as a nanosecond count, or `"inf"` / `"-inf"`.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::duration::Duration;
use crate::pattern::{Pattern, PRECISE_TIMESTAMP_PATTERN};
use crate::timestamp::Timestamp;

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self
            .format_with(PRECISE_TIMESTAMP_PATTERN)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a UTC timestamp such as 2009-02-11T12:53:09.123456789Z")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let precise = Pattern::new(PRECISE_TIMESTAMP_PATTERN).map_err(E::custom)?;
        Timestamp::parse_with(value, &precise)
            .or_else(|_| Timestamp::parse(value))
            .map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.nanos_count() {
            Some(nanos) => serializer.serialize_i64(nanos),
            None if self.is_negative() => serializer.serialize_str("-inf"),
            None => serializer.serialize_str("inf"),
        }
    }
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a nanosecond count, \"inf\" or \"-inf\"")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Duration::from_nanos(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map(Duration::from_nanos)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match value {
            "inf" => Ok(Duration::INFINITY),
            "-inf" => Ok(Duration::NEGATIVE_INFINITY),
            _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

//! Text patterns for rendering and parsing timestamps and durations.
//!
//! A pattern is literal text with `%`-placeholders. Timestamp patterns
//! ([`Pattern`]) understand:
//!
//! | placeholder | meaning |
//! |-------------|---------|
//! | `%Y` | four digit year |
//! | `%m` | month, 01 to 12 |
//! | `%d` | day of the month, 01 to 31 |
//! | `%F` | `%Y-%m-%d` |
//! | `%H` | hour, 00 to 23 |
//! | `%M` | minute, 00 to 59 |
//! | `%S` | second, 00 to 59 |
//! | `%T` | `%H:%M:%S` |
//! | `%3` | milliseconds digit group, 000 to 999 |
//! | `%6` | microseconds digit group, 000 to 999 |
//! | `%9` | nanoseconds digit group, 000 to 999 |
//! | `%%` | a literal `%` |
//!
//! Duration patterns ([`DurationPattern`]) use `%d` for the total number of
//! days instead, and add `%+` (always a sign), `%-` (a minus sign for
//! negative values only) and `%D` (`<days>d ` only when there is at least one
//! day). Infinite durations are rendered with a second pattern that only
//! knows `%+`, `%-` and `%%`.
//!
//! Sub-second groups are truncated, never rounded.

use std::fmt;
use std::str::FromStr;

use crate::civil::CivilTime;
use crate::duration::Duration;
use crate::error::TimeError;

/// `2009-02-11T12:53:09.123Z`
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%FT%T.%3Z";

/// `2009-02-11T12:53:09.123456789Z`, used where a lossless text form is needed.
pub const PRECISE_TIMESTAMP_PATTERN: &str = "%FT%T.%3%6%9Z";

/// `1428d 21:33:09.123456789`
pub const DEFAULT_DURATION_PATTERN: &str = "%-%dd %T.%3%6%9";

/// `inf` / `-inf`
pub const DEFAULT_INFINITY_PATTERN: &str = "%-inf";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Micros,
    Nanos,
    Sign,
    NegativeSign,
    TotalDays,
    NonZeroDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Timestamp,
    Duration,
    Infinity,
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

/// Expands one placeholder character into tokens. Returns false if the
/// placeholder is not valid for `kind`.
fn expand(kind: Kind, placeholder: char, tokens: &mut Vec<Token>) -> bool {
    match (kind, placeholder) {
        (_, '%') => push_literal(tokens, "%"),
        (Kind::Timestamp | Kind::Duration, 'H') => tokens.push(Token::Hour),
        (Kind::Timestamp | Kind::Duration, 'M') => tokens.push(Token::Minute),
        (Kind::Timestamp | Kind::Duration, 'S') => tokens.push(Token::Second),
        (Kind::Timestamp | Kind::Duration, 'T') => {
            tokens.push(Token::Hour);
            push_literal(tokens, ":");
            tokens.push(Token::Minute);
            push_literal(tokens, ":");
            tokens.push(Token::Second);
        }
        (Kind::Timestamp | Kind::Duration, '3') => tokens.push(Token::Millis),
        (Kind::Timestamp | Kind::Duration, '6') => tokens.push(Token::Micros),
        (Kind::Timestamp | Kind::Duration, '9') => tokens.push(Token::Nanos),
        (Kind::Timestamp, 'Y') => tokens.push(Token::Year),
        (Kind::Timestamp, 'm') => tokens.push(Token::Month),
        (Kind::Timestamp, 'd') => tokens.push(Token::Day),
        (Kind::Timestamp, 'F') => {
            tokens.push(Token::Year);
            push_literal(tokens, "-");
            tokens.push(Token::Month);
            push_literal(tokens, "-");
            tokens.push(Token::Day);
        }
        (Kind::Duration, 'd') => tokens.push(Token::TotalDays),
        (Kind::Duration, 'D') => tokens.push(Token::NonZeroDays),
        (Kind::Duration | Kind::Infinity, '+') => tokens.push(Token::Sign),
        (Kind::Duration | Kind::Infinity, '-') => tokens.push(Token::NegativeSign),
        _ => return false,
    }
    true
}

fn compile(kind: Kind, pattern: &str) -> Result<Vec<Token>, TimeError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '%' {
            push_literal(&mut tokens, c.encode_utf8(&mut buf));
            continue;
        }
        let Some(placeholder) = chars.next() else {
            tracing::debug!(pattern, "time pattern ends with a lone '%'");
            return Err(TimeError::invalid_pattern(pattern, "pattern ends with '%'"));
        };
        if !expand(kind, placeholder, &mut tokens) {
            tracing::debug!(pattern, %placeholder, "unknown placeholder in time pattern");
            return Err(TimeError::invalid_pattern(
                pattern,
                format!("unknown placeholder '%{placeholder}'"),
            ));
        }
    }

    Ok(tokens)
}

/// Compiles one of the crate's own pattern constants, which are always valid.
fn compile_builtin(kind: Kind, pattern: &str) -> Vec<Token> {
    compile(kind, pattern).unwrap_or_default()
}

/// A compiled timestamp pattern.
///
/// ```
/// use nanostamp::{Pattern, Timestamp};
///
/// let pattern = Pattern::new("%Y%m%d%H%M%S%3%6%9").unwrap();
/// let t = Timestamp::parse_with("20090211125309123456789", &pattern).unwrap();
/// assert_eq!(t.nanos_since_epoch(), 1_234_356_789_123_456_789);
/// assert_eq!(t.format(&pattern), "20090211125309123456789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, TimeError> {
        Ok(Self {
            source: pattern.to_string(),
            tokens: compile(Kind::Timestamp, pattern)?,
        })
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn render<W: fmt::Write>(&self, nanos_since_epoch: i64, out: &mut W) -> fmt::Result {
        // Timestamps are never negative.
        let ct = CivilTime::from_epoch_nanos(nanos_since_epoch.max(0) as u64);

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.write_str(text)?,
                Token::Year => write!(out, "{:04}", ct.year())?,
                Token::Month => write!(out, "{:02}", ct.month())?,
                Token::Day => write!(out, "{:02}", ct.day())?,
                Token::Hour => write!(out, "{:02}", ct.hour())?,
                Token::Minute => write!(out, "{:02}", ct.minute())?,
                Token::Second => write!(out, "{:02}", ct.second())?,
                Token::Millis => write!(out, "{:03}", ct.millisecond())?,
                Token::Micros => write!(out, "{:03}", ct.microsecond())?,
                Token::Nanos => write!(out, "{:03}", ct.nanos_fraction())?,
                // Duration-only tokens are rejected when compiling.
                Token::Sign | Token::NegativeSign | Token::TotalDays | Token::NonZeroDays => {}
            }
        }
        Ok(())
    }

    /// Parses `input` into nanoseconds since the epoch.
    pub(crate) fn parse(&self, input: &str) -> Result<i64, TimeError> {
        let mut cursor = Cursor { input, pos: 0 };
        let (mut year, mut month, mut day) = (1970u16, 1u8, 1u8);
        let (mut hour, mut minute, mut second) = (0u8, 0u8, 0u8);
        let (mut millis, mut micros, mut nanos) = (0u32, 0u32, 0u32);

        for token in &self.tokens {
            match token {
                Token::Literal(text) => cursor.expect_literal(text)?,
                Token::Year => year = cursor.number(4, 0, 9999)? as u16,
                Token::Month => month = cursor.number(2, 1, 12)? as u8,
                Token::Day => day = cursor.number(2, 1, 31)? as u8,
                Token::Hour => hour = cursor.number(2, 0, 23)? as u8,
                Token::Minute => minute = cursor.number(2, 0, 59)? as u8,
                Token::Second => second = cursor.number(2, 0, 59)? as u8,
                Token::Millis => millis = cursor.number(3, 0, 999)?,
                Token::Micros => micros = cursor.number(3, 0, 999)?,
                Token::Nanos => nanos = cursor.number(3, 0, 999)?,
                Token::Sign | Token::NegativeSign | Token::TotalDays | Token::NonZeroDays => {}
            }
        }
        cursor.expect_end()?;

        let nanosecond = millis * 1_000_000 + micros * 1_000 + nanos;
        let ct = CivilTime::new(year, month, day, hour, minute, second, nanosecond)
            .ok_or_else(|| cursor.error(format!("{year:04}-{month:02}-{day:02} is not a valid date")))?;

        i64::try_from(ct.to_epoch_nanos())
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| {
                tracing::debug!(input, "parsed time lies outside the timestamp range");
                TimeError::OutOfRange
            })
    }
}

impl Default for Pattern {
    /// The pattern for [`DEFAULT_TIMESTAMP_PATTERN`].
    fn default() -> Self {
        Self {
            source: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            tokens: compile_builtin(Kind::Timestamp, DEFAULT_TIMESTAMP_PATTERN),
        }
    }
}

impl FromStr for Pattern {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn error(&self, reason: impl Into<String>) -> TimeError {
        let err = TimeError::parse(self.input, reason);
        tracing::debug!(%err, "time parsing failed");
        err
    }

    fn rest(&self) -> &[u8] {
        &self.input.as_bytes()[self.pos..]
    }

    fn expect_literal(&mut self, text: &str) -> Result<(), TimeError> {
        if self.rest().starts_with(text.as_bytes()) {
            self.pos += text.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{text}' at offset {}", self.pos)))
        }
    }

    /// Reads exactly `width` ASCII digits and checks the value range.
    fn number(&mut self, width: usize, min: u32, max: u32) -> Result<u32, TimeError> {
        let digits = self.rest().get(..width).unwrap_or_default();
        if digits.len() < width || !digits.iter().all(u8::is_ascii_digit) {
            return Err(self.error(format!("expected {width} digits at offset {}", self.pos)));
        }

        let value = digits
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
        if value < min || value > max {
            return Err(self.error(format!(
                "{value} at offset {} is outside {min}..={max}",
                self.pos
            )));
        }

        self.pos += width;
        Ok(value)
    }

    fn expect_end(&self) -> Result<(), TimeError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.error(format!("unexpected trailing text at offset {}", self.pos)))
        }
    }
}

/// A compiled pair of duration patterns: one for finite values and one for
/// the infinite sentinels.
///
/// ```
/// use nanostamp::{Duration, DurationPattern};
///
/// let pattern = DurationPattern::new("%S").unwrap().with_infinity("%+bla").unwrap();
/// assert_eq!(Duration::from_nanos(123_456_789_123_456_789).format(&pattern), "09");
/// assert_eq!(Duration::INFINITY.format(&pattern), "+bla");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationPattern {
    finite: Vec<Token>,
    infinite: Vec<Token>,
}

impl DurationPattern {
    /// Compiles the pattern for finite values. Infinite values keep
    /// [`DEFAULT_INFINITY_PATTERN`].
    pub fn new(pattern: &str) -> Result<Self, TimeError> {
        Ok(Self {
            finite: compile(Kind::Duration, pattern)?,
            infinite: default_infinity_tokens(),
        })
    }

    /// Replaces the pattern used for infinite values.
    pub fn with_infinity(mut self, pattern: &str) -> Result<Self, TimeError> {
        self.infinite = compile(Kind::Infinity, pattern)?;
        Ok(self)
    }

    pub(crate) fn render<W: fmt::Write>(&self, value: Duration, out: &mut W) -> fmt::Result {
        let negative = value.is_negative();
        let tokens = if value.is_finite() {
            &self.finite
        } else {
            &self.infinite
        };

        for token in tokens {
            match token {
                Token::Literal(text) => out.write_str(text)?,
                Token::Sign => out.write_char(if negative { '-' } else { '+' })?,
                Token::NegativeSign if negative => out.write_char('-')?,
                Token::NegativeSign => {}
                Token::TotalDays => write!(out, "{}", value.days())?,
                Token::NonZeroDays if value.days() > 0 => write!(out, "{}d ", value.days())?,
                Token::NonZeroDays => {}
                Token::Hour => write!(out, "{:02}", value.hours())?,
                Token::Minute => write!(out, "{:02}", value.minutes())?,
                Token::Second => write!(out, "{:02}", value.seconds())?,
                Token::Millis => write!(out, "{:03}", value.milliseconds())?,
                Token::Micros => write!(out, "{:03}", value.microseconds())?,
                Token::Nanos => write!(out, "{:03}", value.nanoseconds())?,
                // Calendar tokens are rejected when compiling.
                Token::Year | Token::Month | Token::Day => {}
            }
        }
        Ok(())
    }
}

fn default_infinity_tokens() -> Vec<Token> {
    compile_builtin(Kind::Infinity, DEFAULT_INFINITY_PATTERN)
}

impl Default for DurationPattern {
    /// [`DEFAULT_DURATION_PATTERN`] with [`DEFAULT_INFINITY_PATTERN`].
    fn default() -> Self {
        Self {
            finite: compile_builtin(Kind::Duration, DEFAULT_DURATION_PATTERN),
            infinite: default_infinity_tokens(),
        }
    }
}

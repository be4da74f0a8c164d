//! Error type shared by durations, timestamps and patterns.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    // Arithmetic and range errors
    #[error("Value out of range for a timestamp")]
    OutOfRange,

    #[error("Nanosecond count overflowed")]
    Overflow,

    #[error("Operation on infinite durations has no defined result")]
    UndefinedInfinity,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Argument is not a number")]
    NotANumber,

    // Pattern errors
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl TimeError {
    /// True for the arithmetic/range family of errors.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TimeError::OutOfRange
                | TimeError::Overflow
                | TimeError::UndefinedInfinity
                | TimeError::DivisionByZero
                | TimeError::NotANumber
        )
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        TimeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        TimeError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_family() {
        assert!(TimeError::OutOfRange.is_arithmetic());
        assert!(TimeError::Overflow.is_arithmetic());
        assert!(TimeError::UndefinedInfinity.is_arithmetic());
        assert!(TimeError::DivisionByZero.is_arithmetic());
        assert!(TimeError::NotANumber.is_arithmetic());
        assert!(!TimeError::invalid_pattern("%q", "unknown placeholder").is_arithmetic());
        assert!(!TimeError::parse("x", "expected digit").is_arithmetic());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            TimeError::invalid_pattern("%q", "unknown placeholder '%q'").to_string(),
            "Invalid pattern '%q': unknown placeholder '%q'"
        );
        assert_eq!(
            TimeError::parse("20x9", "expected digit at offset 2").to_string(),
            "Cannot parse '20x9': expected digit at offset 2"
        );
    }
}

use crate::cell::Field;
use thiserror::Error;

/// Crate specific Errors implementation.
///
/// Every variant is raised while parsing or validating a schedule,
/// iteration over a valid schedule never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronError {
    /// Expression has less than five fields.
    #[error("invalid length detected in cron syntax: \"{input}\" has length {length} (5 or 6 expected)")]
    InvalidLength {
        /// Whole input as it was provided.
        input: String,
        /// Number of fields found in the expression.
        length: usize,
    },
    /// One of the time fields matches no known pattern.
    #[error("invalid token detected in cron syntax: {0}")]
    InvalidToken(String),
    /// Syntactically correct field contains out of range value or zero step.
    #[error("invalid value for {field} ({cell})")]
    InvalidValue {
        /// Field which holds the value.
        field: Field,
        /// Rendered cell with the offending value.
        cell: String,
    },
    /// Day of month can't be reached in any of the scheduled months.
    #[error("invalid day of month ({day_of_month}) for given month(s) ({month})")]
    InvalidDayOfMonth {
        /// Rendered day of month cell.
        day_of_month: String,
        /// Rendered month cell.
        month: String,
    },
}

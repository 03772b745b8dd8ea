//! Cron expressions parser and lazy generator of the matching timestamps.
#![deny(unsafe_code, missing_docs)]

//! This crate is intended to:
//! - parse cron expressions and crontab-like documents with comments, variables and commands;
//! - generate series of timestamps matching the schedule, forward or backward in time, within an optional window.
//!
//! _This is not a cron jobs scheduler or runner._ It never executes commands, it just tells when they are due.
//!
//! ## Cron schedule format
//!
//! Traditionally, cron schedule expression has a 5-fields format: minutes, hours, days, months and days of week.
//! Optional seconds field may be added in front of them:
//! - if 5-fields expression is specified, _seconds_ is `0`;
//! - if 6-fields expression is specified, the first field is _seconds_.
//!
//! Anything after the time fields is a command.
//!
//! ```text
//! [seconds] minutes hour day-of-month month day-of-week [command]
//! ```
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Required | Allowed values  | Allowed special characters |
//! |--------------|----------|-----------------|----------------------------|
//! | Seconds      | No       | 0-59            | * , - /                    |
//! | Minutes      | Yes      | 0-59            | * , - /                    |
//! | Hours        | Yes      | 0-23            | * , - /                    |
//! | Day of Month | Yes      | 1-31            | * , - / ?                  |
//! | Month        | Yes      | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | Yes      | 0-7 or SUN-SAT  | * , - / ?                  |
//!
//! Patterns meanings:
//! - `*` or `?` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values, i.e. `1,7,12`, `SUN,FRI`;
//! - `-` - range of values, i.e. `0-15`, `JAN-MAR`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`.
//!
//! Both `0` and `7` are Sunday. If both day of month and day of week are restricted,
//! the day matches if _any_ of them matches, i.e. `0 0 13 * 5` fires on every 13th and on every Friday.
//!
//! Also, short aliases for well-known schedule expressions are allowed:
//!
//! | Alias      | Expression  |
//! |------------|-------------|
//! | `@yearly`  | 0 0 1 1 *   |
//! | `@monthly` | 0 0 1 * *   |
//! | `@weekly`  | 0 0 * * 0   |
//! | `@daily`   | 0 0 * * *   |
//! | `@hourly`  | 0 * * * *   |
//!
//! Names of months and days of week are replaced with numbers anywhere in the line,
//! so a command shouldn't contain them (`echo sunday` becomes `echo 0day`).
//!
//! ## Crontab documents
//!
//! Input may contain several lines: `#` starts a comment line, `KEY=VALUE` defines a variable
//! and every other non-empty line is a schedule with an optional command.
//! Variables are shared by all schedules of the document.
//!
//! ## How to use
//!
//! [`Schedule`] is a parsed and validated expression, it has two convenient methods:
//! - [upcoming()](Schedule::upcoming): returns time of the next schedule's event after the provided timestamp;
//! - [iter()](Schedule::iter): returns an `Iterator` which produces a series of timestamps according to the schedule.
//!
//! Fine-grained iteration (reverse order, window end, local calendar fields) is configured by [`GeneratorOptions`],
//! and [`load()`] creates generators for every schedule of the document at once.
//!
//! ### Example with `upcoming`
//! ```rust
//! use chrono::{DateTime, Utc};
//! use cron_seq::{Result, Schedule};
//!
//! fn upcoming() -> Result<()> {
//!     let schedule = Schedule::new("0 0 * * *")?;
//!     let now: DateTime<Utc> = "2024-05-17T10:15:00Z".parse().unwrap();
//!
//!     let next = schedule.upcoming(&now);
//!     assert_eq!(next.unwrap().to_rfc3339(), "2024-05-18T00:00:00+00:00");
//!
//!     Ok(())
//! }
//! # upcoming().unwrap();
//! ```
//!
//! ### Example with document and reverse iteration
//! ```rust
//! use chrono::{DateTime, Utc};
//! use cron_seq::{load, GeneratorOptions, Result};
//!
//! fn previous() -> Result<()> {
//!     let document = "
//!         MAILTO=ops@example.com
//!         ## weekly report
//!         30 9 * * mon /usr/bin/report
//!     ";
//!     let now: DateTime<Utc> = "2024-05-17T10:15:00Z".parse().unwrap();
//!
//!     let set = load(document, GeneratorOptions::new(now).with_reverse(true))?;
//!     assert_eq!(set.variables["MAILTO"], "ops@example.com");
//!
//!     let previous = set.generators.into_iter().next().and_then(|mut g| g.next());
//!     assert_eq!(previous.unwrap().to_rfc3339(), "2024-05-13T09:30:00+00:00");
//!
//!     Ok(())
//! }
//! # previous().unwrap();
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Schedule`] and its parts.

/// Parsed schedule fields.
pub mod cell;
/// Crate specific Error implementation.
pub mod error;
pub mod generator;
/// Cron schedule parser and validator.
pub mod schedule;
mod series;
mod tokenizer;
mod utils;
mod valid_times;

// Re-export of public entities.
pub use cell::{Cell, CellValue, Field};
pub use error::CronError;
pub use generator::{DateGenerator, GeneratorOptions, GeneratorSet};
pub use schedule::{parse, Schedule, ScheduleConfig, ScheduleTime};

use chrono::TimeZone;

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;

/// Parses the document and creates generator for every schedule in it.
///
/// All generators share the same `options`.
pub fn load<Tz: TimeZone>(input: &str, options: GeneratorOptions<Tz>) -> Result<GeneratorSet<Tz>> {
    let (schedules, variables) = schedule::parse_document(input)?;
    let generators = schedules
        .iter()
        .map(|schedule| schedule.generator(options.clone()))
        .collect();

    Ok(GeneratorSet { generators, variables })
}

/// Parses the input and creates generator for its first schedule.
///
/// Returns [`CronError::InvalidLength`] if there is no schedule in the input.
pub fn load_one<Tz: TimeZone>(input: &str, options: GeneratorOptions<Tz>) -> Result<DateGenerator<Tz>> {
    Schedule::new(input).map(|schedule| schedule.generator(options))
}

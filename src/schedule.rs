use crate::{
    cell::{Cell, CellValue, Field},
    generator::{DateGenerator, GeneratorOptions},
    tokenizer::{self, Token},
    utils::DAYS_IN_MONTH,
    CronError, Result,
};
use chrono::{DateTime, TimeZone};
use std::{collections::BTreeMap, str::FromStr};

/// Time fields of the parsed schedule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleTime {
    /// Seconds, `0` if the expression has five fields only.
    pub seconds: Cell,
    /// Minutes.
    pub minutes: Cell,
    /// Hours.
    pub hour: Cell,
    /// Day of month.
    pub day_of_month: Cell,
    /// Month, 1-based.
    pub month: Cell,
    /// Day of week, 0 or 7 is Sunday.
    pub day_of_week: Cell,
}

impl ScheduleTime {
    /// Returns cell of the specified field.
    pub fn cell(&self, field: Field) -> &Cell {
        match field {
            Field::Seconds => &self.seconds,
            Field::Minutes => &self.minutes,
            Field::Hour => &self.hour,
            Field::DayOfMonth => &self.day_of_month,
            Field::Month => &self.month,
            Field::DayOfWeek => &self.day_of_week,
        }
    }
}

/// Structured alternative to the schedule string.
///
/// Omitted seconds mean `0`, any other omitted field means `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScheduleConfig {
    /// Seconds.
    pub seconds: Option<Cell>,
    /// Minutes.
    pub minutes: Option<Cell>,
    /// Hours.
    pub hour: Option<Cell>,
    /// Day of month.
    pub day_of_month: Option<Cell>,
    /// Month, 1-based.
    pub month: Option<Cell>,
    /// Day of week, 0 or 7 is Sunday.
    pub day_of_week: Option<Cell>,
    /// Command to run.
    pub command: Option<String>,
    /// Environment-style variables.
    pub variables: Option<BTreeMap<String, String>>,
}

/// Parsed and validated cron schedule.
///
/// For schedule format and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ScheduleConfig"))]
#[cfg_attr(feature = "serde", serde(into = "ScheduleConfig"))]
pub struct Schedule {
    time: ScheduleTime,
    command: Option<String>,
    variables: Option<BTreeMap<String, String>>,
}

/// Parses cron string into the list of schedules.
///
/// Input may be a single expression or a crontab-like document
/// with comments (`# ...`), variables (`KEY=VALUE`) and one expression per line.
/// Variables are shared by all schedules of the document.
pub fn parse(input: &str) -> Result<Vec<Schedule>> {
    parse_document(input).map(|(schedules, _)| schedules)
}

/// Parses the document, variables are returned even if there are no expressions.
pub(crate) fn parse_document(input: &str) -> Result<(Vec<Schedule>, BTreeMap<String, String>)> {
    let tokens = tokenizer::tokenize(input)?;
    let variables = (!tokens.variables.is_empty()).then(|| tokens.variables.clone());

    let schedules = tokens
        .expressions
        .into_iter()
        .map(|token| Schedule::from_token(token, variables.clone()))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        expressions = schedules.len(),
        variables = tokens.variables.len(),
        "cron input parsed"
    );

    Ok((schedules, tokens.variables))
}

impl Schedule {
    /// Parses and validates provided `expression` and constructs [`Schedule`] instance.
    ///
    /// If the expression is a multi-line document, the first schedule of it is returned.
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided expression is unparsable or has invalid values.
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        parse(&expression)?
            .into_iter()
            .next()
            .ok_or(CronError::InvalidLength {
                input: expression,
                length: 0,
            })
    }

    /// Validates structured schedule definition.
    pub fn from_config(config: ScheduleConfig) -> Result<Self> {
        let cell = |cell: Option<Cell>, field: Field| {
            let cell = cell.unwrap_or(Cell::Wildcard);
            cell.validate(field).map(|_| cell)
        };

        let seconds = config.seconds.unwrap_or(Cell::Number(0));
        seconds.validate(Field::Seconds)?;

        let time = ScheduleTime {
            seconds,
            minutes: cell(config.minutes, Field::Minutes)?,
            hour: cell(config.hour, Field::Hour)?,
            day_of_month: cell(config.day_of_month, Field::DayOfMonth)?,
            month: cell(config.month, Field::Month)?,
            day_of_week: cell(config.day_of_week, Field::DayOfWeek)?,
        };
        validate_days(&time)?;

        Ok(Self {
            time,
            command: config.command,
            variables: config.variables,
        })
    }

    /// Maps tokenized cells to the schedule fields.
    fn from_token(token: Token, variables: Option<BTreeMap<String, String>>) -> Result<Self> {
        let mut cells = token.cells;
        let seconds = if cells.len() == Field::ALL.len() {
            Some(cells.remove(0))
        } else {
            None
        };

        let [minutes, hour, day_of_month, month, day_of_week] =
            <[Cell; 5]>::try_from(cells).map_err(|cells| CronError::InvalidLength {
                input: cells.iter().map(Cell::to_string).collect::<Vec<_>>().join(" "),
                length: cells.len(),
            })?;

        Self::from_config(ScheduleConfig {
            seconds,
            minutes: Some(minutes),
            hour: Some(hour),
            day_of_month: Some(day_of_month),
            month: Some(month),
            day_of_week: Some(day_of_week),
            command: token.command,
            variables,
        })
    }

    /// Time fields of the schedule.
    #[inline]
    pub fn time(&self) -> &ScheduleTime {
        &self.time
    }

    /// Command which follows time fields, if any.
    #[inline]
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Variables of the document the schedule belongs to, if any.
    #[inline]
    pub fn variables(&self) -> Option<&BTreeMap<String, String>> {
        self.variables.as_ref()
    }

    /// Returns generator of the schedule's events configured by `options`.
    #[inline]
    pub fn generator<Tz: TimeZone>(&self, options: GeneratorOptions<Tz>) -> DateGenerator<Tz> {
        DateGenerator::new(self, options)
    }

    /// Returns iterator of events strictly after `current`, without the end boundary.
    #[inline]
    pub fn iter<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> DateGenerator<Tz> {
        self.generator(GeneratorOptions::new(current.clone()))
    }

    /// Returns time of the upcoming event strictly after `current`.
    ///
    /// Returns `None` if there is no upcoming event within supported years range.
    #[inline]
    pub fn upcoming<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.iter(current).next()
    }
}

/// Checks that day of month is reachable in at least one of the scheduled months.
fn validate_days(time: &ScheduleTime) -> Result<()> {
    let Some(day) = max_day(&time.day_of_month) else {
        return Ok(());
    };

    let months = time
        .month
        .values(Field::Month)
        .unwrap_or_else(|| (1..=12).collect());

    if months
        .iter()
        .any(|month| day <= DAYS_IN_MONTH[(*month - 1) as usize] as CellValue)
    {
        Ok(())
    } else {
        Err(CronError::InvalidDayOfMonth {
            day_of_month: time.day_of_month.to_string(),
            month: time.month.to_string(),
        })
    }
}

/// Largest day of month the cell insists on.
///
/// Stepped cells are clamped to the month length, so only their first day must fit.
fn max_day(cell: &Cell) -> Option<CellValue> {
    match cell {
        Cell::Wildcard => None,
        Cell::Number(day) => Some(*day),
        Cell::Range(_, to) => Some(*to),
        Cell::List(days) => days.iter().max().copied(),
        Cell::Step(_) => Some(1),
        Cell::StepFrom(from, _) | Cell::StepRange(from, _, _) => Some(*from),
    }
}

impl TryFrom<ScheduleConfig> for Schedule {
    type Error = CronError;

    fn try_from(value: ScheduleConfig) -> Result<Self> {
        Self::from_config(value)
    }
}

impl From<Schedule> for ScheduleConfig {
    fn from(value: Schedule) -> Self {
        let ScheduleTime {
            seconds,
            minutes,
            hour,
            day_of_month,
            month,
            day_of_week,
        } = value.time;

        Self {
            seconds: Some(seconds),
            minutes: Some(minutes),
            hour: Some(hour),
            day_of_month: Some(day_of_month),
            month: Some(month),
            day_of_week: Some(day_of_week),
            command: value.command,
            variables: value.variables,
        }
    }
}

impl TryFrom<String> for Schedule {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

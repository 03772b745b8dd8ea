use crate::{series::SeriesWithStep, utils, CronError, Result};
use std::fmt::Display;

/// Numeric type of the cell values.
pub type CellValue = u16;

/// Max amount of digits in a single value, range bound or step.
const MAX_VALUE_DIGITS: Option<usize> = Some(2);

/// Time field of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Field {
    /// Seconds, 0-59.
    Seconds,
    /// Minutes, 0-59.
    Minutes,
    /// Hours, 0-23.
    Hour,
    /// Day of month, 1-31.
    DayOfMonth,
    /// Month, 1-12.
    Month,
    /// Day of week, 0-7, both 0 and 7 are Sunday.
    DayOfWeek,
}

impl Field {
    /// All fields in the order of the six-fields expression.
    pub const ALL: [Field; 6] = [
        Field::Seconds,
        Field::Minutes,
        Field::Hour,
        Field::DayOfMonth,
        Field::Month,
        Field::DayOfWeek,
    ];

    /// Returns canonical range of the field values (inclusively).
    pub fn min_max(&self) -> (CellValue, CellValue) {
        match self {
            Self::Seconds | Self::Minutes => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 7),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hour => "hour",
            Self::DayOfMonth => "day of month",
            Self::Month => "month",
            Self::DayOfWeek => "day of week",
        };
        write!(f, "{name}")
    }
}

/// Parsed specification of a single time field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cell {
    /// Any value: `*` or `?`.
    Wildcard,
    /// Particular value: `5`.
    Number(CellValue),
    /// Every N-th value starting from the field minimum: `*/5`.
    Step(CellValue),
    /// Every N-th value starting from the specified one: `from/step`.
    StepFrom(CellValue, CellValue),
    /// Every N-th value within the range: `from-to/step`.
    StepRange(CellValue, CellValue, CellValue),
    /// Range of values: `from-to`.
    Range(CellValue, CellValue),
    /// List of particular values: `1,2,3`.
    List(Vec<CellValue>),
}

impl Cell {
    /// Recognizes single token of the expression.
    ///
    /// Returns `None` if token doesn't look like a cell,
    /// it's up to the caller to decide whether it's an error or a part of the command.
    pub(crate) fn parse(token: &str) -> Option<Self> {
        let number = |input: &str| utils::parse_number(input, MAX_VALUE_DIGITS);

        if token == "*" || token == "?" {
            return Some(Self::Wildcard);
        }

        if let Some(step) = token.strip_prefix("*/") {
            return number(step).map(Self::Step);
        }

        if let Some((base, step)) = token.split_once('/') {
            let step = number(step)?;
            return match base.split_once('-') {
                Some((from, to)) => Some(Self::StepRange(number(from)?, number(to)?, step)),
                None => Some(Self::StepFrom(number(base)?, step)),
            };
        }

        if let Some((from, to)) = token.split_once('-') {
            let (from, to) = (number(from)?, number(to)?);
            return (from < to).then_some(Self::Range(from, to));
        }

        if let Some(value) = number(token) {
            return Some(Self::Number(value));
        }

        if token.contains(',') {
            token
                .split(',')
                .map(|value| utils::parse_number(value, None))
                .collect::<Option<Vec<_>>>()
                .map(Self::List)
        } else {
            None
        }
    }

    /// Checks that all numeric parts of the cell fit into the field's range.
    pub(crate) fn validate(&self, field: Field) -> Result<()> {
        let (min, max) = field.min_max();
        let in_range = |value: &CellValue| (min..=max).contains(value);
        let valid_step = |step: &CellValue| *step > 0 && in_range(step);

        let valid = match self {
            Self::Wildcard => true,
            Self::Number(value) => in_range(value),
            Self::Step(step) => valid_step(step),
            Self::StepFrom(from, step) => in_range(from) && valid_step(step),
            Self::StepRange(from, to, step) => in_range(from) && in_range(to) && from <= to && valid_step(step),
            Self::Range(from, to) => in_range(from) && in_range(to) && from < to,
            Self::List(values) => !values.is_empty() && values.iter().all(in_range),
        };

        if valid {
            Ok(())
        } else {
            Err(CronError::InvalidValue {
                field,
                cell: self.to_string(),
            })
        }
    }

    /// Expands the cell into explicit list of values within the field's range.
    ///
    /// Returns `None` for the wildcard. Values are in natural order of the cell, not sorted.
    pub(crate) fn values(&self, field: Field) -> Option<Vec<CellValue>> {
        let (min, max) = field.min_max();

        let values = match self {
            Self::Wildcard => return None,
            Self::Number(value) => vec![*value],
            Self::Step(step) => SeriesWithStep::new(min, max, *step).collect(),
            Self::StepFrom(from, step) => SeriesWithStep::new(*from, max, *step)
                .filter(|v| *v >= min)
                .collect(),
            Self::StepRange(from, to, step) => SeriesWithStep::new(*from, (*to).min(max), *step)
                .filter(|v| *v >= min)
                .collect(),
            Self::Range(from, to) => SeriesWithStep::new((*from).max(min), (*to).min(max), 1).collect(),
            Self::List(values) => values.clone(),
        };

        Some(values)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Wildcard => write!(f, "*"),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Step(step) => write!(f, "*/{step}"),
            Cell::StepFrom(from, step) => write!(f, "{from}/{step}"),
            Cell::StepRange(from, to, step) => write!(f, "{from}-{to}/{step}"),
            Cell::Range(from, to) => write!(f, "{from}-{to}"),
            Cell::List(values) => {
                let values = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
                write!(f, "{values}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", Cell::Wildcard)]
    #[case("?", Cell::Wildcard)]
    #[case("5", Cell::Number(5))]
    #[case("05", Cell::Number(5))]
    #[case("59", Cell::Number(59))]
    #[case("99", Cell::Number(99))]
    #[case("*/5", Cell::Step(5))]
    #[case("*/0", Cell::Step(0))]
    #[case("0/30", Cell::StepFrom(0, 30))]
    #[case("10/5", Cell::StepFrom(10, 5))]
    #[case("1-30/5", Cell::StepRange(1, 30, 5))]
    #[case("30-10/5", Cell::StepRange(30, 10, 5))]
    #[case("2-3", Cell::Range(2, 3))]
    #[case("10-30", Cell::Range(10, 30))]
    #[case("1,2,3", Cell::List(vec![1, 2, 3]))]
    #[case("6,0", Cell::List(vec![6, 0]))]
    #[case("7,6", Cell::List(vec![7, 6]))]
    #[case("1,100", Cell::List(vec![1, 100]))]
    #[case("1,70000", Cell::List(vec![1, CellValue::MAX]))]
    fn test_cell_parse_valid(#[case] token: &str, #[case] expected: Cell) {
        assert_eq!(Cell::parse(token), Some(expected), "token = '{token}'");
    }

    #[rstest]
    #[case("")]
    #[case("**")]
    #[case("*/*")]
    #[case("*/1/2")]
    #[case("*/")]
    #[case("*/100")]
    #[case("2/-1")]
    #[case("/5")]
    #[case("5/")]
    #[case("1,")]
    #[case(",3")]
    #[case("1,,3")]
    #[case("1, 2")]
    #[case("1,a")]
    #[case("1-")]
    #[case("-3")]
    #[case("2-1")]
    #[case("2-2")]
    #[case("1-2-3")]
    #[case("1-2,5")]
    #[case("100")]
    #[case("L")]
    #[case("1#2")]
    #[case("mon")]
    #[case("echo")]
    fn test_cell_parse_invalid(#[case] token: &str) {
        assert_eq!(Cell::parse(token), None, "token = '{token}'");
    }

    #[rstest]
    #[case(Field::Seconds, Cell::Wildcard)]
    #[case(Field::Seconds, Cell::Number(59))]
    #[case(Field::Seconds, Cell::Step(59))]
    #[case(Field::Minutes, Cell::StepFrom(0, 5))]
    #[case(Field::Minutes, Cell::StepRange(10, 10, 5))]
    #[case(Field::Minutes, Cell::Range(0, 59))]
    #[case(Field::Hour, Cell::Number(23))]
    #[case(Field::Hour, Cell::Step(10))]
    #[case(Field::DayOfMonth, Cell::Number(31))]
    #[case(Field::DayOfMonth, Cell::Step(5))]
    #[case(Field::Month, Cell::Range(1, 12))]
    #[case(Field::Month, Cell::List(vec![12, 1]))]
    #[case(Field::DayOfWeek, Cell::Number(7))]
    #[case(Field::DayOfWeek, Cell::List(vec![6, 7]))]
    fn test_cell_validate_valid(#[case] field: Field, #[case] cell: Cell) {
        assert!(cell.validate(field).is_ok(), "field = {field}, cell = {cell}");
    }

    #[rstest]
    #[case(Field::Seconds, Cell::Number(60))]
    #[case(Field::Seconds, Cell::Step(0))]
    #[case(Field::Seconds, Cell::Step(60))]
    #[case(Field::Minutes, Cell::StepFrom(60, 5))]
    #[case(Field::Minutes, Cell::StepFrom(5, 0))]
    #[case(Field::Minutes, Cell::StepRange(10, 60, 5))]
    #[case(Field::Minutes, Cell::StepRange(30, 10, 5))]
    #[case(Field::Minutes, Cell::Range(5, 5))]
    #[case(Field::Minutes, Cell::Range(6, 5))]
    #[case(Field::Hour, Cell::Number(24))]
    #[case(Field::Hour, Cell::Number(66))]
    #[case(Field::Hour, Cell::Step(24))]
    #[case(Field::DayOfMonth, Cell::Number(0))]
    #[case(Field::DayOfMonth, Cell::Number(32))]
    #[case(Field::DayOfMonth, Cell::Range(0, 5))]
    #[case(Field::Month, Cell::Number(0))]
    #[case(Field::Month, Cell::Number(13))]
    #[case(Field::Month, Cell::List(vec![1, 13]))]
    #[case(Field::Month, Cell::List(vec![]))]
    #[case(Field::DayOfWeek, Cell::Number(8))]
    #[case(Field::DayOfWeek, Cell::Step(0))]
    fn test_cell_validate_invalid(#[case] field: Field, #[case] cell: Cell) {
        assert_eq!(
            cell.validate(field),
            Err(CronError::InvalidValue {
                field,
                cell: cell.to_string()
            })
        );
    }

    #[rstest]
    #[case(Field::Seconds, Cell::Wildcard, None)]
    #[case(Field::Seconds, Cell::Number(7), Some(vec![7]))]
    #[case(Field::Seconds, Cell::Step(15), Some(vec![0, 15, 30, 45]))]
    #[case(Field::Seconds, Cell::StepFrom(0, 30), Some(vec![0, 30]))]
    #[case(Field::Minutes, Cell::StepFrom(10, 20), Some(vec![10, 30, 50]))]
    #[case(Field::Minutes, Cell::StepRange(0, 20, 10), Some(vec![0, 10, 20]))]
    #[case(Field::Minutes, Cell::StepRange(5, 20, 10), Some(vec![5, 15]))]
    #[case(Field::Hour, Cell::Step(5), Some(vec![0, 5, 10, 15, 20]))]
    #[case(Field::Hour, Cell::Range(9, 12), Some(vec![9, 10, 11, 12]))]
    #[case(Field::DayOfMonth, Cell::Step(5), Some(vec![1, 6, 11, 16, 21, 26, 31]))]
    #[case(Field::DayOfMonth, Cell::StepFrom(3, 10), Some(vec![3, 13, 23]))]
    #[case(Field::Month, Cell::Step(4), Some(vec![1, 5, 9]))]
    #[case(Field::Month, Cell::List(vec![12, 3, 3]), Some(vec![12, 3, 3]))]
    #[case(Field::DayOfWeek, Cell::Range(5, 7), Some(vec![5, 6, 7]))]
    #[case(Field::DayOfWeek, Cell::Step(3), Some(vec![0, 3, 6]))]
    fn test_cell_values(#[case] field: Field, #[case] cell: Cell, #[case] expected: Option<Vec<CellValue>>) {
        assert_eq!(cell.values(field), expected, "field = {field}, cell = {cell}");
    }

    #[test]
    fn test_cell_display() {
        let test_cases = vec![
            (Cell::Wildcard, "*"),
            (Cell::Number(5), "5"),
            (Cell::Step(10), "*/10"),
            (Cell::StepFrom(15, 30), "15/30"),
            (Cell::StepRange(0, 30, 5), "0-30/5"),
            (Cell::Range(2, 5), "2-5"),
            (Cell::List(vec![3, 1, 2]), "3,1,2"),
        ];

        for (cell, expected) in test_cases {
            assert_eq!(cell.to_string(), expected);
            assert_eq!(Cell::parse(expected), Some(cell));
        }
    }

    #[test]
    fn test_field_display() {
        let names = Field::ALL.iter().map(|f| f.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["seconds", "minutes", "hour", "day of month", "month", "day of week"]
        );
    }
}

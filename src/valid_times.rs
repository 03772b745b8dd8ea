/// Explicit sets of the values each calendar slot may take.
use crate::{
    cell::{Cell, CellValue, Field},
    schedule::ScheduleTime,
    utils::DAYS_IN_MONTH,
};

/// Valid values of a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Valid<T> {
    /// Any value within the slot's natural bounds.
    Any,
    /// Only listed values.
    Only(T),
}

impl<T> Valid<T> {
    #[inline]
    pub(crate) fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Compiled schedule: sorted in the iteration direction, months are zero-based,
/// Sunday is always `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidTimes {
    pub(crate) seconds: Valid<Vec<i32>>,
    pub(crate) minutes: Valid<Vec<i32>>,
    pub(crate) hours: Valid<Vec<i32>>,
    /// One row per month, days beyond the month's capacity are dropped.
    pub(crate) days_of_month: Valid<[Vec<i32>; 12]>,
    pub(crate) months: Valid<Vec<i32>>,
    pub(crate) days_of_week: Valid<Vec<i32>>,
    pub(crate) reverse: bool,
}

impl ValidTimes {
    pub(crate) fn new(time: &ScheduleTime, reverse: bool) -> Self {
        let set = |cell: &Cell, field: Field, map: fn(CellValue) -> i32| match cell.values(field) {
            None => Valid::Any,
            Some(values) => {
                let mut values = values.into_iter().map(map).collect::<Vec<_>>();
                values.sort_unstable();
                values.dedup();
                if reverse {
                    values.reverse();
                }
                Valid::Only(values)
            }
        };

        let days_of_month = match set(&time.day_of_month, Field::DayOfMonth, i32::from) {
            Valid::Any => Valid::Any,
            Valid::Only(days) => Valid::Only(std::array::from_fn(|month| {
                days.iter()
                    .copied()
                    .filter(|day| *day <= DAYS_IN_MONTH[month] as i32)
                    .collect()
            })),
        };

        Self {
            seconds: set(&time.seconds, Field::Seconds, i32::from),
            minutes: set(&time.minutes, Field::Minutes, i32::from),
            hours: set(&time.hour, Field::Hour, i32::from),
            days_of_month,
            months: set(&time.month, Field::Month, |month| month as i32 - 1),
            days_of_week: set(&time.day_of_week, Field::DayOfWeek, |day| day as i32 % 7),
            reverse,
        }
    }

    /// Returns `true` if `value` lies strictly beyond `current` in the iteration direction.
    #[inline]
    pub(crate) fn is_beyond(&self, value: i32, current: i32) -> bool {
        if self.reverse {
            value < current
        } else {
            value > current
        }
    }

    /// Returns `true` if the day satisfies day of month and/or day of week restrictions.
    ///
    /// If both are restricted, matching any of them is enough.
    pub(crate) fn is_day_valid(&self, month: usize, day: i32, weekday: i32) -> bool {
        match (&self.days_of_month, &self.days_of_week) {
            (Valid::Any, Valid::Any) => true,
            (Valid::Only(rows), Valid::Any) => rows[month].contains(&day),
            (Valid::Any, Valid::Only(weekdays)) => weekdays.contains(&weekday),
            (Valid::Only(rows), Valid::Only(weekdays)) => rows[month].contains(&day) || weekdays.contains(&weekday),
        }
    }
}

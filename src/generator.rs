//! Lazy generator of the schedule's events.
//!
//! Generator keeps calendar state split into six slots (second ... year) and steps it
//! through the values allowed by the schedule. Every step cascades to the larger slots
//! on overflow, so each call of [`Iterator::next`] takes a bounded amount of work.

use crate::{
    utils::{day_of_week, days_in_month},
    valid_times::{Valid, ValidTimes},
    Schedule,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use std::{
    collections::BTreeMap,
    iter::FusedIterator,
    ops::{Index, IndexMut},
};

/// The earliest year the generator can reach.
pub const MIN_YEAR: i32 = 1970;
/// The latest year the generator can reach.
pub const MAX_YEAR: i32 = 9999;

/// Generator configuration.
///
/// ```rust
/// # use cron_seq::{GeneratorOptions, Schedule};
/// # use chrono::{DateTime, Utc};
/// let start: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
/// let options = GeneratorOptions::new(start)
///     .with_end("2024-01-07T00:00:00Z".parse().unwrap())
///     .with_zero_ms(true);
///
/// let schedule = Schedule::new("0 12 * * *").unwrap();
/// assert_eq!(schedule.generator(options).count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions<Tz: TimeZone> {
    /// Start of the window, never yielded itself.
    pub start: DateTime<Tz>,
    /// End of the window (inclusively), unbounded if `None`.
    pub end: Option<DateTime<Tz>>,
    /// Iterate backward in time.
    pub reverse: bool,
    /// Initial calendar state, `start` is used if `None`.
    pub custom_state: Option<DateTime<Tz>>,
    /// Use UTC calendar fields instead of the local ones of `Tz`.
    pub utc: bool,
    /// Truncate sub-second part of the start, end and custom state.
    pub zero_ms: bool,
}

impl<Tz: TimeZone> GeneratorOptions<Tz> {
    /// Unbounded forward generator options starting from `start`.
    pub fn new(start: DateTime<Tz>) -> Self {
        Self {
            start,
            end: None,
            reverse: false,
            custom_state: None,
            utc: true,
            zero_ms: false,
        }
    }

    /// Sets end of the window.
    pub fn with_end(mut self, end: DateTime<Tz>) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets iteration direction.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Sets initial calendar state.
    pub fn with_custom_state(mut self, state: DateTime<Tz>) -> Self {
        self.custom_state = Some(state);
        self
    }

    /// Selects UTC (`true`) or local (`false`) calendar fields.
    pub fn with_utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Enables truncation of sub-second parts.
    pub fn with_zero_ms(mut self, zero_ms: bool) -> Self {
        self.zero_ms = zero_ms;
        self
    }
}

impl Default for GeneratorOptions<Utc> {
    /// Starts from the current time.
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Slot of the calendar state, from the smallest to the largest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Slot {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    Year,
}

impl Slot {
    /// Next larger slot.
    fn larger(self) -> Option<Self> {
        match self {
            Self::Second => Some(Self::Minute),
            Self::Minute => Some(Self::Hour),
            Self::Hour => Some(Self::DayOfMonth),
            Self::DayOfMonth => Some(Self::Month),
            Self::Month => Some(Self::Year),
            Self::Year => None,
        }
    }

    /// All slots smaller than this one.
    fn smaller(self) -> &'static [Slot] {
        static ALL: [Slot; 6] = [
            Slot::Second,
            Slot::Minute,
            Slot::Hour,
            Slot::DayOfMonth,
            Slot::Month,
            Slot::Year,
        ];
        &ALL[..self as usize]
    }
}

/// Calendar state: second, minute, hour, day of month, zero-based month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State([i32; 6]);

impl State {
    fn from_naive(dt: &NaiveDateTime) -> Self {
        Self([
            dt.second() as i32,
            dt.minute() as i32,
            dt.hour() as i32,
            dt.day() as i32,
            dt.month0() as i32,
            dt.year(),
        ])
    }

    fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self[Slot::Year], self[Slot::Month] as u32 + 1, self[Slot::DayOfMonth] as u32)?
            .and_hms_opt(
                self[Slot::Hour] as u32,
                self[Slot::Minute] as u32,
                self[Slot::Second] as u32,
            )
    }

    #[inline]
    fn month(&self) -> usize {
        self[Slot::Month] as usize
    }

    #[inline]
    fn days_in_month(&self) -> i32 {
        days_in_month(self[Slot::Year], self.month()) as i32
    }

    #[inline]
    fn weekday(&self) -> i32 {
        day_of_week(self[Slot::Year], self.month(), self[Slot::DayOfMonth] as u8) as i32
    }
}

impl Index<Slot> for State {
    type Output = i32;

    fn index(&self, slot: Slot) -> &Self::Output {
        &self.0[slot as usize]
    }
}

impl IndexMut<Slot> for State {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        &mut self.0[slot as usize]
    }
}

/// Iterator over the schedule's events within the configured window.
///
/// Produced events are strictly monotonic: increasing for forward iteration
/// and decreasing for reverse one.
#[derive(Debug, Clone)]
pub struct DateGenerator<Tz: TimeZone> {
    valid: ValidTimes,
    state: State,
    start: DateTime<Tz>,
    end: Option<DateTime<Tz>>,
    tz: Tz,
    utc: bool,
    exhausted: bool,
}

/// Generators of all expressions of the document together with its variables.
#[derive(Debug, Clone)]
pub struct GeneratorSet<Tz: TimeZone> {
    /// One generator per expression, in the document's order.
    pub generators: Vec<DateGenerator<Tz>>,
    /// Variables defined in the document.
    pub variables: BTreeMap<String, String>,
}

impl<Tz: TimeZone> DateGenerator<Tz> {
    /// Constructs generator of the `schedule`'s events.
    pub fn new(schedule: &Schedule, options: GeneratorOptions<Tz>) -> Self {
        let GeneratorOptions {
            start,
            end,
            reverse,
            custom_state,
            utc,
            zero_ms,
        } = options;

        let truncate = |dt: DateTime<Tz>| {
            if zero_ms {
                dt.with_nanosecond(0).unwrap_or(dt)
            } else {
                dt
            }
        };
        let start = truncate(start);
        let end = end.map(&truncate);
        let custom_state = custom_state.map(&truncate);

        let (start, end) = match end {
            Some(end) if reverse && end > start => (end, Some(start)),
            end => (start, end),
        };

        let initial = custom_state.unwrap_or_else(|| start.clone());
        let naive = if utc {
            initial.naive_utc()
        } else {
            initial.naive_local()
        };
        let naive = match naive.with_nanosecond(0) {
            Some(whole) if whole != naive && !reverse => whole.checked_add_signed(TimeDelta::seconds(1)),
            whole => whole,
        };

        let state = naive.map(|dt| State::from_naive(&dt));
        let exhausted = match state {
            Some(state) if reverse => state[Slot::Year] < MIN_YEAR,
            Some(state) => state[Slot::Year] > MAX_YEAR,
            None => true,
        };

        tracing::debug!(
            command = schedule.command(),
            reverse,
            utc,
            bounded = end.is_some(),
            "generator created"
        );

        Self {
            valid: ValidTimes::new(schedule.time(), reverse),
            state: state.unwrap_or(State([0, 0, 0, 1, 0, MIN_YEAR])),
            tz: start.timezone(),
            start,
            end,
            utc,
            exhausted,
        }
    }

    /// Returns `true` if the generator iterates backward in time.
    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.valid.reverse
    }

    /// Produces the next event, `None` means the end of the sequence.
    fn advance(&mut self) -> Option<DateTime<Tz>> {
        'protocol: loop {
            for slot in [Slot::Second, Slot::Minute, Slot::Hour] {
                if !self.is_valid(slot) {
                    self.increment(slot)?;
                    self.reset_to_first(slot);
                }
            }

            if !self.is_day_valid() {
                self.increment(Slot::DayOfMonth)?;
                self.reset_to_first(Slot::DayOfMonth);
            }

            if !self.is_valid(Slot::Month) {
                self.increment(Slot::Month)?;
                self.reset_to_bounds(Slot::Month);
                continue 'protocol;
            }

            let Some(instant) = self.instant() else {
                tracing::trace!(state = ?self.state.0, "local time doesn't exist, skipped");
                self.increment(Slot::Second)?;
                continue 'protocol;
            };

            if instant == self.start {
                self.increment(Slot::Second)?;
                continue 'protocol;
            }

            if let Some(end) = &self.end {
                let outside = if self.is_reverse() {
                    instant < *end
                } else {
                    instant > *end
                };
                if outside {
                    return None;
                }
            }

            if self.increment(Slot::Second).is_none() {
                self.exhausted = true;
            }

            return Some(instant);
        }
    }

    /// Converts current state to the instant, `None` if the local time doesn't exist.
    fn instant(&self) -> Option<DateTime<Tz>> {
        let naive = self.state.to_naive()?;
        if self.utc {
            Some(self.tz.from_utc_datetime(&naive))
        } else {
            self.tz.from_local_datetime(&naive).earliest()
        }
    }

    fn is_valid(&self, slot: Slot) -> bool {
        let value = self.state[slot];
        match self.values(slot) {
            Valid::Any => true,
            Valid::Only(values) => values.contains(&value),
        }
    }

    fn is_day_valid(&self) -> bool {
        self.valid.is_day_valid(
            self.state.month(),
            self.state[Slot::DayOfMonth],
            self.state.weekday(),
        )
    }

    /// Valid values of the slot, days of month are taken from the current month's row.
    fn values(&self, slot: Slot) -> Valid<&[i32]> {
        let values = match slot {
            Slot::Second => &self.valid.seconds,
            Slot::Minute => &self.valid.minutes,
            Slot::Hour => &self.valid.hours,
            Slot::Month => &self.valid.months,
            Slot::Year => return Valid::Any,
            Slot::DayOfMonth => {
                return match &self.valid.days_of_month {
                    Valid::Any => Valid::Any,
                    Valid::Only(rows) => Valid::Only(rows[self.state.month()].as_slice()),
                }
            }
        };

        match values {
            Valid::Any => Valid::Any,
            Valid::Only(values) => Valid::Only(values.as_slice()),
        }
    }

    /// Natural bounds of the slot in the current state.
    fn bounds(&self, slot: Slot) -> (i32, i32) {
        match slot {
            Slot::Second | Slot::Minute => (0, 59),
            Slot::Hour => (0, 23),
            Slot::DayOfMonth => (1, self.state.days_in_month()),
            Slot::Month => (0, 11),
            // only the bound in the iteration direction matters
            Slot::Year if self.is_reverse() => (MIN_YEAR, i32::MAX),
            Slot::Year => (i32::MIN, MAX_YEAR),
        }
    }

    /// The first bound in the iteration direction.
    fn first_bound(&self, slot: Slot) -> i32 {
        let (min, max) = self.bounds(slot);
        if self.is_reverse() {
            max
        } else {
            min
        }
    }

    /// The first valid value of the slot which fits into the current month.
    fn first(&self, slot: Slot) -> Option<i32> {
        match self.values(slot) {
            Valid::Any => Some(self.first_bound(slot)),
            Valid::Only(values) => {
                let (min, max) = self.bounds(slot);
                values.iter().copied().find(|value| (min..=max).contains(value))
            }
        }
    }

    /// Sets all slots smaller than `slot` to their first valid values.
    fn reset_to_first(&mut self, slot: Slot) {
        for smaller in slot.smaller().iter().rev() {
            if let Some(value) = self.first(*smaller) {
                self.state[*smaller] = value;
            }
        }
    }

    /// Sets all slots smaller than `slot` to their natural bounds.
    fn reset_to_bounds(&mut self, slot: Slot) {
        for smaller in slot.smaller().iter().rev() {
            self.state[*smaller] = self.first_bound(*smaller);
        }
    }

    /// Moves the slot to its next valid value, cascading to the larger slots on overflow.
    ///
    /// Returns `None` if the supported years range is over.
    fn increment(&mut self, slot: Slot) -> Option<()> {
        if slot == Slot::DayOfMonth && !self.valid.days_of_week.is_any() {
            return self.increment_weekday();
        }

        let current = self.state[slot];
        let (min, max) = self.bounds(slot);
        let next = match self.values(slot) {
            Valid::Any => {
                let next = if self.is_reverse() { current - 1 } else { current + 1 };
                (min..=max).contains(&next).then_some(next)
            }
            Valid::Only(values) => values
                .iter()
                .copied()
                .find(|value| self.valid.is_beyond(*value, current) && (min..=max).contains(value)),
        };

        if let Some(next) = next {
            self.state[slot] = next;
            return Some(());
        }

        let larger = slot.larger()?;
        loop {
            self.increment(larger)?;
            // the month may have no suitable day at all, like 29th of February in a common year
            if let Some(first) = self.first(slot) {
                self.state[slot] = first;
                return Some(());
            }
        }
    }

    /// Steps day by day until the day matches day of week or day of month.
    fn increment_weekday(&mut self) -> Option<()> {
        loop {
            let day = self.state[Slot::DayOfMonth] + if self.is_reverse() { -1 } else { 1 };
            if (1..=self.state.days_in_month()).contains(&day) {
                self.state[Slot::DayOfMonth] = day;
            } else {
                self.increment(Slot::Month)?;
                self.state[Slot::DayOfMonth] = self.first_bound(Slot::DayOfMonth);
            }

            if self.is_day_valid() {
                return Some(());
            }
        }
    }
}

impl<Tz: TimeZone> Iterator for DateGenerator<Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let next = self.advance();
        if next.is_none() {
            self.exhausted = true;
            tracing::trace!("generator exhausted");
        }
        next
    }
}

impl<Tz: TimeZone> FusedIterator for DateGenerator<Tz> {}

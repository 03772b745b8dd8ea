/// Calendar helpers and numeric tokens parsing.
use crate::cell::CellValue;

/// Amount of days in Jan...Dec, with 29 in February.
///
/// Leap years must be handled explicitly, see [`days_in_month`].
pub(crate) const DAYS_IN_MONTH: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Converts string of ASCII digits into unsigned number.
///
/// `max_digits` limits length of the input, `None` means unlimited.
/// Too large numbers saturate to [`CellValue::MAX`], so they fail range validation later.
pub(crate) fn parse_number(input: &str, max_digits: Option<usize>) -> Option<CellValue> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if max_digits.is_some_and(|max| input.len() > max) {
        return None;
    }

    Some(input.parse::<CellValue>().unwrap_or(CellValue::MAX))
}

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in the month, `month` is zero-based.
#[inline]
pub(crate) fn days_in_month(year: i32, month: usize) -> u8 {
    match month {
        1 if !is_leap_year(year) => 28,
        _ => DAYS_IN_MONTH[month],
    }
}

/// Calculates day of week (0 is Sunday) for the specified date, `month` is zero-based.
pub(crate) fn day_of_week(year: i32, month: usize, day: u8) -> u8 {
    debug_assert!(
        day > 0 && month < 12 && day <= days_in_month(year, month),
        "Invalid date: {year:04}-{:02}-{day:02}",
        month + 1
    );

    let month_offset: i32 = if is_leap_year(year) {
        [0, 3, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6]
    } else {
        [0, 3, 3, 6, 1, 4, 6, 2, 5, 0, 3, 5]
    }[month];

    let year = year - 1;

    ((day as i32 + month_offset + 5 * (year % 4) + 4 * (year % 100) + 6 * (year % 400)) % 7) as u8
}

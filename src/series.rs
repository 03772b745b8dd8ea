/// Generator of stepped numbers series.
use crate::cell::CellValue;

/// Iterator over `first, first + step, first + 2 * step, ...` up to `last` inclusively.
///
/// Series is empty if `first` is greater than `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep {
    last: CellValue,
    step: CellValue,
    next: Option<CellValue>,
}

impl SeriesWithStep {
    /// Caller is responsible to ensure that `step` isn't zero.
    #[inline]
    pub(crate) fn new(first: CellValue, last: CellValue, step: CellValue) -> Self {
        debug_assert!(step > 0, "step value is 0");

        Self {
            last,
            step,
            next: (first <= last).then_some(first),
        }
    }
}

impl Iterator for SeriesWithStep {
    type Item = CellValue;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.checked_add(self.step).filter(|next| *next <= self.last);
        Some(current)
    }
}

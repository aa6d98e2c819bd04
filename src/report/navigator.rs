//! Day navigation
//!
//! Cursor over the sorted list of days that have data. Prev/next clamp at
//! both ends, and the selection survives the day list growing as new data
//! arrives.

use chrono::NaiveDate;

/// Cursor over the available days of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNavigator {
    /// Distinct days with data, ascending
    days: Vec<NaiveDate>,
    /// Currently selected day; need not itself appear in `days`
    current: NaiveDate,
}

impl DayNavigator {
    /// Create a navigator positioned on `current`.
    ///
    /// `days` must be sorted ascending (as produced by
    /// `SeriesFrame::available_days`).
    pub fn new(days: Vec<NaiveDate>, current: NaiveDate) -> Self {
        debug_assert!(days.windows(2).all(|w| w[0] < w[1]));
        Self { days, current }
    }

    /// Navigator positioned on the newest day with data, if any.
    pub fn at_latest(days: Vec<NaiveDate>) -> Option<Self> {
        let current = *days.last()?;
        Some(Self::new(days, current))
    }

    /// The selected day
    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// The days this navigator ranges over
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Nearest day with data strictly before the selection
    pub fn peek_prev(&self) -> Option<NaiveDate> {
        let idx = self.days.partition_point(|d| *d < self.current);
        idx.checked_sub(1).map(|i| self.days[i])
    }

    /// Nearest day with data strictly after the selection
    pub fn peek_next(&self) -> Option<NaiveDate> {
        let idx = self.days.partition_point(|d| *d <= self.current);
        self.days.get(idx).copied()
    }

    /// Move to the previous day with data; clamps at the start.
    pub fn prev(&mut self) -> NaiveDate {
        if let Some(day) = self.peek_prev() {
            self.current = day;
        }
        self.current
    }

    /// Move to the next day with data; clamps at the end.
    pub fn next(&mut self) -> NaiveDate {
        if let Some(day) = self.peek_next() {
            self.current = day;
        }
        self.current
    }

    /// Select a specific day
    pub fn select(&mut self, date: NaiveDate) {
        self.current = date;
    }

    /// Swap in a refreshed day list, keeping the current selection.
    pub fn retarget(&mut self, days: Vec<NaiveDate>) {
        debug_assert!(days.windows(2).all(|w| w[0] < w[1]));
        self.days = days;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_prev_next_walk() {
        let mut nav = DayNavigator::at_latest(vec![d(1), d(2), d(5)]).unwrap();
        assert_eq!(nav.current(), d(5));

        assert_eq!(nav.prev(), d(2));
        assert_eq!(nav.prev(), d(1));
        assert_eq!(nav.next(), d(2));
    }

    #[test]
    fn test_clamps_at_both_ends() {
        let mut nav = DayNavigator::new(vec![d(1), d(2)], d(1));

        assert_eq!(nav.prev(), d(1));
        assert_eq!(nav.prev(), d(1));

        nav.select(d(2));
        assert_eq!(nav.next(), d(2));
        assert_eq!(nav.next(), d(2));
    }

    #[test]
    fn test_peek_around_day_without_data() {
        // Selection sits on a gap day; neighbors are the surrounding days.
        let nav = DayNavigator::new(vec![d(1), d(5)], d(3));

        assert_eq!(nav.peek_prev(), Some(d(1)));
        assert_eq!(nav.peek_next(), Some(d(5)));
    }

    #[test]
    fn test_peek_at_boundaries() {
        let nav = DayNavigator::new(vec![d(1), d(2)], d(1));
        assert_eq!(nav.peek_prev(), None);
        assert_eq!(nav.peek_next(), Some(d(2)));

        let nav = DayNavigator::new(vec![d(1), d(2)], d(2));
        assert_eq!(nav.peek_next(), None);
    }

    #[test]
    fn test_retarget_keeps_selection() {
        let mut nav = DayNavigator::at_latest(vec![d(1), d(2)]).unwrap();
        assert_eq!(nav.current(), d(2));

        // New day appears; selection stays put, next now leads to it.
        nav.retarget(vec![d(1), d(2), d(3)]);
        assert_eq!(nav.current(), d(2));
        assert_eq!(nav.peek_next(), Some(d(3)));
    }

    #[test]
    fn test_empty_day_list() {
        assert!(DayNavigator::at_latest(vec![]).is_none());

        let mut nav = DayNavigator::new(vec![], d(3));
        assert_eq!(nav.peek_prev(), None);
        assert_eq!(nav.peek_next(), None);
        assert_eq!(nav.prev(), d(3));
        assert_eq!(nav.next(), d(3));
    }
}

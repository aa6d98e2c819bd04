//! Daily report
//!
//! Summarizes one UTC day of samples the way the dashboard's report card
//! shows it: open (first sample of the day), close (last), absolute and
//! percent variation, plus the day's extremes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::types::{Sample, SeriesProfile};

/// Open/close/variation summary for a single day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyReport {
    /// The day being summarized (UTC)
    pub date: NaiveDate,
    /// First value of the day
    pub open: f64,
    /// Last value of the day
    pub close: f64,
    /// close - open
    pub change: f64,
    /// Percent variation relative to open; 0 when open is 0
    pub change_pct: f64,
    /// Lowest value of the day
    pub low: f64,
    /// Highest value of the day
    pub high: f64,
    /// Number of samples on the day
    pub sample_count: usize,
}

impl DailyReport {
    /// Compute the report for one day's samples (oldest first).
    ///
    /// Returns None for a day with no samples.
    pub fn compute(date: NaiveDate, samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;

        let open = first.value;
        let close = last.value;
        let change = close - open;
        let change_pct = if open != 0.0 {
            (change / open) * 100.0
        } else {
            0.0
        };

        let low = samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
        let high = samples
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            date,
            open,
            close,
            change,
            change_pct,
            low,
            high,
            sample_count: samples.len(),
        })
    }

    /// Render the report as the text block the `report` subcommand prints.
    pub fn render_text(&self, profile: &SeriesProfile) -> String {
        format!(
            "{} daily report for {}\n\
             open:      {}\n\
             close:     {}\n\
             change:    {}{} ({}{:.2}%)\n\
             low/high:  {} / {}\n\
             samples:   {}",
            profile.name,
            self.date,
            profile.display_value(self.open),
            profile.display_value(self.close),
            if self.change >= 0.0 { "+" } else { "" },
            profile.display_value(self.change),
            if self.change_pct >= 0.0 { "+" } else { "" },
            self.change_pct,
            profile.display_value(self.low),
            profile.display_value(self.high),
            self.sample_count,
        )
    }
}

//! Core data types for the Pulseboard series layer
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Sample`: a single timestamped measurement
//! - `TimeRange`: a half-open time interval for chart queries
//! - `SeriesProfile` and `ValueFormat`: how the tracked series is displayed

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single time-series sample
///
/// One row of the tracked CSV after parsing: when it was measured and what
/// the value was. Everything else in the system is derived from these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// The measured value
    pub value: f64,
}

impl Sample {
    /// Create a sample with the current timestamp
    pub fn now(value: f64) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            value,
        }
    }

    /// Create a sample at a specific timestamp
    pub fn at(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// UTC calendar date this sample falls on
    pub fn date(&self) -> NaiveDate {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.date_naive())
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Time range for chart queries (half-open interval: [start, end))
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start timestamp (inclusive), in milliseconds
    pub start: i64,
    /// End timestamp (exclusive), in milliseconds
    pub end: i64,
}

impl TimeRange {
    /// Create a time range, returning None if start >= end
    pub fn try_new(start: i64, end: i64) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Create a range for the last N hours from now
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now().timestamp_millis();
        let start = end - (hours * 3600 * 1000);
        Self { start, end }
    }

    /// Create a range for the last N days from now
    pub fn last_days(days: i64) -> Self {
        Self::last_hours(days * 24)
    }

    /// Create a range covering a specific UTC day
    pub fn day(date: NaiveDate) -> Option<Self> {
        let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
        let end = start + chrono::Duration::days(1);
        Some(Self {
            start: start.timestamp_millis(),
            end: end.timestamp_millis(),
        })
    }

    /// Check if a timestamp falls within this range
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Get the duration in milliseconds
    pub fn duration_millis(&self) -> i64 {
        self.end - self.start
    }
}

/// How values of the tracked series are rendered for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Currency with two decimals: `$67,412.50`
    Currency,
    /// Whole quantity with thousands separators: `8,114,236,540`
    Count,
    /// Raw value, no grouping
    #[default]
    Plain,
}

impl ValueFormat {
    /// Format a value for display
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Currency => {
                let grouped = group_thousands(value, 2);
                match grouped.strip_prefix('-') {
                    Some(rest) => format!("-${rest}"),
                    None => format!("${grouped}"),
                }
            }
            ValueFormat::Count => group_thousands(value, 0),
            ValueFormat::Plain => format!("{value}"),
        }
    }
}

impl std::fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueFormat::Currency => write!(f, "currency"),
            ValueFormat::Count => write!(f, "count"),
            ValueFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Insert comma separators into the integer part of a fixed-precision value.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// What the tracked series is: a display name, a unit, and a value format.
///
/// Comes from configuration; lets the same server front a Bitcoin price
/// feed, a population counter, or any other single numeric series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesProfile {
    /// Display name (e.g., "BTC/USD", "World population")
    pub name: String,
    /// Unit of measurement (e.g., "USD", "people")
    pub unit: String,
    /// Display format for values
    #[serde(default)]
    pub format: ValueFormat,
}

impl SeriesProfile {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            format,
        }
    }

    /// Format a value for display per this profile
    pub fn display_value(&self, value: f64) -> String {
        self.format.format(value)
    }
}

impl Default for SeriesProfile {
    fn default() -> Self {
        Self {
            name: "series".to_string(),
            unit: String::new(),
            format: ValueFormat::Plain,
        }
    }
}

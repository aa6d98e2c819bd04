//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::DailyReport;
use crate::series::Sample;

// ============================================
// CHART DTOs
// ============================================

/// Query parameters for the chart endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Range start: RFC 3339, `YYYY-MM-DD`, or `now-24h`
    #[serde(default)]
    pub since: Option<String>,
    /// Range end, same forms as `since` (default: now)
    #[serde(default)]
    pub until: Option<String>,
    /// Shorthand window ending now, e.g. `24h`, `7d`; exclusive with since/until
    #[serde(default)]
    pub last: Option<String>,
}

/// Chart data response
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    /// What series this is
    pub series: SeriesInfo,
    /// Samples in the requested range, oldest first
    pub points: Vec<Sample>,
    /// Range metadata
    pub meta: ChartMeta,
}

/// Series identity for responses
#[derive(Debug, Serialize)]
pub struct SeriesInfo {
    pub name: String,
    pub unit: String,
    pub format: String,
}

/// Chart range metadata
#[derive(Debug, Serialize)]
pub struct ChartMeta {
    /// Number of points returned
    pub point_count: usize,
    /// Resolved range start (ms), if bounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// Resolved range end (ms), if bounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

// ============================================
// LATEST DTOs
// ============================================

/// Latest sample response (the live counter)
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    /// Timestamp of the newest sample (ms)
    pub timestamp: i64,
    /// Raw value
    pub value: f64,
    /// Value formatted per the series profile
    pub display: String,
    /// Change against the sample nearest to 24 hours earlier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<ChangeSummary>,
}

/// Change relative to an earlier reference sample
#[derive(Debug, Serialize)]
pub struct ChangeSummary {
    /// Timestamp of the reference sample (ms)
    pub reference_timestamp: i64,
    /// Value of the reference sample
    pub reference_value: f64,
    /// Absolute change
    pub change: f64,
    /// Percent change relative to the reference; 0 when the reference is 0
    pub change_pct: f64,
}

// ============================================
// REPORT DTOs
// ============================================

/// Query parameters for the report endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Day to report on, `YYYY-MM-DD` (default: today, UTC)
    #[serde(default)]
    pub date: Option<String>,
}

/// Daily report response with navigation
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// The selected day
    pub date: NaiveDate,
    /// The report, absent when the day has no samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportBody>,
    /// Nearest earlier day with data (absent at the start of the range)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_date: Option<NaiveDate>,
    /// Nearest later day with data (absent at the end of the range)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_date: Option<NaiveDate>,
}

/// Report values plus display-formatted strings
#[derive(Debug, Serialize)]
pub struct ReportBody {
    #[serde(flatten)]
    pub report: DailyReport,
    /// Formatted values for direct rendering
    pub display: ReportDisplay,
}

/// Display-formatted report values
#[derive(Debug, Serialize)]
pub struct ReportDisplay {
    pub open: String,
    pub close: String,
    pub change: String,
    pub change_pct: String,
}

/// Available days response
#[derive(Debug, Serialize)]
pub struct DaysResponse {
    pub total: usize,
    pub days: Vec<NaiveDate>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Name of the tracked series
    pub series: String,
    /// Number of samples held
    pub samples: usize,
    /// Open WebSocket connections
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}

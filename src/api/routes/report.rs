//! Report Routes
//!
//! - GET /api/v1/report - daily report with prev/next navigation
//! - GET /api/v1/days - days that have data
//!
//! The report response always carries `prev_date`/`next_date` (clamped:
//! absent past either end), so a dashboard can navigate even when the
//! selected day itself has no samples.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::api::dto::{DaysResponse, ReportBody, ReportDisplay, ReportQuery, ReportResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::report::{DailyReport, DayNavigator};

/// GET /api/v1/report
pub async fn daily_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<ReportResponse>> {
    let days = state.store.available_days().await;
    if days.is_empty() {
        return Err(ApiError::NoData);
    }

    let date = match &query.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ApiError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
        })?,
        None => Utc::now().date_naive(),
    };

    let navigator = DayNavigator::new(days, date);
    let samples = state.store.day_slice(date).await;

    let report = DailyReport::compute(date, &samples).map(|report| {
        let profile = state.store.profile();
        let display = ReportDisplay {
            open: profile.display_value(report.open),
            close: profile.display_value(report.close),
            change: format!(
                "{}{}",
                if report.change >= 0.0 { "+" } else { "" },
                profile.display_value(report.change)
            ),
            change_pct: format!(
                "{}{:.2}%",
                if report.change_pct >= 0.0 { "+" } else { "" },
                report.change_pct
            ),
        };
        ReportBody { report, display }
    });

    Ok(Json(ReportResponse {
        date,
        report,
        prev_date: navigator.peek_prev(),
        next_date: navigator.peek_next(),
    }))
}

/// GET /api/v1/days
pub async fn available_days(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DaysResponse>> {
    let days = state.store.available_days().await;

    Ok(Json(DaysResponse {
        total: days.len(),
        days,
    }))
}

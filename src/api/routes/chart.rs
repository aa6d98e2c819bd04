//! Chart Route
//!
//! - GET /api/v1/chart - series data for the line chart
//!
//! With no parameters the full series is returned. `last=24h` selects a
//! window ending now; `since`/`until` accept RFC 3339 timestamps, bare
//! dates, or `now-<duration>` expressions.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{ChartMeta, ChartQuery, ChartResponse, SeriesInfo};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::series::TimeRange;
use crate::timeexpr;

/// GET /api/v1/chart
pub async fn chart_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let now = Utc::now().timestamp_millis();
    let bounds = resolve_bounds(&query, now)?;

    let points = match bounds {
        Some((start, end)) => {
            let range = TimeRange::try_new(start, end).ok_or_else(|| {
                ApiError::Validation("Range start must be before range end".to_string())
            })?;
            state.store.range(range).await
        }
        None => state.store.all().await,
    };

    let profile = state.store.profile();
    Ok(Json(ChartResponse {
        series: SeriesInfo {
            name: profile.name.clone(),
            unit: profile.unit.clone(),
            format: profile.format.to_string(),
        },
        meta: ChartMeta {
            point_count: points.len(),
            start: bounds.map(|(s, _)| s),
            end: bounds.map(|(_, e)| e),
        },
        points,
    }))
}

/// Resolve query parameters into an optional (start, end) pair in ms.
fn resolve_bounds(query: &ChartQuery, now: i64) -> ApiResult<Option<(i64, i64)>> {
    if query.last.is_some() && (query.since.is_some() || query.until.is_some()) {
        return Err(ApiError::Validation(
            "'last' cannot be combined with 'since'/'until'".to_string(),
        ));
    }

    if let Some(last) = &query.last {
        let window = timeexpr::parse_duration_ms(last)?;
        return Ok(Some((now - window, now + 1)));
    }

    match (&query.since, &query.until) {
        (None, None) => Ok(None),
        (since, until) => {
            let start = match since {
                Some(expr) => timeexpr::parse_instant(expr, now)?,
                None => i64::MIN + 1,
            };
            let end = match until {
                Some(expr) => timeexpr::parse_instant(expr, now)?,
                None => now + 1,
            };
            Ok(Some((start, end)))
        }
    }
}

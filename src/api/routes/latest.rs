//! Latest Route
//!
//! - GET /api/v1/latest - newest sample, formatted for the live counter,
//!   with the change against the sample nearest to 24 hours earlier

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::api::dto::{ChangeSummary, LatestResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

const DAY_MS: i64 = 24 * 3600 * 1000;

/// GET /api/v1/latest
pub async fn latest_sample(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LatestResponse>> {
    let latest = state.store.latest().await.ok_or(ApiError::NoData)?;

    // "Value 24h ago": the sample closest to one day before the newest one.
    // With only the newest sample in range the comparison is meaningless.
    let change_24h = state
        .store
        .nearest(latest.timestamp - DAY_MS)
        .await
        .filter(|reference| reference.timestamp < latest.timestamp)
        .map(|reference| {
            let change = latest.value - reference.value;
            let change_pct = if reference.value != 0.0 {
                (change / reference.value) * 100.0
            } else {
                0.0
            };
            ChangeSummary {
                reference_timestamp: reference.timestamp,
                reference_value: reference.value,
                change,
                change_pct,
            }
        });

    Ok(Json(LatestResponse {
        timestamp: latest.timestamp,
        value: latest.value,
        display: state.store.profile().display_value(latest.value),
        change_24h,
    }))
}

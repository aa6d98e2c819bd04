//! Pulseboard REST API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /` - Embedded dashboard page
//!
//! ## Data
//! - `GET /api/v1/chart` - Chart series (optional `since`/`until`/`last`)
//! - `GET /api/v1/latest` - Newest sample with 24h change
//! - `GET /api/v1/report` - Daily report with prev/next navigation
//! - `GET /api/v1/days` - Days that have data
//!
//! ## Live updates
//! - `GET /api/v1/ws` - WebSocket push of ingested samples
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiSettings;
use crate::live::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chart", get(routes::chart::chart_data))
        .route("/latest", get(routes::latest::latest_sample))
        .route("/report", get(routes::report::daily_report))
        .route("/days", get(routes::report::available_days))
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::dashboard_page))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, settings: &ApiSettings) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Pulseboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Pulseboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::LiveHub;
    use crate::series::{Sample, SeriesProfile, SeriesStore, ValueFormat};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use tower::util::ServiceExt;

    async fn create_test_app(samples: Vec<Sample>) -> Router {
        let hub = Arc::new(LiveHub::default());
        let profile = SeriesProfile::new("BTC/USD", "USD", ValueFormat::Currency);
        let store = Arc::new(SeriesStore::new(profile, Arc::clone(&hub)));
        store.merge(samples).await;

        build_router(AppState::new(store, hub))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(vec![]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full_reports_sample_count() {
        let app = create_test_app(vec![Sample::at(1000, 1.0)]).await;
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["samples"], 1);
        assert_eq!(body["series"], "BTC/USD");
    }

    #[tokio::test]
    async fn test_dashboard_page_served() {
        let app = create_test_app(vec![]).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chart_empty_series() {
        let app = create_test_app(vec![]).await;
        let (status, body) = get_json(app, "/api/v1/chart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["point_count"], 0);
    }

    #[tokio::test]
    async fn test_chart_returns_points() {
        let app = create_test_app(vec![Sample::at(1000, 1.0), Sample::at(2000, 2.0)]).await;
        let (status, body) = get_json(app, "/api/v1/chart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["point_count"], 2);
        assert_eq!(body["points"][0]["value"], 1.0);
        assert_eq!(body["series"]["name"], "BTC/USD");
    }

    #[tokio::test]
    async fn test_chart_rejects_bad_window() {
        let app = create_test_app(vec![]).await;
        let (status, body) = get_json(app, "/api/v1/chart?last=soon").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "TIME_EXPR_ERROR");
    }

    #[tokio::test]
    async fn test_latest_no_data() {
        let app = create_test_app(vec![]).await;
        let (status, body) = get_json(app, "/api/v1/latest").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_latest_with_24h_change() {
        let now = Utc::now().timestamp_millis();
        let day = 24 * 3600 * 1000;
        let app = create_test_app(vec![
            Sample::at(now - day, 100.0),
            Sample::at(now, 110.0),
        ])
        .await;

        let (status, body) = get_json(app, "/api/v1/latest").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], 110.0);
        assert_eq!(body["display"], "$110.00");
        assert_eq!(body["change_24h"]["change"], 10.0);
        assert_eq!(body["change_24h"]["reference_value"], 100.0);
    }

    #[tokio::test]
    async fn test_latest_single_sample_has_no_change() {
        let app = create_test_app(vec![Sample::at(1000, 1.0)]).await;
        let (status, body) = get_json(app, "/api/v1/latest").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("change_24h").is_none());
    }

    #[tokio::test]
    async fn test_report_no_data() {
        let app = create_test_app(vec![]).await;
        let (status, body) = get_json(app, "/api/v1/report").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_report_for_specific_day() {
        // 2024-01-15 10:00 and 11:00 UTC
        let app = create_test_app(vec![
            Sample::at(1_705_312_800_000, 100.0),
            Sample::at(1_705_316_400_000, 120.0),
        ])
        .await;

        let (status, body) = get_json(app, "/api/v1/report?date=2024-01-15").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["open"], 100.0);
        assert_eq!(body["report"]["close"], 120.0);
        assert_eq!(body["report"]["change"], 20.0);
        assert_eq!(body["report"]["display"]["change"], "+$20.00");
        assert!(body.get("prev_date").is_none());
        assert!(body.get("next_date").is_none());
    }

    #[tokio::test]
    async fn test_report_navigation_fields() {
        let day = 24 * 3600 * 1000;
        // Three consecutive days starting 2024-01-15
        let base = 1_705_312_800_000i64;
        let app = create_test_app(vec![
            Sample::at(base, 1.0),
            Sample::at(base + day, 2.0),
            Sample::at(base + 2 * day, 3.0),
        ])
        .await;

        let (status, body) = get_json(app, "/api/v1/report?date=2024-01-16").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prev_date"], "2024-01-15");
        assert_eq!(body["next_date"], "2024-01-17");
    }

    #[tokio::test]
    async fn test_report_empty_day_still_navigates() {
        let app = create_test_app(vec![Sample::at(1_705_312_800_000, 1.0)]).await;

        let (status, body) = get_json(app, "/api/v1/report?date=2024-02-01").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("report").is_none());
        assert_eq!(body["prev_date"], "2024-01-15");
    }

    #[tokio::test]
    async fn test_report_rejects_bad_date() {
        let app = create_test_app(vec![Sample::at(1000, 1.0)]).await;
        let (status, body) = get_json(app, "/api/v1/report?date=January").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_days_listing() {
        let day = 24 * 3600 * 1000;
        let base = 1_705_312_800_000i64;
        let app = create_test_app(vec![
            Sample::at(base, 1.0),
            Sample::at(base + 2 * day, 3.0),
        ])
        .await;

        let (status, body) = get_json(app, "/api/v1/days").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["days"][0], "2024-01-15");
        assert_eq!(body["days"][1], "2024-01-17");
    }
}

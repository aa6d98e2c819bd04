//! Dashboard Route
//!
//! - GET / - the embedded single-page dashboard
//!
//! The page is compiled into the binary; it consumes the JSON API and the
//! WebSocket, so the server ships as one self-contained executable.

use axum::response::Html;

/// GET /
pub async fn dashboard_page() -> Html<&'static str> {
    Html(include_str!("../../../assets/dashboard.html"))
}

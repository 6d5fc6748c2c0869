//! Static asset handlers for the invio-web UI
//!
//! Embeds and serves the shared CSS/JS at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const INVIO_CSS: &str = include_str!("../../../static/invio.css");
const INVIO_JS: &str = include_str!("../../../static/invio.js");

/// GET /static/invio.css
pub async fn serve_invio_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        INVIO_CSS,
    )
        .into_response()
}

/// GET /static/invio.js
pub async fn serve_invio_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        INVIO_JS,
    )
        .into_response()
}

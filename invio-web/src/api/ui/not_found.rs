//! Catch-all not-found screen

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Fallback handler for unknown routes
pub async fn not_found_page() -> impl IntoResponse {
    let content = r#"        <h1>404</h1>
        <p class="subtitle">Oops! Page not found</p>

        <div class="card">
            <p>The page you are looking for does not exist.</p>
            <div class="btn-row">
                <a class="btn btn-primary" href="/">Return to Home</a>
            </div>
        </div>"#;

    (
        StatusCode::NOT_FOUND,
        super::page("Page Not Found", "", content, ""),
    )
}

//! UI routes - HTML screens for the intake workflow
//!
//! Every screen is server-rendered chrome plus an inline script that
//! talks to the JSON API. Shared styles and helpers are embedded at
//! compile time and served under /static/.
//!
//! Screens:
//! - **Home** (`home`): entry links
//! - **Upload** (`upload`): file selection and extraction kickoff
//! - **Review** (`review`): editable extracted fields
//! - **Confirm** (`confirm`): read-only snapshot, final submission
//! - **Search** (`search`): durable list with live filtering
//! - **Inspect** (`inspect`): edit one saved record
//! - **Download** (`download`): fixed-projection JSON download
//! - **Not Found** (`not_found`): catch-all fallback

use axum::response::Html;
use axum::{routing::get, Router};

use crate::AppState;

mod confirm;
mod download;
mod home;
mod inspect;
mod not_found;
mod review;
mod search;
mod static_assets;
mod upload;

pub use not_found::not_found_page;

use confirm::confirm_page;
use download::download_page;
use home::home_page;
use inspect::inspect_page;
use review::review_page;
use search::search_page;
use static_assets::{serve_invio_css, serve_invio_js};
use upload::upload_page;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        // Screen routes
        .route("/", get(home_page))
        .route("/upload-invoice", get(upload_page))
        .route("/upload-invoice/review", get(review_page))
        .route("/upload-invoice/confirm", get(confirm_page))
        .route("/search-invoice", get(search_page))
        .route("/search-invoice/inspect/:id", get(inspect_page))
        .route("/search-invoice/download/:id", get(download_page))
        // Static assets
        .route("/static/invio.css", get(serve_invio_css))
        .route("/static/invio.js", get(serve_invio_js))
}

/// Shared page shell: header, nav, toast container, footer.
///
/// `active` is the nav entry to highlight: "home", "upload" or "search".
pub(crate) fn page(title: &str, active: &str, content: &str, script: &str) -> Html<String> {
    let version = env!("CARGO_PKG_VERSION");
    let nav_class = |entry: &str| if entry == active { " class=\"active\"" } else { "" };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Invio</title>
    <link rel="stylesheet" href="/static/invio.css">
</head>
<body>
    <header>
        <div class="header-content">
            <a class="brand" href="/">Invio</a>
            <nav>
                <a href="/"{home_class}>Home</a>
                <a href="/upload-invoice"{upload_class}>Upload Invoice</a>
                <a href="/search-invoice"{search_class}>Search Invoice</a>
            </nav>
        </div>
    </header>
    <div id="toast-container"></div>
    <div class="container">
{content}
    </div>
    <footer>invio-web v{version}</footer>
    <script src="/static/invio.js"></script>
    <script>
{script}
    </script>
</body>
</html>
"#,
        title = title,
        home_class = nav_class("home"),
        upload_class = nav_class("upload"),
        search_class = nav_class("search"),
        content = content,
        version = version,
        script = script,
    ))
}

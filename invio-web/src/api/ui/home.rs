//! Home screen - entry links to the two flows

use axum::response::IntoResponse;

/// GET /
pub async fn home_page() -> impl IntoResponse {
    let content = r#"        <h1>Invoice Management</h1>
        <p class="subtitle">Upload invoices for automated extraction, or search the ones you already saved</p>

        <div class="home-cards">
            <a class="home-card" href="/upload-invoice">
                <h2>Upload Invoice</h2>
                <p class="muted">Send a PDF for extraction, review the fields and save the record.</p>
            </a>
            <a class="home-card" href="/search-invoice">
                <h2>Search Invoice</h2>
                <p class="muted">Browse, inspect and download the invoices saved on this machine.</p>
            </a>
        </div>"#;

    super::page("Home", "home", content, "")
}

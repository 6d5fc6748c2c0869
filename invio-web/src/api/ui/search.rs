//! Search screen - durable list with live filtering

use axum::response::IntoResponse;

/// GET /search-invoice
pub async fn search_page() -> impl IntoResponse {
    let content = r#"        <h1>Search Invoice</h1>
        <p class="subtitle">Search and manage your uploaded invoices</p>

        <div class="card">
            <div class="card-title">Invoice Records</div>
            <div class="search-box">
                <input id="search-input" placeholder="Search by invoice number, vendor, or description...">
            </div>
            <div id="results"></div>
        </div>"#;

    let script = r#"const searchInput = document.getElementById('search-input');
const results = document.getElementById('results');

function rowHtml(invoice) {
    return '<tr>' +
        '<td><strong>' + escapeHtml(invoice.invoiceNumber) + '</strong></td>' +
        '<td>' + escapeHtml(invoice.invoiceDate) + '</td>' +
        '<td>' + escapeHtml(invoice.vendorName) + '</td>' +
        '<td>$' + escapeHtml(invoice.totalAmount) + '</td>' +
        '<td class="muted">' + escapeHtml(invoice.fileName) + '</td>' +
        '<td><a class="btn btn-outline" href="/search-invoice/inspect/' +
            encodeURIComponent(invoice.id) + '">Inspect Invoice</a></td>' +
        '</tr>';
}

async function runSearch() {
    try {
        const query = encodeURIComponent(searchInput.value);
        const invoices = await apiFetch('/api/invoices?q=' + query);
        if (invoices.length === 0) {
            results.innerHTML = '<div class="empty-state">No invoices found</div>';
            return;
        }
        results.innerHTML =
            '<table><thead><tr>' +
            '<th>Invoice Number</th><th>Date</th><th>Vendor</th>' +
            '<th>Amount</th><th>File</th><th></th>' +
            '</tr></thead><tbody>' +
            invoices.map(rowHtml).join('') +
            '</tbody></table>';
    } catch (err) {
        handleApiError(err);
    }
}

searchInput.addEventListener('input', runSearch);
runSearch();"#;

    super::page("Search Invoice", "search", content, script)
}

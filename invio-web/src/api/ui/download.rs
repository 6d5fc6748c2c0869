//! Download screen - fixed-projection JSON download

use axum::extract::Path;
use axum::response::IntoResponse;

/// GET /search-invoice/download/{id}
pub async fn download_page(Path(id): Path<String>) -> impl IntoResponse {
    let content = r#"        <h1>Download Invoice</h1>
        <p class="subtitle">Preview and download invoice data</p>

        <div class="grid-2">
            <div class="card">
                <div class="card-title">Original File</div>
                <div class="file-card">
                    <div class="file-name" id="file-name"></div>
                    <p class="muted" id="file-size"></p>
                    <p class="muted" id="upload-date"></p>
                </div>
            </div>

            <div class="card">
                <div class="card-title">Download Preview</div>
                <div id="fields-view"></div>
                <button id="download-btn" class="btn btn-primary btn-block">Download JSON</button>
            </div>
        </div>"#;

    let id_json = serde_json::to_string(&id).unwrap_or_else(|_| "\"\"".to_string());
    let script = format!(
        r#"const INVOICE_ID = {id_json};

async function loadInvoice() {{
    try {{
        const data = await apiFetch('/api/invoices/' + encodeURIComponent(INVOICE_ID));
        document.getElementById('file-name').textContent = data.fileName;
        document.getElementById('file-size').textContent = formatKb(data.fileSize);
        document.getElementById('upload-date').textContent =
            'Uploaded: ' + new Date(data.uploadDate).toLocaleDateString();

        const view = document.getElementById('fields-view');
        view.innerHTML = data.fields.map(f =>
            '<div class="field-box">' +
            '<div class="field-label">' + escapeHtml(f.label) + '</div>' +
            '<div class="field-value">' + (escapeHtml(f.value) || '&mdash;') + '</div>' +
            '</div>'
        ).join('');
    }} catch (err) {{
        toast(err.message || 'Invoice not found', 'error');
        if (err.code === 'NOT_FOUND') {{
            setTimeout(() => {{ window.location.href = '/search-invoice'; }}, 1200);
        }}
    }}
}}

document.getElementById('download-btn').addEventListener('click', () => {{
    window.location.href = '/api/invoices/' + encodeURIComponent(INVOICE_ID) + '/download';
    toast('Invoice downloaded successfully!', 'success');
}});

loadInvoice();"#,
        id_json = id_json
    );

    super::page("Download Invoice", "search", content, &script)
}

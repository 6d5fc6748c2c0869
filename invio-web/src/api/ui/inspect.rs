//! Inspect screen - edit one saved record

use axum::extract::Path;
use axum::response::IntoResponse;

/// GET /search-invoice/inspect/{id}
pub async fn inspect_page(Path(id): Path<String>) -> impl IntoResponse {
    let content = r#"        <h1>Inspect Invoice</h1>
        <p class="subtitle">View and edit invoice details</p>

        <div class="grid-2">
            <div class="card">
                <div class="card-title">Invoice File</div>
                <div class="file-card">
                    <div class="file-name" id="file-name"></div>
                    <p class="muted" id="file-size"></p>
                    <p class="muted" id="upload-date"></p>
                </div>
            </div>

            <div class="card">
                <div class="card-title">Invoice Information (Editable)</div>
                <div id="fields-form"></div>
                <div class="btn-row">
                    <button id="save-btn" class="btn btn-primary">Save Changes</button>
                    <button id="download-btn" class="btn btn-outline">Download</button>
                </div>
            </div>
        </div>"#;

    // The id is server-provided; JSON-encode it into the script.
    let id_json = serde_json::to_string(&id).unwrap_or_else(|_| "\"\"".to_string());
    let script = format!(
        r#"const INVOICE_ID = {id_json};

function notFound(err) {{
    toast(err.message || 'Invoice not found', 'error');
    if (err.code === 'NOT_FOUND') {{
        setTimeout(() => {{ window.location.href = '/search-invoice'; }}, 1200);
        return true;
    }}
    return false;
}}

function renderInvoice(data) {{
    document.getElementById('file-name').textContent = data.fileName;
    document.getElementById('file-size').textContent = formatKb(data.fileSize);
    document.getElementById('upload-date').textContent =
        'Uploaded: ' + new Date(data.uploadDate).toLocaleDateString();

    const form = document.getElementById('fields-form');
    form.innerHTML = data.fields.map(f =>
        '<div class="form-group">' +
        '<label for="field-' + f.key + '">' + escapeHtml(f.label) + '</label>' +
        '<input id="field-' + f.key + '" data-key="' + f.key + '" value="' + escapeHtml(f.value) + '">' +
        '</div>'
    ).join('');
}}

async function loadInvoice() {{
    try {{
        renderInvoice(await apiFetch('/api/invoices/' + encodeURIComponent(INVOICE_ID)));
    }} catch (err) {{
        if (!notFound(err)) {{
            handleApiError(err);
        }}
    }}
}}

document.getElementById('save-btn').addEventListener('click', async () => {{
    const patch = {{}};
    document.querySelectorAll('#fields-form input').forEach(el => {{
        patch[el.dataset.key] = el.value;
    }});
    try {{
        const data = await apiFetch('/api/invoices/' + encodeURIComponent(INVOICE_ID), {{
            method: 'PUT',
            headers: {{ 'Content-Type': 'application/json' }},
            body: JSON.stringify(patch),
        }});
        renderInvoice(data);
        toast('Invoice updated successfully!', 'success');
    }} catch (err) {{
        if (!notFound(err)) {{
            handleApiError(err);
        }}
    }}
}});

document.getElementById('download-btn').addEventListener('click', () => {{
    window.location.href = '/search-invoice/download/' + encodeURIComponent(INVOICE_ID);
}});

loadInvoice();"#,
        id_json = id_json
    );

    super::page("Inspect Invoice", "search", content, &script)
}

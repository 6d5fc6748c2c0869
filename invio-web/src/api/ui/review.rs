//! Review screen - editable extracted fields
//!
//! Loads the session snapshot from the API; a missing session routes
//! straight back to the upload screen.

use axum::response::IntoResponse;

/// GET /upload-invoice/review
pub async fn review_page() -> impl IntoResponse {
    let content = r#"        <h1>Confirm Invoice Details</h1>
        <p class="subtitle">Review and edit the extracted invoice information</p>

        <div class="grid-2">
            <div class="card">
                <div class="card-title">Uploaded File Preview</div>
                <div class="file-card">
                    <div class="file-name" id="file-name"></div>
                    <p class="muted" id="file-size"></p>
                </div>
            </div>

            <div class="card">
                <div class="card-title">Invoice Information (Editable)</div>
                <div id="fields-form"></div>
                <div class="btn-row">
                    <button id="confirm-btn" class="btn btn-primary">Confirm Details</button>
                    <button id="cancel-btn" class="btn btn-danger">Cancel</button>
                </div>
            </div>
        </div>"#;

    let script = r#"async function loadReview() {
    try {
        const data = await apiFetch('/api/session/review');
        document.getElementById('file-name').textContent = data.file.name;
        document.getElementById('file-size').textContent = formatKb(data.file.size);

        const form = document.getElementById('fields-form');
        form.innerHTML = data.fields.map(f =>
            '<div class="form-group">' +
            '<label for="field-' + f.key + '">' + escapeHtml(f.label) + '</label>' +
            '<input id="field-' + f.key + '" data-key="' + f.key + '" value="' + escapeHtml(f.value) + '">' +
            '</div>'
        ).join('');
    } catch (err) {
        handleApiError(err);
    }
}

document.getElementById('confirm-btn').addEventListener('click', async () => {
    const patch = {};
    document.querySelectorAll('#fields-form input').forEach(el => {
        patch[el.dataset.key] = el.value;
    });
    try {
        const data = await apiFetch('/api/session/review', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(patch),
        });
        window.location.href = data.next;
    } catch (err) {
        handleApiError(err);
    }
});

document.getElementById('cancel-btn').addEventListener('click', async () => {
    try {
        const data = await apiFetch('/api/session/cancel', { method: 'POST' });
        toast('Upload cancelled', 'warning');
        window.location.href = data.next;
    } catch (err) {
        handleApiError(err);
    }
});

loadReview();"#;

    super::page("Review Invoice", "upload", content, script)
}

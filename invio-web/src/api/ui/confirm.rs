//! Confirmation screen - read-only snapshot, final submission
//!
//! All action buttons are disabled while the submission is in flight
//! (the duplicate-submission guard). "Back to Edit" keeps the session;
//! "Cancel" drops it.

use axum::response::IntoResponse;

/// GET /upload-invoice/confirm
pub async fn confirm_page() -> impl IntoResponse {
    let content = r#"        <h1>Final Preview</h1>
        <p class="subtitle">Review the final invoice before saving</p>

        <div class="grid-2">
            <div class="card">
                <div class="card-title">Uploaded File</div>
                <div class="file-card">
                    <div class="file-name" id="file-name"></div>
                    <p class="muted" id="file-size"></p>
                </div>
            </div>

            <div class="card">
                <div class="card-title">Invoice Information</div>
                <div id="fields-view"></div>
                <button id="submit-btn" class="btn btn-primary btn-block">Save Invoice</button>
                <div class="btn-row">
                    <button id="back-btn" class="btn btn-outline">Back to Edit</button>
                    <button id="cancel-btn" class="btn btn-danger">Cancel</button>
                </div>
            </div>
        </div>"#;

    let script = r#"const submitBtn = document.getElementById('submit-btn');
const backBtn = document.getElementById('back-btn');
const cancelBtn = document.getElementById('cancel-btn');

function setBusy(busy) {
    submitBtn.disabled = busy;
    backBtn.disabled = busy;
    cancelBtn.disabled = busy;
}

async function loadConfirm() {
    try {
        const data = await apiFetch('/api/session/confirm');
        document.getElementById('file-name').textContent = data.file.name;
        document.getElementById('file-size').textContent = formatKb(data.file.size);

        const view = document.getElementById('fields-view');
        view.innerHTML = data.fields.map(f =>
            '<div class="field-box">' +
            '<div class="field-label">' + escapeHtml(f.label) + '</div>' +
            '<div class="field-value">' + (escapeHtml(f.value) || '&mdash;') + '</div>' +
            '</div>'
        ).join('');
    } catch (err) {
        handleApiError(err);
    }
}

submitBtn.addEventListener('click', async () => {
    setBusy(true);
    submitBtn.textContent = 'Saving...';
    try {
        const data = await apiFetch('/api/session/submit', { method: 'POST' });
        toast('Invoice saved successfully!', 'success');
        window.location.href = data.next;
    } catch (err) {
        handleApiError(err);
        setBusy(false);
        submitBtn.textContent = 'Save Invoice';
    }
});

backBtn.addEventListener('click', () => {
    // Session stays intact; the review screen reloads the edited snapshot.
    window.location.href = '/upload-invoice/review';
});

cancelBtn.addEventListener('click', async () => {
    setBusy(true);
    try {
        const data = await apiFetch('/api/session/cancel', { method: 'POST' });
        toast('Upload cancelled', 'warning');
        window.location.href = data.next;
    } catch (err) {
        handleApiError(err);
        setBusy(false);
    }
});

loadConfirm();"#;

    super::page("Confirm Invoice", "upload", content, script)
}

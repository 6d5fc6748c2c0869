//! Upload screen - file selection and extraction kickoff

use axum::response::IntoResponse;

/// GET /upload-invoice
///
/// The confirm button stays disabled while the extraction request is in
/// flight; on failure the user stays here and retries manually.
pub async fn upload_page() -> impl IntoResponse {
    let content = r#"        <h1>Upload Invoice</h1>
        <p class="subtitle">Upload your invoice file for processing</p>

        <div class="card">
            <div class="card-title">Select Invoice File</div>
            <p class="muted">Choose a PDF file to upload</p>

            <div class="dropzone">
                <input type="file" id="file-input" accept=".pdf">
                <label for="file-input">Click to choose a file</label>
                <p class="muted">PDF only (max. 10MB)</p>
            </div>

            <div id="file-info" class="file-box hidden"></div>

            <button id="upload-btn" class="btn btn-primary btn-block" disabled>Confirm Upload</button>
        </div>"#;

    let script = r#"const fileInput = document.getElementById('file-input');
const fileInfo = document.getElementById('file-info');
const uploadBtn = document.getElementById('upload-btn');
let selectedFile = null;

fileInput.addEventListener('change', () => {
    selectedFile = fileInput.files[0] || null;
    if (selectedFile) {
        fileInfo.classList.remove('hidden');
        fileInfo.innerHTML =
            '<strong>' + escapeHtml(selectedFile.name) + '</strong>' +
            '<span class="muted">' + formatKb(selectedFile.size) + '</span>';
    } else {
        fileInfo.classList.add('hidden');
    }
    uploadBtn.disabled = !selectedFile;
});

uploadBtn.addEventListener('click', async () => {
    if (!selectedFile) {
        toast('Please select a file to upload', 'error');
        return;
    }
    uploadBtn.disabled = true;
    uploadBtn.textContent = 'Processing...';

    const form = new FormData();
    form.append('file', selectedFile);

    try {
        const data = await apiFetch('/api/upload', { method: 'POST', body: form });
        if (data.fieldsExtracted) {
            toast('File processed successfully!', 'success');
        } else {
            toast('No invoice data returned from the server.', 'warning');
        }
        window.location.href = data.next;
    } catch (err) {
        handleApiError(err);
        uploadBtn.disabled = false;
        uploadBtn.textContent = 'Confirm Upload';
    }
});"#;

    super::page("Upload Invoice", "upload", content, script)
}

//! Durable scope of the storage bridge
//!
//! One JSON file under the root folder holds the full array of saved
//! invoices. Every operation reads the whole array and writes it back.
//! Writers within this process are serialized; a second process writing
//! the same file is last-writer-wins (known limitation, inherited from
//! the single-user deployment model).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use invio_common::{Error, Result};

use crate::models::{InvoicePatch, SavedInvoice};

const RECORDS_FILE: &str = "invoices.json";

/// Durable invoice list backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Store handle for `<root_folder>/invoices.json`. The file is
    /// created lazily on the first append.
    pub fn open(root_folder: &Path) -> Self {
        Self {
            path: root_folder.join(RECORDS_FILE),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read the full list. An absent file is an empty list; a file that
    /// fails to parse is an error (no silent repair).
    pub async fn list(&self) -> Result<Vec<SavedInvoice>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(&self, id: &str) -> Result<Option<SavedInvoice>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    /// Append one record: read list, push, write back.
    pub async fn append(&self, record: SavedInvoice) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.list().await?;
        let id = record.id.clone();
        records.push(record);
        self.write(&records).await?;
        info!(invoice_id = %id, total = records.len(), "Invoice appended to record store");
        Ok(())
    }

    /// Patch the record with the matching id and write the list back.
    pub async fn update(&self, id: &str, patch: &InvoicePatch) -> Result<SavedInvoice> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.list().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Invoice not found: {}", id)))?;
        patch.apply(&mut record.fields);
        let updated = record.clone();
        self.write(&records).await?;
        info!(invoice_id = %id, "Invoice updated in record store");
        Ok(updated)
    }

    async fn write(&self, records: &[SavedInvoice]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| Error::Storage(format!("Write {} failed: {}", self.path.display(), e)))
    }
}

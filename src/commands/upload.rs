//! Upload command implementation

use crate::backend::Backend;
use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Upload outcome for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub doc_id: i64,
    pub filename: String,
    pub chunks_count: u32,
}

/// Upload a single document
pub async fn cmd_upload(backend: &dyn Backend, path: &Path) -> Result<UploadOutcome> {
    info!("Uploading {}", path.display());

    let receipt = backend.upload(path).await?;
    let filename = receipt.filename.unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    });

    Ok(UploadOutcome {
        doc_id: receipt.doc_id,
        filename,
        chunks_count: receipt.chunks_count,
    })
}

/// Print upload outcome to console
pub fn print_upload(outcome: &UploadOutcome) {
    println!("✓ Uploaded {} (document {})", outcome.filename, outcome.doc_id);
    println!("  Split into {} chunks", outcome.chunks_count);
}

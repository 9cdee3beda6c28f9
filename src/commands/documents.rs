//! Document listing and removal commands

use crate::backend::Backend;
use crate::corpus::{CorpusStore, Document};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use tracing::info;

/// List the documents known to the backend
pub async fn cmd_list_documents(backend: &dyn Backend) -> Result<Vec<Document>> {
    info!("Listing documents");

    let mut corpus = CorpusStore::new();
    corpus.refresh(backend).await?;
    Ok(corpus.documents().to_vec())
}

/// Remove a document and its index data
pub async fn cmd_remove_document(backend: &dyn Backend, id: i64) -> Result<Document> {
    info!("Removing document {}", id);

    let mut corpus = CorpusStore::new();
    corpus.refresh(backend).await?;
    let removed = corpus
        .get(id)
        .cloned()
        .ok_or(Error::DocumentNotFound(id))?;
    corpus.delete(backend, id).await?;
    Ok(removed)
}

/// Print document list to console
pub fn print_documents(documents: &[Document]) {
    println!("\n📚 Documents\n");

    if documents.is_empty() {
        println!("No documents uploaded yet. Use 'documind upload' to add one.");
        return;
    }

    for doc in documents {
        println!("• {} (id {})", doc.filename, doc.id);
        if let Some(pages) = doc.total_pages {
            println!("  Pages: {}", pages);
        }
        if let Some(chunks) = doc.chunk_count {
            println!("  Chunks: {}", chunks);
        }
        if let Some(date) = &doc.upload_date {
            println!("  Uploaded: {}", format_upload_date(date));
        }
        if let Some(summary) = &doc.summary {
            println!("  {}", summary);
        }
        println!();
    }
}

/// Print removal confirmation to console
pub fn print_remove(removed: &Document) {
    println!("✓ Removed {} (document {})", removed.filename, removed.id);
}

/// Render the backend's ISO timestamp, with or without a zone offset
fn format_upload_date(raw: &str) -> String {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return date.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{doc, FakeBackend};
    use std::sync::Arc;

    #[test]
    fn test_format_upload_date() {
        assert_eq!(
            format_upload_date("2026-08-01T10:30:00"),
            "2026-08-01 10:30"
        );
        assert_eq!(
            format_upload_date("2026-08-01T10:30:00.123456"),
            "2026-08-01 10:30"
        );
        assert_eq!(
            format_upload_date("2026-08-01T10:30:00+02:00"),
            "2026-08-01 10:30"
        );
        assert_eq!(format_upload_date("not a date"), "not a date");
    }

    #[tokio::test]
    async fn test_remove_unknown_document() {
        let backend = Arc::new(FakeBackend::new());
        let err = cmd_remove_document(&backend, 42).await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(42)));
    }

    #[tokio::test]
    async fn test_remove_document() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed(vec![doc(1, "a.pdf"), doc(2, "b.txt")]);

        let removed = cmd_remove_document(&backend, 1).await.unwrap();
        assert_eq!(removed.filename, "a.pdf");

        let remaining = cmd_list_documents(&backend).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
    }
}

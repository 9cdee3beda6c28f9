//! Corpus state: the known documents and the active question scope

use crate::backend::{Answer, Backend, UploadReceipt};
use crate::error::{Error, Result};
use crate::transcript::SourceRef;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A document known to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Reported by newer backend revisions only
    #[serde(default, alias = "chunks_count")]
    pub chunk_count: Option<u32>,
}

/// The document (or all documents) a question is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Document(i64),
}

impl Scope {
    /// Wire encoding: `All` is an absent document id
    pub fn doc_id(&self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Document(id) => Some(*id),
        }
    }
}

/// Holds the corpus snapshot and the active scope.
///
/// Invariant: a `Scope::Document` selection always references a document
/// present in the snapshot. Every mutating method re-establishes this
/// before returning, success or failure.
#[derive(Debug, Default)]
pub struct CorpusStore {
    documents: Vec<Document>,
    scope: Scope,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.documents.iter().any(|doc| doc.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn filename_of(&self, id: i64) -> Option<&str> {
        self.get(id).map(|doc| doc.filename.as_str())
    }

    /// Replace the snapshot with a fresh listing.
    ///
    /// The swap is atomic: a failed fetch leaves the previous snapshot in
    /// place. A selection that vanished from the listing resets to `All`.
    pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<()> {
        let documents = backend.list_documents().await?;
        debug!("Corpus refreshed: {} documents", documents.len());
        self.documents = documents;
        if let Scope::Document(id) = self.scope {
            if !self.contains(id) {
                self.scope = Scope::All;
            }
        }
        Ok(())
    }

    /// Set the scope. `None` selects all documents; `Some(id)` requires
    /// the document to be in the current snapshot. The store does not
    /// refresh on its own; call [`refresh`](Self::refresh) first if the
    /// snapshot may be stale.
    pub fn select(&mut self, id: Option<i64>) -> Result<()> {
        match id {
            None => {
                self.scope = Scope::All;
                Ok(())
            }
            Some(id) if self.contains(id) => {
                self.scope = Scope::Document(id);
                Ok(())
            }
            Some(id) => Err(Error::InvalidScope(id)),
        }
    }

    /// Upload a file, refresh the snapshot, and select the new document.
    /// On failure the corpus and scope are left unchanged.
    pub async fn upload(&mut self, backend: &dyn Backend, path: &Path) -> Result<UploadReceipt> {
        let receipt = backend.upload(path).await?;
        self.refresh(backend).await?;
        if self.contains(receipt.doc_id) {
            self.scope = Scope::Document(receipt.doc_id);
        }
        Ok(receipt)
    }

    /// Delete a document and refresh the snapshot.
    ///
    /// A matching selection is cleared before the refresh round trip, so a
    /// dangling scope is never observable.
    pub async fn delete(&mut self, backend: &dyn Backend, id: i64) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::DocumentNotFound(id));
        }
        backend.delete_document(id).await?;
        if self.scope == Scope::Document(id) {
            self.scope = Scope::All;
        }
        self.refresh(backend).await?;
        Ok(())
    }

    /// Join answer attribution into display references.
    ///
    /// Filenames reported by the backend pair positionally with document
    /// ids. When only ids arrive (one per matched chunk), repeats collapse
    /// and filenames come from the snapshot, falling back to `document <id>`.
    pub fn source_refs(&self, answer: &Answer) -> Vec<SourceRef> {
        if !answer.source_filenames.is_empty() {
            return answer
                .source_filenames
                .iter()
                .enumerate()
                .map(|(index, filename)| SourceRef {
                    doc_id: answer.sources.get(index).copied(),
                    filename: filename.clone(),
                })
                .collect();
        }

        let mut seen = Vec::new();
        let mut refs = Vec::new();
        for &id in &answer.sources {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let filename = self
                .filename_of(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("document {}", id));
            refs.push(SourceRef {
                doc_id: Some(id),
                filename,
            });
        }
        refs
    }
}

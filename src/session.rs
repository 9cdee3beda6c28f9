//! Interaction controller: orchestrates user intents against the corpus
//! and the transcript

use crate::backend::Backend;
use crate::config::ChatConfig;
use crate::corpus::CorpusStore;
use crate::error::{Error, Result};
use crate::transcript::Transcript;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Lifecycle of the current upload feedback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Ephemeral upload feedback.
///
/// Staging a new file supersedes the previous attempt; a settlement
/// carrying a stale token is discarded (last intent wins).
#[derive(Debug, Default)]
pub struct UploadAttempt {
    file: Option<PathBuf>,
    phase: UploadPhase,
    message: Option<String>,
    epoch: u64,
}

impl UploadAttempt {
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Stage a file and invalidate any outstanding attempt. Returns the
    /// token the eventual settlement must present.
    pub(crate) fn stage(&mut self, file: PathBuf) -> u64 {
        self.epoch += 1;
        self.file = Some(file);
        self.phase = UploadPhase::Idle;
        self.message = None;
        self.epoch
    }

    /// Mark the staged attempt in flight; a stale token is a no-op.
    pub(crate) fn begin(&mut self, token: u64) -> bool {
        if token != self.epoch {
            return false;
        }
        self.phase = UploadPhase::InFlight;
        true
    }

    /// Apply a terminal outcome. Returns false when the token is stale and
    /// the outcome was dropped.
    pub(crate) fn settle(&mut self, token: u64, outcome: std::result::Result<String, String>) -> bool {
        if token != self.epoch {
            return false;
        }
        match outcome {
            Ok(message) => {
                self.phase = UploadPhase::Succeeded;
                self.message = Some(message);
            }
            Err(message) => {
                self.phase = UploadPhase::Failed;
                self.message = Some(message);
            }
        }
        true
    }
}

/// A conversation over the corpus: owns the backend handle, the corpus
/// snapshot, the transcript, and the current upload attempt.
///
/// Methods take `&mut self`, so units of work never interleave their
/// mutations; each intent settles fully before the next one starts.
pub struct ChatSession {
    backend: Box<dyn Backend>,
    corpus: CorpusStore,
    transcript: Transcript,
    upload: UploadAttempt,
    chat: ChatConfig,
}

impl ChatSession {
    pub fn new(backend: Box<dyn Backend>, chat: ChatConfig) -> Self {
        let mut transcript = Transcript::new();
        transcript.greet(&chat.greeting);
        Self {
            backend,
            corpus: CorpusStore::new(),
            transcript,
            upload: UploadAttempt::default(),
            chat,
        }
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn upload_attempt(&self) -> &UploadAttempt {
        &self.upload
    }

    /// Initial corpus load; failure leaves an empty corpus behind
    pub async fn start(&mut self) -> Result<()> {
        self.corpus.refresh(self.backend.as_ref()).await
    }

    /// Re-fetch the corpus listing
    pub async fn refresh(&mut self) -> Result<()> {
        self.corpus.refresh(self.backend.as_ref()).await
    }

    /// Change the question scope
    pub fn select(&mut self, id: Option<i64>) -> Result<()> {
        self.corpus.select(id)
    }

    /// Upload a document. Never fails past this layer: the attempt always
    /// lands in a terminal phase and failures become its message.
    pub async fn upload(&mut self, path: PathBuf) -> UploadPhase {
        let token = self.upload.stage(path.clone());
        self.upload.begin(token);

        let outcome = match self.corpus.upload(self.backend.as_ref(), &path).await {
            Ok(receipt) => {
                let shown = receipt.filename.clone().unwrap_or_else(|| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                });
                Ok(format!(
                    "Uploaded {} and split it into {} chunks.",
                    shown, receipt.chunks_count
                ))
            }
            Err(err) => {
                warn!("Upload of {} failed: {}", path.display(), err);
                Err("Upload failed. Check the backend and try again.".to_string())
            }
        };

        self.upload.settle(token, outcome);
        self.upload.phase()
    }

    /// Delete a document from the corpus
    pub async fn delete(&mut self, id: i64) -> Result<()> {
        self.corpus.delete(self.backend.as_ref(), id).await
    }

    /// Ask a question under the current scope.
    ///
    /// Preconditions are checked before anything is appended, so a
    /// rejected ask leaves the transcript untouched. Once the user turn is
    /// in, exactly one bot turn settles, resolved or failed; a transport
    /// failure never loses the user's turn.
    pub async fn ask(&mut self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.transcript.has_pending() {
            return Err(Error::ConcurrentPending);
        }

        self.transcript.append_user(question)?;
        self.transcript.append_pending_bot()?;

        match self
            .backend
            .ask(question, self.corpus.scope().doc_id())
            .await
        {
            Ok(answer) => {
                let sources = self.corpus.source_refs(&answer);
                self.transcript.resolve_pending(answer.answer, sources)?;
            }
            Err(err) => {
                warn!("Ask failed: {}", err);
                self.transcript.fail_pending(&self.chat.fallback_answer)?;
            }
        }
        Ok(())
    }
}

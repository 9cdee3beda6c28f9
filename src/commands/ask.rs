//! One-shot ask command implementation

use crate::backend::Backend;
use crate::corpus::CorpusStore;
use crate::error::{Error, Result};
use crate::transcript::SourceRef;
use serde::Serialize;
use tracing::info;

/// Answer for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Ask a single question, optionally scoped to one document
pub async fn cmd_ask(backend: &dyn Backend, question: &str, doc: Option<i64>) -> Result<AskOutcome> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::EmptyInput);
    }

    info!("Asking: {}", question);

    let mut corpus = CorpusStore::new();
    corpus.refresh(backend).await?;
    corpus.select(doc)?;

    let answer = backend.ask(question, corpus.scope().doc_id()).await?;
    let sources = corpus.source_refs(&answer);

    Ok(AskOutcome {
        question: question.to_string(),
        answer: answer.answer,
        sources,
    })
}

/// Print answer to console
pub fn print_ask(outcome: &AskOutcome) {
    println!("\n{}", outcome.answer);

    if !outcome.sources.is_empty() {
        let names: Vec<&str> = outcome
            .sources
            .iter()
            .map(|source| source.filename.as_str())
            .collect();
        println!("\nSources: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{doc, FakeBackend};
    use crate::backend::Answer;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ask_all_documents() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_answer(Answer {
            answer: "X is...".to_string(),
            sources: vec![1, 2],
            source_filenames: vec!["a.pdf".to_string(), "b.pdf".to_string()],
        });

        let outcome = cmd_ask(&backend, "What is X?", None).await.unwrap();
        assert_eq!(outcome.answer, "X is...");
        assert_eq!(outcome.sources.len(), 2);

        let asked = backend.last_asked.lock().unwrap().clone().unwrap();
        assert_eq!(asked.1, None);
    }

    #[tokio::test]
    async fn test_ask_rejects_unknown_doc_scope() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed(vec![doc(1, "a.pdf")]);

        let err = cmd_ask(&backend, "What is X?", Some(9)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidScope(9)));
        assert!(backend.last_asked.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let backend = Arc::new(FakeBackend::new());
        let err = cmd_ask(&backend, "  ", None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }
}

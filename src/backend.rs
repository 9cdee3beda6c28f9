//! HTTP transport for the DocuMind backend
//!
//! Wraps the backend's endpoints into typed request/response pairs. Every
//! operation is a single round trip; retry policy belongs to callers.

use crate::config::Config;
use crate::corpus::Document;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Receipt returned by a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub doc_id: i64,
    /// Older backend revisions omit the filename
    #[serde(default)]
    pub filename: Option<String>,
    pub chunks_count: u32,
}

/// Answer returned by the ask endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Document ids of the chunks the answer was grounded on
    #[serde(default)]
    pub sources: Vec<i64>,
    /// Display names paired positionally with `sources`
    #[serde(default)]
    pub source_filenames: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    doc_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Operations the conversation core needs from the backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload a document file; the backend chunks and indexes it
    async fn upload(&self, path: &Path) -> Result<UploadReceipt>;

    /// List all documents, in backend order
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Delete a document and its index data
    async fn delete_document(&self, id: i64) -> Result<()>;

    /// Ask a question; `doc_id: None` means all documents
    async fn ask(&self, question: &str, doc_id: Option<i64>) -> Result<Answer>;

    /// Fetch the backend's health banner
    async fn ping(&self) -> Result<String>;
}

/// reqwest-backed [`Backend`] implementation
pub struct HttpBackend {
    client: Client,
    upload_client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.backend_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()?;
        // Uploads wait for server-side chunking and embedding
        let upload_client = Client::builder()
            .timeout(Duration::from_secs(config.http.upload_timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            upload_client,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid backend URL: {}", e)))
    }

    /// Map non-success statuses: client errors surface the backend's
    /// `detail` message as a rejection, everything else is transport.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| status.to_string());

        if status.is_client_error() {
            Err(Error::Rejected(detail))
        } else {
            Err(Error::Transport(detail))
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, path: &Path) -> Result<UploadReceipt> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Config(format!("Not a file path: {}", path.display())))?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = tokio::fs::read(path).await?;

        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime.essence_str())
            .map_err(|e| Error::Config(format!("Invalid MIME type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let url = self.endpoint("/upload")?;
        let response = self.upload_client.post(url).multipart(form).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        let url = self.endpoint("/documents")?;
        let response = self.client.get(url).send().await?;
        let parsed: DocumentsResponse = Self::check(response).await?.json().await?;
        Ok(parsed.documents)
    }

    async fn delete_document(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("/documents/{}", id))?;
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn ask(&self, question: &str, doc_id: Option<i64>) -> Result<Answer> {
        let url = self.endpoint("/ask")?;
        let request = AskRequest { question, doc_id };
        let response = self.client.post(url).json(&request).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn ping(&self) -> Result<String> {
        let url = self.endpoint("/")?;
        let response = self.client.get(url).send().await?;
        let parsed: HealthResponse = Self::check(response).await?.json().await?;
        Ok(parsed.message)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> HttpBackend {
        let mut config = Config::default();
        config.backend_url = server.uri();
        HttpBackend::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "doc_id": 7,
                "filename": "report.pdf",
                "chunks_count": 12
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("report.pdf");
        std::fs::write(&file, b"%PDF-1.4 stub").unwrap();

        let receipt = backend_for(&server).upload(&file).await.unwrap();
        assert_eq!(receipt.doc_id, 7);
        assert_eq!(receipt.filename.as_deref(), Some("report.pdf"));
        assert_eq!(receipt.chunks_count, 12);
    }

    #[tokio::test]
    async fn test_upload_without_filename_in_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "doc_id": 3,
                "chunks_count": 5
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("notes.txt");
        std::fs::write(&file, b"plain text").unwrap();

        let receipt = backend_for(&server).upload(&file).await.unwrap();
        assert_eq!(receipt.doc_id, 3);
        assert!(receipt.filename.is_none());
    }

    #[tokio::test]
    async fn test_upload_rejected_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Only PDF and TXT files are accepted."
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("image.png");
        std::fs::write(&file, b"\x89PNG").unwrap();

        let err = backend_for(&server).upload(&file).await.unwrap_err();
        match err {
            Error::Rejected(detail) => assert!(detail.contains("PDF")),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_documents_tolerates_sparse_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {"id": 1, "filename": "a.pdf", "upload_date": "2026-08-01T10:00:00", "total_pages": 4},
                    {"id": 2, "filename": "b.txt", "chunks_count": 9}
                ]
            })))
            .mount(&server)
            .await;

        let docs = backend_for(&server).list_documents().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].filename, "a.pdf");
        assert_eq!(docs[0].total_pages, Some(4));
        assert_eq!(docs[1].chunk_count, Some(9));
        assert!(docs[1].upload_date.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "database down"})),
            )
            .mount(&server)
            .await;

        let err = backend_for(&server).list_documents().await.unwrap_err();
        match err {
            Error::Transport(detail) => assert!(detail.contains("database down")),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_document() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/documents/7"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        backend_for(&server).delete_document(7).await.unwrap();
    }

    #[tokio::test]
    async fn test_ask_encodes_all_scope_as_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({"question": "What is X?", "doc_id": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "X is...",
                "sources": [1, 2],
                "source_filenames": ["a.pdf", "b.pdf"]
            })))
            .mount(&server)
            .await;

        let answer = backend_for(&server).ask("What is X?", None).await.unwrap();
        assert_eq!(answer.answer, "X is...");
        assert_eq!(answer.source_filenames, vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_ask_encodes_single_document_scope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({"question": "Summarize", "doc_id": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "A summary.",
                "sources": [3]
            })))
            .mount(&server)
            .await;

        let answer = backend_for(&server).ask("Summarize", Some(3)).await.unwrap();
        assert_eq!(answer.sources, vec![3]);
        assert!(answer.source_filenames.is_empty());
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "DocuMind API up"})),
            )
            .mount(&server)
            .await;

        let message = backend_for(&server).ping().await.unwrap();
        assert_eq!(message, "DocuMind API up");
    }
}

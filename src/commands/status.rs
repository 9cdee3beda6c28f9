//! Status command implementation

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Result;
use serde::Serialize;
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub backend_url: String,
    pub backend_reachable: bool,
    pub backend_message: Option<String>,
    pub document_count: usize,
}

/// Get client and backend status
pub async fn cmd_status(config: &Config, backend: &dyn Backend) -> Result<StatusInfo> {
    info!("Getting status");

    let (backend_reachable, backend_message) = match backend.ping().await {
        Ok(message) => (true, Some(message)),
        Err(e) => {
            tracing::debug!("Backend ping error: {:?}", e);
            (false, None)
        }
    };

    let document_count = if backend_reachable {
        match backend.list_documents().await {
            Ok(documents) => documents.len(),
            Err(e) => {
                tracing::debug!("Document listing error: {:?}", e);
                0
            }
        }
    } else {
        0
    };

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        backend_url: config.backend_url.clone(),
        backend_reachable,
        backend_message,
        document_count,
    })
}

/// Print status to console
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 documind Status\n");
    println!("Configuration: {}", status.config_path);
    println!("\nBackend:");
    println!("  URL: {}", status.backend_url);

    let connection = if status.backend_reachable {
        "✓ Connected"
    } else {
        "✗ Not reachable"
    };
    println!("  Status: {}", connection);

    if let Some(message) = &status.backend_message {
        println!("  Banner: {}", message);
    }
    println!("  Documents: {}", status.document_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{doc, FakeBackend};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_status_reports_document_count() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed(vec![doc(1, "a.pdf"), doc(2, "b.txt")]);
        let config = Config::default();

        let status = cmd_status(&config, &backend).await.unwrap();
        assert!(status.backend_reachable);
        assert_eq!(status.document_count, 2);
        assert_eq!(status.backend_message.as_deref(), Some("DocuMind API running"));
    }
}

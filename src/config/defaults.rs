//! Default values for configuration

/// Default backend base URL for local development
pub fn default_backend_url() -> String {
    std::env::var("DOCUMIND_BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default upload timeout in seconds (the backend chunks and embeds the
/// whole document before it responds)
pub fn default_upload_timeout_secs() -> u64 {
    180
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!("documind/{} (DocuMind CLI)", env!("CARGO_PKG_VERSION"))
}

/// Default greeting shown when a chat session starts
pub fn default_greeting() -> String {
    "Hello! I'm DocuMind. Ask me anything about your documents.".to_string()
}

/// Default bot reply when the backend fails to answer
pub fn default_fallback_answer() -> String {
    "Sorry, something went wrong while answering. Please try again.".to_string()
}

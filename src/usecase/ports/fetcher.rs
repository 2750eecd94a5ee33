use thiserror::Error;

use crate::domain::entities::record::JsonRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed with http status {status}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Message shown in the inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status { status, body } => {
                let detail = extract_detail(body);
                match detail {
                    Some(detail) => format!("Server returned {status}: {detail}"),
                    None => format!("Server returned {status}"),
                }
            }
            FetchError::Network(message) => format!("Could not reach the server: {message}"),
            FetchError::MalformedResponse(message) => {
                format!("Unexpected response from the server: {message}")
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The backend wraps error messages as `{"detail": "..."}`. Short plain-text
/// bodies are shown as they are; JSON without `detail` and markup are not.
fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value
            .get("detail")
            .and_then(|detail| detail.as_str())
            .map(str::to_string),
        Err(_) if !trimmed.is_empty() && !trimmed.starts_with('<') && trimmed.len() <= 200 => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

pub trait RecordSource: Send + Sync {
    fn fetch(&self, endpoint: &str, auth_token: Option<&str>) -> Result<Vec<JsonRecord>, FetchError>;
}

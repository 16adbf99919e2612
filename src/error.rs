//! Error types for the generation engine

use thiserror::Error;

/// Message shown when the service rejects the configured credential or model
const PERMISSION_HINT: &str = "Permission denied. Try switching to \"Gemini Flash\" or ensure your API Key has access to the Pro model.";

#[derive(Debug, Error)]
pub enum StudioError {
    /// Input or configuration problem caught before any network call
    #[error("{0}")]
    Validation(String),

    /// Non-success transport status from the generative service
    #[error("API error {status}: {body}")]
    Service { status: u16, body: String },

    /// Well-formed service response with no extractable image
    #[error("No image data found in response.")]
    NoImageData,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudioError {
    /// True when the service refused the request for credential or tier reasons
    pub fn is_permission_denied(&self) -> bool {
        match self {
            StudioError::Service { status, body } => {
                *status == 403 || body.contains("PERMISSION_DENIED")
            }
            _ => false,
        }
    }

    /// User-facing form of the error. Permission refusals are rewritten into
    /// an actionable hint; the underlying error is never altered.
    pub fn user_message(&self) -> String {
        if self.is_permission_denied() {
            PERMISSION_HINT.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_carries_status_and_body() {
        let err = StudioError::Service {
            status: 500,
            body: "{\"error\":\"boom\"}".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: {\"error\":\"boom\"}");
    }

    #[test]
    fn forbidden_status_gets_permission_hint() {
        let err = StudioError::Service {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert!(err.is_permission_denied());
        assert!(err.user_message().contains("Gemini Flash"));
    }

    #[test]
    fn permission_denied_body_gets_hint_regardless_of_status() {
        let err = StudioError::Service {
            status: 400,
            body: "{\"error\":{\"status\":\"PERMISSION_DENIED\"}}".to_string(),
        };
        assert!(err.is_permission_denied());
        assert!(err.user_message().contains("API Key has access"));
    }

    #[test]
    fn other_errors_pass_through_unchanged() {
        let err = StudioError::Validation("Please select at least one pose.".to_string());
        assert!(!err.is_permission_denied());
        assert_eq!(err.user_message(), "Please select at least one pose.");

        let err = StudioError::NoImageData;
        assert_eq!(err.user_message(), "No image data found in response.");
    }
}

//! HTTP client for the generative image service

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;

use crate::error::StudioError;
use crate::models::GeneratedImage;
use crate::request::GenerateContentRequest;

/// Backend seam for issuing one generation request. The engine fans out over
/// this trait, which keeps the orchestration testable without a live service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GeneratedImage, StudioError>;
}

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GeminiClient {
    /// Creates a client against the given service root. No per-request
    /// timeout is set, image generation can legitimately take minutes.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        )
    }

    async fn send(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GeneratedImage, StudioError> {
        let url = self.request_url(model, api_key);
        debug!("[generate_image] POST {}", url.replace(api_key, "***"));

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("[generate_image] service error: {} - {}", status, response_text);
            return Err(StudioError::Service {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)?;
        extract_image(parsed)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GeneratedImage, StudioError> {
        self.send(api_key, model, request).await
    }
}

/// Scans candidates in order and returns the first inline image payload.
/// Text-only parts are ignored; a response without any usable payload is a
/// typed failure, never an empty success.
fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, StudioError> {
    for candidate in response.candidates {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            let Some(inline) = part.inline_data else {
                continue;
            };
            if inline.data.is_empty() {
                continue;
            }
            let data = STANDARD.decode(inline.data.as_bytes())?;
            let mime_type = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
            return Ok(GeneratedImage { mime_type, data });
        }
    }
    Err(StudioError::NoImageData)
}

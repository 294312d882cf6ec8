//! HTTP client for the multimodal model.

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiErrorEnvelope, ApiMessage, ApiRequest, ApiResponse, ContentBlock, ImageSource, ResponseBlock};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Vision client errors.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Vision model returned no text content")]
    EmptyResponse,
}

/// Thin Messages API client: one image plus one prompt in, reply text out.
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl VisionClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a screenshot and a prompt, returning the model's reply text.
    ///
    /// Screenshots are PNG; the image block precedes the text block so the
    /// model reads the page before the question.
    pub async fn analyze_image(&self, image_base64: &str, prompt: &str) -> Result<String, VisionError> {
        let request = ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource::Base64 {
                            media_type: "image/png".to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                    ContentBlock::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
            temperature: Some(0.0),
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => body,
            };
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ApiResponse = response.json().await?;
        let text: String = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.as_str()),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        debug!(chars = text.len(), "vision reply received");
        Ok(text)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

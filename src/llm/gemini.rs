use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::client::{LlmClient, RemoteCallError};
use crate::error::AppError;
use crate::util::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_KEY_HEADER: &str = "X-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

impl GeminiRequest {
    fn single(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: String, timeout_secs: u64) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_base_url(
        api_key: SecretString,
        model: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        if api_key.is_blank() {
            return Err(AppError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// First candidate's first text part, trimmed. `None` when the body does not
/// have that shape.
fn extract_text(body: serde_json::Value) -> Option<String> {
    let response: GeminiResponse = serde_json::from_value(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text.trim().to_string())
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteCallError> {
        let request = GeminiRequest::single(prompt);

        debug!("Calling Gemini API with model: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteCallError::Connection(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Could not read error body for status {}: {}", status, e);
                    format!("<unreadable body: {}>", e)
                }
            };
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| RemoteCallError::Connection(e.to_string()))?;
        let body: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| RemoteCallError::Unexpected(format!("invalid JSON body: {}", e)))?;

        extract_text(body).ok_or(RemoteCallError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key() -> SecretString {
        SecretString::new("test_key")
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new(key(), "gemini-2.0-flash".to_string(), 30).unwrap();
        assert_eq!(client.api_key.expose(), "test_key");
        assert_eq!(client.model(), "gemini-2.0-flash");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::with_base_url(
            key(),
            "gemini-pro".to_string(),
            "http://localhost:9000/v1beta/".to_string(),
            30,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_blank_key_is_a_configuration_error() {
        let result = GeminiClient::new(SecretString::new(""), "m".to_string(), 30);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_request_structure() {
        let json = serde_json::to_value(GeminiRequest::single("hello")).unwrap();
        assert_eq!(json, json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn test_extract_text_trims() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "  Hello, world!\n"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ]
        });
        assert_eq!(extract_text(body).as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn test_extract_text_missing_paths() {
        assert!(extract_text(json!({})).is_none());
        assert!(extract_text(json!({"candidates": []})).is_none());
        assert!(extract_text(json!({"candidates": [{"content": {"parts": []}}]})).is_none());
        assert!(extract_text(json!({"candidates": [{"finishReason": "SAFETY"}]})).is_none());
        assert!(extract_text(json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]})).is_none());
    }
}

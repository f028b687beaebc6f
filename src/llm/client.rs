use async_trait::async_trait;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;

/// Why a remote call produced no content. The Display strings are what the
/// caller ultimately sees.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteCallError {
    #[error("API Error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Gemini response")]
    Parse,

    /// DNS, refused connection, timeout, broken body stream.
    #[error("Connection Error: {0}")]
    Connection(String),

    #[error("Unexpected Error: {0}")]
    Unexpected(String),
}

impl From<RemoteCallError> for AppError {
    fn from(err: RemoteCallError) -> Self {
        AppError::RemoteCall(err.to_string())
    }
}

/// A generative backend. One prompt in, the model's text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteCallError>;
}

/// Outcome of one remote call plus the wall-clock time it took, measured up
/// to the point the outcome was known regardless of success.
#[derive(Debug, Clone)]
pub struct Generation {
    pub outcome: Result<String, RemoteCallError>,
    pub processing_time: f64,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn content(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|e| e.to_string())
    }

    /// Text to show a user: the content, or the error in its place.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            Ok(content) => content.clone(),
            Err(err) => err.to_string(),
        }
    }
}

/// Run one prompt through `client`, timing it. Never fails: every error is
/// folded into the returned `Generation`.
pub async fn generate(client: &dyn LlmClient, prompt: &str) -> Generation {
    let started = Instant::now();
    let outcome = client.complete(prompt).await;
    let processing_time = started.elapsed().as_secs_f64();

    match &outcome {
        Ok(content) => debug!(
            "Remote call succeeded in {:.2}s ({} chars)",
            processing_time,
            content.len()
        ),
        Err(err) => warn!("Remote call failed after {:.2}s: {}", processing_time, err),
    }

    Generation {
        outcome,
        processing_time,
    }
}

use std::sync::Arc;
use tracing::info;

use super::client::LlmClient;
use super::gemini::GeminiClient;
use crate::config::Config;
use crate::error::AppError;

/// Build the one client a process uses. Called once at startup; the result is
/// handed to whichever front end is running.
pub fn create_client(config: &Config) -> Result<Arc<dyn LlmClient>, AppError> {
    // A zero timeout would fail every call immediately
    if config.llm.timeout_secs == 0 {
        return Err(AppError::Configuration(
            "llm.timeout_secs must be at least 1".to_string(),
        ));
    }

    let api_key = config.api_key()?;

    let client = GeminiClient::with_base_url(
        api_key,
        config.llm.model.clone(),
        config.llm.base_url.clone(),
        config.llm.timeout_secs,
    )?;

    info!(
        "Gemini client ready (model: {}, timeout: {}s)",
        config.llm.model, config.llm.timeout_secs
    );

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_without_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "PROMPTDESK_TEST_NONEXISTENT_KEY_FACTORY_99999".to_string();
        let result = create_client(&config);
        assert!(
            matches!(result, Err(AppError::Configuration(_))),
            "Expected a configuration error when the API key is missing"
        );
    }

    #[test]
    fn test_create_client_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        match create_client(&config) {
            Err(AppError::Configuration(message)) => assert!(message.contains("timeout_secs")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("zero timeout accepted"),
        }
    }
}

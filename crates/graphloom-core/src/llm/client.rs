//! OpenRouter LLM client implementation
//!
//! Provides an async HTTP client for the OpenRouter API with:
//! - Chat completions
//! - Model fallback with automatic retry
//! - Rate limit handling with exponential backoff

use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{debug, error, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::{ChatRequest, LlmResponse, Message};

/// OpenRouter API base URL
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Maximum number of retry attempts for rate-limited requests
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BACKOFF_BASE_MS: u64 = 1000;

/// OpenRouter LLM client
///
/// Thread-safe client for making chat completion requests. Supports
/// model fallback and automatic retry on rate limits.
#[derive(Clone)]
pub struct LlmClient {
    /// HTTP client for making requests
    http_client: HttpClient,
    /// LLM configuration (model, temperature, etc.)
    config: LlmConfig,
    /// API key for authentication
    api_key: String,
    /// Base URL for the API
    base_url: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("default_model", &self.config.default_model)
            .finish()
    }
}

/// Builder for creating an LlmClient
pub struct LlmClientBuilder {
    config: Option<LlmConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for LlmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: None,
            api_key: None,
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Set the LLM configuration
    pub fn config(mut self, config: LlmConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL (defaults to OpenRouter)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the LlmClient
    pub fn build(self) -> Result<LlmClient> {
        let config = self.config.unwrap_or_default();
        let api_key = self
            .api_key
            .ok_or_else(|| Error::LlmError("API key is required".to_string()))?;

        let timeout_secs = self.timeout_secs.unwrap_or(config.timeout_secs);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(LlmClient {
            http_client,
            config,
            api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
        })
    }
}

impl LlmClient {
    /// Create a new LlmClient with the given configuration and API key
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        LlmClientBuilder::new()
            .config(config)
            .api_key(api_key)
            .build()
    }

    /// Create a new builder for LlmClient
    pub fn builder() -> LlmClientBuilder {
        LlmClientBuilder::new()
    }

    /// Get the default model from configuration
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Get the fallback models from configuration
    pub fn fallback_models(&self) -> &[String] {
        &self.config.fallback_models
    }

    /// Make a chat completion request
    ///
    /// Sends messages to the specified model and returns the response.
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<&str>,
    ) -> Result<LlmResponse> {
        let model = model.unwrap_or(&self.config.default_model);

        let request = ChatRequest::new(model, messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        self.execute_request(&request).await
    }

    /// Make a chat completion request with automatic fallback
    ///
    /// Tries the default model first, then falls back to alternative models
    /// if the primary model fails with a recoverable error.
    pub async fn complete_with_fallback(&self, messages: Vec<Message>) -> Result<LlmResponse> {
        let mut models = vec![self.config.default_model.clone()];
        models.extend(self.config.fallback_models.clone());

        let mut last_error = None;

        for model in &models {
            debug!(model = %model, "Attempting chat completion");

            match self.complete(messages.clone(), Some(model)).await {
                Ok(response) => {
                    info!(model = %model, tokens = response.tokens_used, "Chat completion successful");
                    return Ok(response);
                }
                Err(Error::RateLimited(secs)) => {
                    warn!(model = %model, wait_secs = secs, "Rate limited, trying next model");
                    last_error = Some(Error::RateLimited(secs));
                }
                Err(Error::LlmError(msg)) if is_model_error(&msg) => {
                    warn!(model = %model, error = %msg, "Model error, trying next model");
                    last_error = Some(Error::LlmError(msg));
                }
                Err(e) => {
                    // Non-recoverable error, don't try other models
                    error!(model = %model, error = %e, "Non-recoverable error");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::NoSuitableModel("All models failed".to_string())))
    }

    /// Execute a chat request with retry logic
    async fn execute_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(Error::RateLimited(wait_secs)) if attempts < MAX_RETRY_ATTEMPTS => {
                    let backoff = calculate_backoff(attempts, wait_secs);
                    warn!(
                        attempt = attempts,
                        wait_ms = backoff,
                        "Rate limited, retrying after backoff"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a single request to the API
    async fn send_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/graphloom/graphloom")
            .header("X-Title", "Graphloom")
            .json(request)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();

        if !status.is_success() {
            return self.handle_error_response(status, response).await;
        }

        let chat_response = response
            .json()
            .await
            .map_err(|e| Error::LlmError(format!("Failed to parse response: {}", e)))?;

        LlmResponse::from_chat_response(chat_response)
            .ok_or_else(|| Error::LlmError("Empty response from API".to_string()))
    }

    /// Handle error responses from the API
    async fn handle_error_response<T>(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(Error::LlmError(
                "Unauthorized: Invalid API key. Set GRAPHLOOM_API_KEY or OPENROUTER_API_KEY environment variable.".to_string(),
            )),
            429 => {
                let wait_secs = extract_retry_after(&body).unwrap_or(60);
                Err(Error::RateLimited(wait_secs))
            }
            400 => Err(Error::LlmError(format!("Bad request: {}", body))),
            402 => Err(Error::LlmError(
                "Payment required: Insufficient credits on OpenRouter account".to_string(),
            )),
            403 => Err(Error::LlmError(format!("Forbidden: {}", body))),
            404 => Err(Error::LlmError(format!(
                "Model not found or endpoint unavailable: {}",
                body
            ))),
            500..=599 => Err(Error::LlmError(format!("Server error ({}): {}", status, body))),
            _ => Err(Error::LlmError(format!("HTTP error {}: {}", status, body))),
        }
    }
}

/// Check if an error message indicates a model-specific error
fn is_model_error(msg: &str) -> bool {
    let model_error_patterns = [
        "model not found",
        "unavailable",
        "not available",
        "no available provider",
        "overloaded",
        "capacity",
    ];

    let msg_lower = msg.to_lowercase();
    model_error_patterns
        .iter()
        .any(|pattern| msg_lower.contains(pattern))
}

/// Calculate backoff delay with jitter
fn calculate_backoff(attempt: u32, suggested_wait: u64) -> u64 {
    let base = BACKOFF_BASE_MS * 2u64.pow(attempt - 1);
    let max_wait = suggested_wait * 1000; // Convert to ms

    // Use the larger of calculated backoff or suggested wait
    let delay = base.max(max_wait);

    // Add some jitter (10% random variation)
    let jitter = delay / 10;
    delay + (rand_jitter() % jitter.max(1))
}

/// Generate a pseudo-random jitter value
fn rand_jitter() -> u64 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64 % 1000)
        .unwrap_or(0)
}

/// Extract retry-after value from error response
fn extract_retry_after(body: &str) -> Option<u64> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(retry_after) = json.get("retry_after").and_then(|v| v.as_u64()) {
            return Some(retry_after);
        }
        if let Some(error) = json.get("error")
            && let Some(retry_after) = error.get("retry_after").and_then(|v| v.as_u64())
        {
            return Some(retry_after);
        }
    }
    None
}

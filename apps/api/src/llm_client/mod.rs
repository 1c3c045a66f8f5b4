//! LLM Client: the single point of entry for calls to the local inference host.
//!
//! Both backend models are served by the same Ollama-compatible host and are
//! invoked identically; only the model name differs.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod stream;

use self::stream::{collect_response, ndjson_fragments};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("stream interrupted: {0}")]
    Stream(String),

    #[error("backend reported an error: {0}")]
    Backend(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

/// Client for the inference host's `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, max_tokens: u32, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_tokens,
            timeout,
        })
    }

    /// Generates a completion for `prompt` with `model`.
    /// The whole call, body included, is bounded by the configured timeout.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.timeout, self.generate_unbounded(model, prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
    }

    async fn generate_unbounded(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model,
            prompt,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = collect_response(ndjson_fragments(response.bytes_stream())).await?;
        debug!("Model {model} produced {} bytes", text.len());
        Ok(text)
    }
}

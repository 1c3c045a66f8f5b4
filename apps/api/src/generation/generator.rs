//! Generation fan-out: one composed prompt, two backend models.
//!
//! Each backend's outcome is kept as a tagged result. Failures only become the
//! bracketed sentinel text when the HTTP response is built, so one backend's
//! failure never hides the other's output.

use serde::Deserialize;
use tracing::{info, warn};

use crate::llm_client::{LlmError, OllamaClient};

/// Request body for prompt composition and generation.
///
/// Every field may be omitted; a missing task reads as blank and is rejected by
/// the handlers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub task: String,
}

/// A named slot for one backend model.
#[derive(Debug, Clone, Copy)]
pub struct Backend<'a> {
    /// Display name used in error markers, e.g. "Mistral".
    pub label: &'static str,
    pub model: &'a str,
}

/// Result of calling one backend.
#[derive(Debug)]
pub struct BackendOutcome<'a> {
    pub backend: Backend<'a>,
    pub result: Result<String, LlmError>,
}

impl BackendOutcome<'_> {
    /// The generated text, or the bracketed error marker shown to users.
    pub fn into_text(self) -> String {
        match self.result {
            Ok(text) => text,
            Err(e) => format!(
                "[Error calling {} model {}: {e}]",
                self.backend.label, self.backend.model
            ),
        }
    }
}

/// Sends `prompt` to both backends concurrently and waits for both outcomes.
pub async fn generate_pair<'a>(
    llm: &OllamaClient,
    first: Backend<'a>,
    second: Backend<'a>,
    prompt: &str,
) -> (BackendOutcome<'a>, BackendOutcome<'a>) {
    tokio::join!(
        generate_one(llm, first, prompt),
        generate_one(llm, second, prompt)
    )
}

async fn generate_one<'a>(
    llm: &OllamaClient,
    backend: Backend<'a>,
    prompt: &str,
) -> BackendOutcome<'a> {
    let result = llm.generate(backend.model, prompt).await;
    match &result {
        Ok(text) => info!(
            "{} ({}) returned {} bytes",
            backend.label,
            backend.model,
            text.len()
        ),
        Err(e) => warn!("{} ({}) failed: {e}", backend.label, backend.model),
    }
    BackendOutcome { backend, result }
}

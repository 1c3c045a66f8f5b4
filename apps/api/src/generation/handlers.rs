//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::composer::compose_prompt;
use crate::generation::generator::{generate_pair, Backend, GenerateRequest};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// Both outputs, each either generated text or a bracketed error marker.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub mistral: String,
    pub qwen: String,
}

/// POST /api/prompt
///
/// Returns the prompt exactly as the backends would receive it.
pub async fn handle_compose_prompt(
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, AppError> {
    let Json(request) = payload?;
    validate(&request)?;
    Ok(Json(PromptResponse {
        prompt: compose_prompt(&request),
    }))
}

/// POST /api/generate
///
/// Composes the prompt and calls both backends. Backend failures are reported
/// inline; the response status is 200 whenever the request itself is valid.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload?;
    validate(&request)?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id, role = %request.role);

    async move {
        let prompt = compose_prompt(&request);
        info!("Composed prompt of {} bytes", prompt.len());

        let mistral = Backend {
            label: "Mistral",
            model: &state.config.mistral_model,
        };
        let qwen = Backend {
            label: "Qwen",
            model: &state.config.qwen_model,
        };
        let (mistral, qwen) = generate_pair(&state.llm, mistral, qwen, &prompt).await;

        Ok(Json(GenerateResponse {
            mistral: mistral.into_text(),
            qwen: qwen.into_text(),
        }))
    }
    .instrument(span)
    .await
}

fn validate(request: &GenerateRequest) -> Result<(), AppError> {
    if request.task.trim().is_empty() {
        return Err(AppError::Validation("task cannot be empty".to_string()));
    }
    Ok(())
}

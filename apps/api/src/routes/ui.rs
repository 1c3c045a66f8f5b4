use axum::{extract::State, response::Html};

use crate::generation::prompts::{PREDEFINED_FORMATS, PREDEFINED_STYLES};
use crate::report::builder::escape_html;
use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../static/index.html");

/// GET /
/// Serves the single-page UI that drives the JSON API.
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_index(
        &state.config.mistral_model,
        &state.config.qwen_model,
        &state.config.ollama_host,
    ))
}

fn render_index(mistral_model: &str, qwen_model: &str, ollama_host: &str) -> String {
    INDEX_TEMPLATE
        .replace("{{FORMAT_OPTIONS}}", &options(PREDEFINED_FORMATS))
        .replace("{{STYLE_OPTIONS}}", &options(PREDEFINED_STYLES))
        .replace("{{MISTRAL_MODEL}}", &escape_html(mistral_model))
        .replace("{{QWEN_MODEL}}", &escape_html(qwen_model))
        .replace("{{OLLAMA_HOST}}", &escape_html(ollama_host))
}

fn options(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("<option>{}</option>", escape_html(v)))
        .collect()
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::report::builder::ReportOutputs;
use crate::report::{build_report, Report, ReportKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "type", default = "default_report_type")]
    pub report_type: String,
    #[serde(default)]
    pub mistral: String,
    #[serde(default)]
    pub qwen: String,
}

fn default_report_type() -> String {
    "txt".to_string()
}

/// POST /api/report
///
/// Renders both outputs into a downloadable file. Malformed bodies, unknown
/// types and a missing PDF renderer are client errors.
pub async fn handle_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Report, AppError> {
    let Json(request) = payload?;
    let kind: ReportKind = request.report_type.parse()?;
    let outputs = ReportOutputs {
        mistral: &request.mistral,
        qwen: &request.qwen,
    };

    let report = build_report(kind, outputs, &state.pdf).await?;
    info!("Built {:?} report ({} bytes)", kind, report.body.len());
    Ok(report)
}

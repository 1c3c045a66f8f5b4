use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextResponse {
    pub context: String,
}

/// GET /api/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.roles.as_ref().clone())
}

/// GET /api/context?role=<name>
///
/// Unknown roles and an unavailable database both answer with an empty context.
/// A missing `role` parameter is a validation error.
pub async fn handle_get_context(
    State(state): State<AppState>,
    query: Result<Query<RoleQuery>, QueryRejection>,
) -> Result<Json<ContextResponse>, AppError> {
    let Query(params) = query?;
    let context = state.contexts.context_for_role(&params.role).await;
    Ok(Json(ContextResponse { context }))
}

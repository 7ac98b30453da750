use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CreatedId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAnalyst {
    #[serde(default, alias = "nome")]
    pub full_name: Option<String>,
    #[serde(default, alias = "usuario")]
    pub login_name: Option<String>,
    #[serde(default, alias = "senha", alias = "plaintextPassword")]
    pub password: Option<String>,
}

/// POST /api/analysts - register an analyst
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAnalyst>, JsonRejection>,
) -> ApiResult<CreatedId> {
    let Json(analyst) = payload?;

    let login_name = analyst.login_name.as_deref().filter(|s| !s.is_empty());
    let password = analyst.password.as_deref().filter(|s| !s.is_empty());
    let (login_name, password) = match (login_name, password) {
        (Some(login_name), Some(password)) => (login_name, password),
        (None, Some(_)) => return Err(ApiError::missing_fields(&["loginName"])),
        (Some(_), None) => return Err(ApiError::missing_fields(&["password"])),
        (None, None) => return Err(ApiError::missing_fields(&["loginName", "password"])),
    };

    let id = state
        .analysts()
        .create(analyst.full_name.as_deref(), login_name, password)
        .await?;
    info!("Analyst created with id {}", id);

    Ok(ApiResponse::created(CreatedId { id }))
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, alias = "usuario")]
    pub login_name: Option<String>,
    #[serde(default, alias = "senha", alias = "plaintextPassword")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub id: i64,
}

/**
 * POST /api/login - check an analyst's login name and password
 *
 * Expected Input:
 * ```json
 * { "loginName": "string", "password": "string" }
 * ```
 *
 * Success returns the analyst id. An unknown login name, a wrong password
 * and a malformed body all produce the same 401 body, and an unknown login
 * name still pays for one bcrypt verification.
 */
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Login rejected: {}", rejection.body_text());
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let login_name = request.login_name.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let verified = match state.analysts().find_by_login_name(&login_name).await? {
        Some(analyst) => state
            .credentials
            .verify(&password, &analyst.password_hash)
            .await?
            .then_some(analyst.id),
        None => {
            state.credentials.verify_decoy(&password).await?;
            None
        }
    };

    match verified {
        Some(id) => {
            info!("Analyst {} logged in", id);
            Ok(ApiResponse::success(LoginResponse {
                message: "Login successful",
                id,
            }))
        }
        None => {
            warn!("Failed login attempt for '{}'", login_name);
            Err(ApiError::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

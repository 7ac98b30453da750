use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::database::models::{NewProposal, Proposal, ProposalFields, ProposalWithAnalyst};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ChangedCount, CreatedId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// POST /api/proposals - submit a proposal; creationDate is always today
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewProposal>, JsonRejection>,
) -> ApiResult<CreatedId> {
    let Json(proposal) = payload?;

    let id = state.proposals().create(&proposal).await?;
    info!("Proposal created with id {}", id);

    Ok(ApiResponse::created(CreatedId { id }))
}

/// GET /api/proposals?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn list_by_date_range(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<Vec<ProposalWithAnalyst>> {
    let Query(range) = query?;

    let start = range.start_date.as_deref().filter(|s| !s.trim().is_empty());
    let end = range.end_date.as_deref().filter(|s| !s.trim().is_empty());
    if start.is_none() || end.is_none() {
        return Err(ApiError::bad_request(
            "Query parameters startDate and endDate are required",
        ));
    }

    let rows = state.proposals().list_by_date_range(start, end).await?;
    info!(
        "Returned {} proposals between {} and {}",
        rows.len(),
        start.unwrap_or_default(),
        end.unwrap_or_default()
    );

    Ok(ApiResponse::success(rows))
}

/// GET /api/proposals/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Proposal> {
    let Path(id) = path?;

    match state.proposals().get_by_id(id).await? {
        Some(proposal) => {
            info!("Proposal {} returned", id);
            Ok(ApiResponse::success(proposal))
        }
        None => {
            warn!("Proposal {} not found", id);
            Err(ApiError::not_found("Proposal not found"))
        }
    }
}

/// PUT /api/proposals/:id - replace all business and contact fields
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProposalFields>, JsonRejection>,
) -> ApiResult<ChangedCount> {
    let Path(id) = path?;
    let Json(fields) = payload?;

    let changed_count = state.proposals().update(id, &fields).await?;
    if changed_count == 0 {
        warn!("Proposal {} not found for update", id);
        return Err(ApiError::not_found("Proposal not found"));
    }

    info!("Proposal {} updated", id);
    Ok(ApiResponse::success(ChangedCount { changed_count }))
}

/// DELETE /api/proposals/:id
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<ChangedCount> {
    let Path(id) = path?;

    let changed_count = state.proposals().delete(id).await?;
    if changed_count == 0 {
        warn!("Proposal {} not found for deletion", id);
        return Err(ApiError::not_found("Proposal not found"));
    }

    info!("Proposal {} deleted", id);
    Ok(ApiResponse::success(ChangedCount { changed_count }))
}

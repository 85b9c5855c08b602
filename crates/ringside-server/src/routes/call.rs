//! Call Routes - Outbound call management
//!
//! HTTP handlers that delegate to CallOrchestrator for business logic.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use ringside::DomainError;

use super::error::ApiError;
use crate::models::{
    CallDetailResponse, CallListResponse, CallView, CreateCallRequest, CreateCallResponse,
    ErrorResponse, RefreshResponse, UpdatePersonaRequest,
};
use crate::AppState;

/// Place an outbound call
#[utoipa::path(
    post,
    path = "/calls",
    request_body = CreateCallRequest,
    responses(
        (status = 200, description = "Call placed", body = CreateCallResponse),
        (status = 400, description = "Invalid phone number or body", body = ErrorResponse),
        (status = 502, description = "Provider rejected the request", body = ErrorResponse)
    ),
    tag = "Call"
)]
pub async fn create_call(
    State(state): State<AppState>,
    payload: Result<Json<CreateCallRequest>, JsonRejection>,
) -> Result<Json<CreateCallResponse>, ApiError> {
    let Json(payload) = payload?;

    let record = state
        .orchestrator
        .initiate_call(
            &payload.phone_number,
            payload.persona.unwrap_or_default().into(),
        )
        .await?;

    Ok(Json(CreateCallResponse {
        success: true,
        call_id: record.id,
    }))
}

/// List all calls known to this server
#[utoipa::path(
    get,
    path = "/calls",
    responses(
        (status = 200, description = "All calls, oldest first", body = CallListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Call"
)]
pub async fn list_calls(State(state): State<AppState>) -> Result<Json<CallListResponse>, ApiError> {
    let calls = state.orchestrator.list().await?;

    Ok(Json(CallListResponse {
        success: true,
        calls: calls.iter().map(CallView::from).collect(),
    }))
}

/// Get a call with its transcript
#[utoipa::path(
    get,
    path = "/calls/{id}",
    params(
        ("id" = String, Path, description = "Provider call ID")
    ),
    responses(
        (status = 200, description = "Call found", body = CallDetailResponse),
        (status = 404, description = "Call not found", body = ErrorResponse)
    ),
    tag = "Call"
)]
pub async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CallDetailResponse>, ApiError> {
    let record = state.orchestrator.get(&id).await?;

    Ok(Json(CallDetailResponse {
        success: true,
        call: record.into(),
    }))
}

/// Check the call's status with the provider right now
#[utoipa::path(
    get,
    path = "/calls/{id}/refresh",
    params(
        ("id" = String, Path, description = "Provider call ID")
    ),
    responses(
        (status = 200, description = "Status checked", body = RefreshResponse),
        (status = 404, description = "Call not found", body = ErrorResponse),
        (status = 502, description = "Provider unavailable; details carry the stored call", body = ErrorResponse)
    ),
    tag = "Call"
)]
pub async fn refresh_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RefreshResponse>, ApiError> {
    match state.orchestrator.refresh(&id).await {
        Ok(outcome) => Ok(Json(RefreshResponse {
            success: true,
            call: outcome.record.into(),
            provider_status: outcome.provider_status.to_string(),
            updated: outcome.reconciliation.is_applied(),
        })),
        Err(DomainError::Provider(e)) => {
            let current = state.orchestrator.get(&id).await?;
            let provider = e.details.clone();
            Err(ApiError::from(DomainError::Provider(e)).with_details(json!({
                "call": CallView::from(&current),
                "provider": provider,
            })))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace the persona of a placed call
#[utoipa::path(
    post,
    path = "/calls/{id}/persona",
    params(
        ("id" = String, Path, description = "Provider call ID")
    ),
    request_body = UpdatePersonaRequest,
    responses(
        (status = 200, description = "Persona updated", body = CallDetailResponse),
        (status = 404, description = "Call not found", body = ErrorResponse),
        (status = 502, description = "Provider rejected the update", body = ErrorResponse)
    ),
    tag = "Call"
)]
pub async fn update_persona(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePersonaRequest>, JsonRejection>,
) -> Result<Json<CallDetailResponse>, ApiError> {
    let Json(payload) = payload?;

    let record = state
        .orchestrator
        .update_persona(&id, payload.persona.into())
        .await?;

    Ok(Json(CallDetailResponse {
        success: true,
        call: record.into(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calls", get(list_calls).post(create_call))
        .route("/calls/:id", get(get_call))
        .route("/calls/:id/refresh", get(refresh_call))
        .route("/calls/:id/persona", post(update_persona))
}

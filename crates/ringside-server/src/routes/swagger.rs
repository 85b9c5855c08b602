//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AckResponse, CallDetailResponse, CallListResponse, CallView, CreateCallRequest,
    CreateCallResponse, ErrorResponse, FunctionCallResult, PersonaPayload, RefreshResponse,
    TranscriptSegmentView, UpdatePersonaRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Call endpoints
        super::call::create_call,
        super::call::list_calls,
        super::call::get_call,
        super::call::refresh_call,
        super::call::update_persona,
        // Webhook endpoint
        super::webhook::receive_webhook,
    ),
    info(
        title = "Ringside API",
        version = "0.1.0",
        description = "Outbound voice-AI calls with live status and transcripts.\n\nRealtime frames are served over the WebSocket at `/ws`.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Call", description = "Call - Place and inspect outbound calls"),
        (name = "Webhook", description = "Webhook - Provider event intake"),
    ),
    components(
        schemas(
            // Call
            PersonaPayload,
            TranscriptSegmentView,
            CallView,
            CreateCallRequest,
            CreateCallResponse,
            CallListResponse,
            CallDetailResponse,
            RefreshResponse,
            UpdatePersonaRequest,
            // Envelopes
            AckResponse,
            ErrorResponse,
            // Webhook
            FunctionCallResult,
        )
    ),
)]
pub struct ApiDoc;

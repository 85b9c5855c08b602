//! Provider Webhook Route
//!
//! Always answers 200: the provider's retry behaviour on errors is outside
//! our control, and a retried delivery must not escalate anything.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use ringside::DomainError;

use crate::models::{AckResponse, FunctionCallResult, WebhookEvent};
use crate::AppState;

/// Receive provider lifecycle, transcript and function-call events
#[utoipa::path(
    post,
    path = "/webhook",
    responses(
        (status = 200, description = "Event acknowledged; function calls answer with FunctionCallResult instead", body = AckResponse)
    ),
    tag = "Webhook"
)]
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let sessions = state.orchestrator.sessions();

    let result = match WebhookEvent::parse(&body) {
        WebhookEvent::FunctionCall { name, parameters } => {
            let result = state.functions.handle(&name, &parameters);
            return Json(FunctionCallResult { result }).into_response();
        }
        WebhookEvent::Status(update) => sessions.apply_status(update).await.map(|_| ()),
        WebhookEvent::Transcript {
            call_id,
            speaker,
            text,
        } => sessions
            .append_transcript(&call_id, &speaker, &text)
            .await
            .map(|_| ()),
        WebhookEvent::Ignored(reason) => {
            tracing::debug!(reason = %reason, "Webhook ignored");
            Ok(())
        }
    };

    match result {
        // Already logged at warn by the session service
        Err(DomainError::UnknownCall(_)) => {}
        Err(e) => tracing::error!(error = %e, "Failed to apply webhook"),
        Ok(()) => {}
    }

    Json(AckResponse::ok()).into_response()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_state, FakeVoiceProvider};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use ringside::{CallStatus, Persona};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn deliver(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_over_webhook() {
        let state = app_state(Arc::new(FakeVoiceProvider::default()));
        let mut rx = state.broadcaster.subscribe();
        state
            .orchestrator
            .initiate_call("+15551234567", Persona::named("Alex"))
            .await
            .unwrap();
        let app = router().with_state(state.clone());

        let started = json!({"event": "call.started", "call": {"id": "call-1"}});
        assert_eq!(
            deliver(&app, started.to_string()).await,
            (StatusCode::OK, json!({"success": true}))
        );

        deliver(
            &app,
            json!({
                "event": "transcript.updated",
                "call": {"id": "call-1"},
                "transcript": {"speaker": "assistant", "text": "Hello"}
            })
            .to_string(),
        )
        .await;
        deliver(
            &app,
            json!({"event": "call.ended", "call": {"id": "call-1", "endedReason": "customer-ended-call"}})
                .to_string(),
        )
        .await;
        deliver(
            &app,
            json!({
                "event": "transcript.updated",
                "call": {"id": "call-1"},
                "transcript": {"speaker": "user", "text": "late"}
            })
            .to_string(),
        )
        .await;

        let stored = state.orchestrator.get("call-1").await.unwrap();
        assert_eq!(stored.status, CallStatus::Completed);
        assert_eq!(stored.ended_reason.as_deref(), Some("customer-ended-call"));
        assert_eq!(stored.transcript.len(), 1);

        let mut names = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            let frame: Value = serde_json::from_str(&frame).unwrap();
            names.push(frame["event"].as_str().unwrap().to_string());
        }
        assert_eq!(
            names,
            vec![
                "call-started",
                "call-status-update",
                "call-started",
                "transcript-updated",
                "transcriptUpdate",
                "call-status-update",
                "call-ended",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_call_and_garbage_are_acknowledged() {
        let state = app_state(Arc::new(FakeVoiceProvider::default()));
        let app = router().with_state(state.clone());

        let ghost = json!({"event": "call.ended", "call": {"id": "ghost"}});
        assert_eq!(
            deliver(&app, ghost.to_string()).await,
            (StatusCode::OK, json!({"success": true}))
        );
        assert_eq!(
            deliver(&app, "{not json").await,
            (StatusCode::OK, json!({"success": true}))
        );
        assert!(state.orchestrator.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_function_call_result() {
        let app = router().with_state(app_state(Arc::new(FakeVoiceProvider::default())));

        let body = json!({
            "message": {
                "type": "function-call",
                "functionCall": {"name": "bookAppointment", "parameters": {"datetime": "Monday 10am"}}
            }
        });
        assert_eq!(
            deliver(&app, body.to_string()).await,
            (
                StatusCode::OK,
                json!({"result": "The appointment was booked successfully for Monday 10am."})
            )
        );
    }
}

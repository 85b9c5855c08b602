//! Realtime WebSocket channel
//!
//! Server -> Client only. On connect:
//! ```json
//! {"event": "active-calls", "data": [ ...every stored call... ]}
//! ```
//! then one frame per published event, e.g.
//! ```json
//! {"event": "call-status-update", "data": {"callId": "...", "status": "in-progress", ...}}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::adapters::broadcast::snapshot_frame;
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    // Subscribe before reading the snapshot so nothing published in
    // between is missed; it may be seen twice instead.
    let mut frames = state.broadcaster.subscribe();
    let (mut sender, mut receiver) = socket.split();

    tracing::info!(
        subscribers = state.broadcaster.subscriber_count(),
        "Realtime subscriber connected"
    );

    let snapshot = match state.orchestrator.list().await {
        Ok(records) => snapshot_frame(&records),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read calls for snapshot");
            return;
        }
    };
    match snapshot {
        Ok(text) => {
            if sender.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode snapshot");
            return;
        }
    }

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Realtime subscriber lagged, frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "WebSocket receive error");
                    break;
                }
                // Inbound messages carry no meaning on this channel
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!("Realtime subscriber disconnected");
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

//! WebSocket endpoint streaming table change notices.
//!
//! Each connected client gets its own `broadcast::Receiver` on the shared
//! [`ChangeFeed`](perkflow_events::ChangeFeed); every admin mutation is
//! forwarded as one JSON text frame. Clients are expected to refetch the
//! affected view on receipt, so a lagged subscriber loses nothing that a
//! refetch would not recover.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use perkflow_events::TableChange;

use crate::state::AppState;

/// GET /api/v1/ws -- upgrade and stream change notices.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let rx = state.feed.subscribe();
    ws.on_upgrade(move |socket| forward_changes(socket, rx))
}

async fn forward_changes(mut socket: WebSocket, mut rx: broadcast::Receiver<TableChange>) {
    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Ok(change) => {
                    let Ok(text) = serde_json::to_string(&change) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket subscriber lagged behind the change feed");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // ignore client chatter; pings are answered by axum
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "WebSocket receive error, closing");
                    break;
                }
            },
        }
    }
}

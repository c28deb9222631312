//! WebSocket endpoint for the chat relay
//!
//! One task per connection; the task exclusively owns the socket and
//! the relay controller, so frames within a session are handled
//! strictly in arrival order while sessions stay independent.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use hireline_core::session::Session;
use hireline_relay::{RelayController, CONNECTED_SENTINEL};

use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(application_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, application_id))
}

async fn handle_socket(mut socket: WebSocket, state: AppState, application_id: String) {
    if socket
        .send(Message::Text(CONNECTED_SENTINEL.to_string()))
        .await
        .is_err()
    {
        return;
    }

    let context = state.applications.get(&application_id);
    let session_id = state.registry.open(&application_id);
    info!(
        "Session {} opened for application {}",
        session_id, application_id
    );

    let session = Session::new(&session_id, &application_id, context);
    let mut controller =
        RelayController::new(session, state.analyzer.clone(), state.relay.greeting_enabled);

    let mut transport_gone = false;
    for frame in controller.open().await {
        if socket.send(Message::Text(frame)).await.is_err() {
            transport_gone = true;
            break;
        }
    }

    if !transport_gone {
        let idle_window = state.relay.idle_timeout_secs.map(Duration::from_secs);
        loop {
            let received = match idle_window {
                Some(window) => match timeout(window, socket.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        info!("Session {} idle, closing", session_id);
                        break;
                    }
                },
                None => socket.recv().await,
            };

            let Some(result) = received else {
                debug!("Transport for session {} ended", session_id);
                break;
            };

            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    warn!("Transport error on session {}: {}", session_id, e);
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    if let Some(reply) = controller.handle_frame(&text).await {
                        if socket.send(Message::Text(reply)).await.is_err() {
                            debug!("Client for session {} went away mid-turn", session_id);
                            break;
                        }
                    }
                }
                Message::Close(_) => {
                    debug!("Client closed session {}", session_id);
                    break;
                }
                // Ping/pong is answered by the websocket layer; binary
                // frames are not part of the protocol.
                _ => {}
            }
        }
    }

    controller.close();
    state.registry.close(&session_id);
    info!("Session {} evicted", session_id);
}

//! WebSocket connection handler.
//!
//! Each connection runs two tasks: a reader that decodes control messages and
//! a writer (`pusher_loop`) that drains the connection's outbound queue. When
//! either ends, the other is aborted and the client is torn down.

use std::{ops::ControlFlow, sync::Arc};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ClientId, FormId},
    infrastructure::dto::websocket::{ClientMessage, ConnectedMessage, decode_client_message},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel is closed, which happens once the registry
/// drops the connection's sender (disconnect or eviction).
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    let client_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Client '{}' connected", client_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    match serde_json::to_string(&ConnectedMessage::new(&client_id)) {
        Ok(json) => {
            if let Err(e) = state
                .connect_client_usecase
                .acknowledge(&client_id, &json)
                .await
            {
                tracing::warn!("Failed to send connected to '{}': {}", client_id, e);
            }
        }
        Err(e) => tracing::error!("Failed to encode connected message: {}", e),
    }

    let state_clone = state.clone();
    let reader_client_id = client_id.clone();

    // Spawn a task to receive control messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", reader_client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if handle_text(&state_clone, &reader_client_id, text.as_str())
                        .await
                        .is_break()
                    {
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", reader_client_id);
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", reader_client_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if !state.disconnect_client_usecase.execute(&client_id).await {
        tracing::debug!("Client '{}' was already evicted", client_id);
    }
}

/// Apply one inbound text frame. `Break` closes the connection.
async fn handle_text(state: &AppState, client_id: &ClientId, text: &str) -> ControlFlow<()> {
    let message = match decode_client_message(text) {
        Ok(Some(message)) => message,
        Ok(None) => {
            tracing::debug!("Ignoring unrecognized message from '{}': {}", client_id, text);
            return ControlFlow::Continue(());
        }
        Err(e) => {
            tracing::warn!("Closing '{}': {}", client_id, e);
            return ControlFlow::Break(());
        }
    };

    match message {
        ClientMessage::JoinAnalytics { form_id } => match FormId::try_from(form_id) {
            Ok(form_id) => {
                state
                    .room_subscription_usecase
                    .join(client_id, &form_id)
                    .await
            }
            Err(e) => tracing::debug!("Ignoring join-analytics from '{}': {}", client_id, e),
        },
        ClientMessage::LeaveAnalytics { form_id } => match FormId::try_from(form_id) {
            Ok(form_id) => {
                state
                    .room_subscription_usecase
                    .leave(client_id, &form_id)
                    .await
            }
            Err(e) => tracing::debug!("Ignoring leave-analytics from '{}': {}", client_id, e),
        },
    }
    ControlFlow::Continue(())
}

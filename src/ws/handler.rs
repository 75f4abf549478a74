use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{ClientMessage, ServerMessage};
use crate::AppState;

use super::registry::{RoomBroadcast, RoomRegistry};

pub fn router(state: AppState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One unit of work for the connection loop: either a frame from the
/// client or a broadcast from the joined room.
enum Incoming {
    Client(Option<Result<Message, axum::Error>>),
    Room(Result<RoomBroadcast, RecvError>),
}

async fn next_incoming(
    receiver: &mut SplitStream<WebSocket>,
    current: &mut Option<(String, broadcast::Receiver<RoomBroadcast>)>,
) -> Incoming {
    match current.as_mut() {
        Some((_, room_rx)) => tokio::select! {
            msg = receiver.next() => Incoming::Client(msg),
            evt = room_rx.recv() => Incoming::Room(evt),
        },
        None => Incoming::Client(receiver.next().await),
    }
}

/// Per-connection event loop.
///
/// A connection is joined to at most one room at a time; joining another
/// room first leaves the current one. Whatever ends the loop (explicit
/// close, transport error, stream end) drives the leave transition for
/// the room the connection was in.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4().to_string();
    info!("WebSocket connection established: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();
    let mut current: Option<(String, broadcast::Receiver<RoomBroadcast>)> = None;

    loop {
        match next_incoming(&mut receiver, &mut current).await {
            Incoming::Client(Some(Ok(Message::Text(text)))) => {
                let msg: ClientMessage = match serde_json::from_str(&text) {
                    Ok(msg) => msg,
                    Err(e) => {
                        error!("Failed to parse message from {}: {}", conn_id, e);
                        continue;
                    }
                };
                if handle_client_message(&state, &conn_id, msg, &mut sender, &mut current)
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Incoming::Client(Some(Ok(Message::Close(_)))) | Incoming::Client(None) => break,
            // Binary, ping and pong frames carry no protocol meaning.
            Incoming::Client(Some(Ok(_))) => continue,
            Incoming::Client(Some(Err(e))) => {
                debug!("WebSocket read error for {}: {}", conn_id, e);
                break;
            }
            Incoming::Room(Ok(broadcast)) => {
                if broadcast.exclude.as_deref() == Some(conn_id.as_str()) {
                    continue;
                }
                if send_message(&mut sender, &broadcast.message).await.is_err() {
                    break;
                }
            }
            Incoming::Room(Err(RecvError::Lagged(skipped))) => {
                warn!(
                    "Connection {} lagged behind its room, skipped {} messages",
                    conn_id, skipped
                );
            }
            Incoming::Room(Err(RecvError::Closed)) => {
                // Only possible if the room vanished under a live member.
                warn!("Room channel closed under connection {}", conn_id);
                break;
            }
        }
    }

    if let Some((room_id, _)) = current.take() {
        state.registry.leave(&room_id, &conn_id).await;
    }
    info!("WebSocket connection terminated: {}", conn_id);
}

/// Apply one client message. Err means the socket is gone and the caller
/// should stop the loop.
async fn handle_client_message(
    state: &AppState,
    conn_id: &str,
    msg: ClientMessage,
    sender: &mut SplitSink<WebSocket, Message>,
    current: &mut Option<(String, broadcast::Receiver<RoomBroadcast>)>,
) -> Result<(), axum::Error> {
    match msg {
        ClientMessage::JoinRoom { room_id } => {
            let target = RoomRegistry::normalize_room_id(&room_id);

            // Re-joining the current room is a legal no-op that just
            // re-delivers the content; membership stays unchanged.
            if current.as_ref().is_some_and(|(room, _)| room == &target) {
                let content = state.registry.content(&target).await.unwrap_or_default();
                send_message(sender, &ServerMessage::InitialContent { content }).await?;
                send_message(sender, &ServerMessage::RoomInfo { room_id: target }).await?;
                return Ok(());
            }

            if let Some((previous, _)) = current.take() {
                state.registry.leave(&previous, conn_id).await;
            }

            let mut joined = state.registry.join(&target, conn_id).await;
            info!(
                "Connection {} joined room {} ({} participants)",
                conn_id, joined.room_id, joined.participant_count
            );
            send_message(
                sender,
                &ServerMessage::InitialContent {
                    content: joined.content,
                },
            )
            .await?;
            // The membership broadcast was queued under the registry lock,
            // so it is already waiting on the new subscription; it goes out
            // ahead of the join ack.
            if let Ok(pending) = joined.receiver.try_recv() {
                if pending.exclude.as_deref() != Some(conn_id) {
                    send_message(sender, &pending.message).await?;
                }
            }
            send_message(
                sender,
                &ServerMessage::RoomInfo {
                    room_id: joined.room_id.clone(),
                },
            )
            .await?;
            *current = Some((joined.room_id, joined.receiver));
        }
        ClientMessage::TextChange { content } => match current {
            Some((room_id, _)) => {
                state.registry.apply_edit(room_id, conn_id, content).await;
            }
            // Protocol misuse: an edit needs a joined room. Not an error
            // surface, just dropped.
            None => debug!("text-change from {} before any join, ignoring", conn_id),
        },
    }
    Ok(())
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            // Serializing our own enum cannot realistically fail.
            error!("Failed to serialize server message: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text)).await
}

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error};

use crate::models::ServerMessage;

use super::store::RoomStore;

/// Id of the room used when a client supplies no explicit room id.
/// This room is never removed from the registry, even when empty.
pub const DEFAULT_ROOM: &str = "default";

/// Capacity of each room's broadcast channel. A receiver that falls
/// behind skips messages (RecvError::Lagged) instead of blocking the room.
const ROOM_CHANNEL_CAPACITY: usize = 100;

/// A payload fanned out to the subscribers of one room.
#[derive(Debug, Clone)]
pub struct RoomBroadcast {
    /// Connection id that must not receive this message (the sender of an
    /// edit already has the authoritative local content).
    pub exclude: Option<String>,
    pub message: ServerMessage,
}

/// Live state of one room.
struct Room {
    content: String,
    participants: HashSet<String>,
    channel: broadcast::Sender<RoomBroadcast>,
    save_tx: mpsc::UnboundedSender<String>,
}

impl Room {
    fn broadcast(&self, exclude: Option<String>, message: ServerMessage) {
        // send() fails only when no receiver is subscribed, which is fine.
        let _ = self.channel.send(RoomBroadcast { exclude, message });
    }
}

/// Start the single writer task for one room.
///
/// All saves for the room go through this task, so concurrent edits can
/// never land on disk out of order; a backlog collapses to the newest
/// content before touching the filesystem. The task drains whatever is
/// queued and exits once the room drops its sender, which lets a pending
/// save complete after the room itself is torn down.
fn spawn_room_saver(store: RoomStore, room_id: String) -> mpsc::UnboundedSender<String> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some(mut content) = rx.recv().await {
            while let Ok(newer) = rx.try_recv() {
                content = newer;
            }
            if let Err(e) = store.save(&room_id, &content).await {
                error!("Auto-save failed for room {}: {}", room_id, e);
            }
        }
    });
    tx
}

/// What a connection gets back from a successful join.
pub struct JoinedRoom {
    pub room_id: String,
    pub content: String,
    pub participant_count: usize,
    pub receiver: broadcast::Receiver<RoomBroadcast>,
}

/// Registry stats for the diagnostics endpoint.
pub struct RegistryStats {
    pub rooms: usize,
    pub participants: usize,
}

/// Single source of truth for which rooms are live, their content and
/// their membership.
///
/// All operations lock the whole map, so every read-modify-broadcast
/// sequence on a room is atomic. Events racing on the same room resolve
/// by lock acquisition order: the last edit processed wins and is what
/// gets persisted and handed to new joiners.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Room>>,
    store: RoomStore,
}

impl RoomRegistry {
    pub fn new(store: RoomStore) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// An empty room id selects the default room.
    pub fn normalize_room_id(room_id: &str) -> String {
        if room_id.is_empty() {
            DEFAULT_ROOM.to_string()
        } else {
            room_id.to_string()
        }
    }

    /// Add a connection to a room, creating the room (and loading its
    /// persisted content) if it is not live yet.
    ///
    /// The participant insert and the broadcast subscription happen under
    /// the same lock as the participant-count broadcast, so the new
    /// connection cannot miss an edit between joining and subscribing.
    pub async fn join(&self, room_id: &str, conn_id: &str) -> JoinedRoom {
        let room_id = Self::normalize_room_id(room_id);
        let mut rooms = self.rooms.lock().await;

        let room = match rooms.entry(room_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let content = self.store.load(&room_id).await.unwrap_or_default();
                let (channel, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
                let save_tx = spawn_room_saver(self.store.clone(), room_id.clone());
                debug!("Room {} created", room_id);
                entry.insert(Room {
                    content,
                    participants: HashSet::new(),
                    channel,
                    save_tx,
                })
            }
        };

        room.participants.insert(conn_id.to_string());
        let participant_count = room.participants.len();
        let receiver = room.channel.subscribe();
        room.broadcast(
            None,
            ServerMessage::ParticipantCount {
                count: participant_count,
            },
        );

        JoinedRoom {
            room_id,
            content: room.content.clone(),
            participant_count,
            receiver,
        }
    }

    /// Remove a connection from a room. No-op for unknown rooms or
    /// connections that are not members. Non-default rooms are torn down
    /// the moment they become empty; their persisted content stays on
    /// disk. Returns the post-removal participant count.
    pub async fn leave(&self, room_id: &str, conn_id: &str) -> usize {
        let room_id = Self::normalize_room_id(room_id);
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            return 0;
        };

        room.participants.remove(conn_id);
        let count = room.participants.len();
        if count == 0 && room_id != DEFAULT_ROOM {
            rooms.remove(&room_id);
            debug!("Room {} deleted (empty)", room_id);
        } else {
            room.broadcast(None, ServerMessage::ParticipantCount { count });
        }
        count
    }

    /// Replace a live room's content, broadcast it to everyone except the
    /// sender, and queue persistence on the room's writer task.
    ///
    /// Unknown room ids are ignored: this cannot happen with a well
    /// behaved gateway but must never crash the server. Save failures are
    /// logged and swallowed; the next successful edit persists the
    /// then-current content.
    pub async fn apply_edit(&self, room_id: &str, conn_id: &str, content: String) {
        let room_id = Self::normalize_room_id(room_id);
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            debug!("Edit for unknown room {}, ignoring", room_id);
            return;
        };

        room.content = content.clone();
        room.broadcast(
            Some(conn_id.to_string()),
            ServerMessage::TextUpdate {
                content: content.clone(),
            },
        );

        // The broadcast above never waits on disk I/O; the writer task
        // applies saves strictly in edit order.
        if room.save_tx.send(content).is_err() {
            error!("Auto-save writer for room {} is gone", room_id);
        }
    }

    /// Current content of a live room, if any.
    pub async fn content(&self, room_id: &str) -> Option<String> {
        let room_id = Self::normalize_room_id(room_id);
        let rooms = self.rooms.lock().await;
        rooms.get(&room_id).map(|room| room.content.clone())
    }

    pub async fn stats(&self) -> RegistryStats {
        let rooms = self.rooms.lock().await;
        RegistryStats {
            rooms: rooms.len(),
            participants: rooms.values().map(|r| r.participants.len()).sum(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Messages received from editor clients over the WebSocket.
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join a room, implicitly leaving the current one. An empty or
    /// missing room id selects the default room.
    #[serde(rename = "join-room", rename_all = "camelCase")]
    JoinRoom {
        #[serde(default)]
        room_id: String,
    },
    /// Full-document replace of the current room's content.
    #[serde(rename = "text-change")]
    TextChange { content: String },
}

/// Messages sent to editor clients.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Current room content, sent once to a newly joined connection.
    #[serde(rename = "initial-content")]
    InitialContent { content: String },
    /// Private acknowledgment carrying the normalized room id.
    #[serde(rename = "room-info", rename_all = "camelCase")]
    RoomInfo { room_id: String },
    /// Broadcast to everyone in the room on membership change.
    #[serde(rename = "participant-count")]
    ParticipantCount { count: usize },
    /// New room content, broadcast to all participants except the sender.
    #[serde(rename = "text-update")]
    TextUpdate { content: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_room_uses_kebab_case_tag_and_camel_case_payload() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join-room","roomId":"42"}"#).unwrap();
        match msg {
            ClientMessage::JoinRoom { room_id } => assert_eq!(room_id, "42"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn join_room_with_missing_room_id_defaults_to_empty() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"join-room"}"#).unwrap();
        match msg {
            ClientMessage::JoinRoom { room_id } => assert_eq!(room_id, ""),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn server_messages_serialize_with_expected_event_names() {
        let update = serde_json::to_value(ServerMessage::TextUpdate {
            content: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(update["type"], "text-update");
        assert_eq!(update["content"], "abc");

        let info = serde_json::to_value(ServerMessage::RoomInfo {
            room_id: "7".to_string(),
        })
        .unwrap();
        assert_eq!(info["type"], "room-info");
        assert_eq!(info["roomId"], "7");

        let count = serde_json::to_value(ServerMessage::ParticipantCount { count: 3 }).unwrap();
        assert_eq!(count["type"], "participant-count");
        assert_eq!(count["count"], 3);
    }
}

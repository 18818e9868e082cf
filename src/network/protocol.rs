//! Protocol Messages
//!
//! JSON shapes exchanged with the score backend (HTTP) and with the optional
//! roster relay (WebSocket). Field names follow the backend's camelCase.

use serde::{Deserialize, Serialize};

use crate::game::actor::Actor;

// =============================================================================
// SCORE BACKEND
// =============================================================================

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name.
    pub name: String,
    /// Best score recorded by the backend.
    #[serde(rename = "highScore")]
    pub high_score: i64,
}

/// `POST /user/create` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Name to register.
    pub name: String,
}

/// `POST /user/create` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Auth token identifying the new player.
    pub token: String,
}

/// `POST /user/get` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Auth token from registration.
    pub token: String,
}

/// `POST /user/get` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Backend user id.
    pub id: String,
    /// Player name.
    pub name: String,
    /// Best score recorded so far.
    #[serde(rename = "highScore")]
    pub high_score: i64,
}

// =============================================================================
// ROSTER RELAY
// =============================================================================

/// Messages sent from the client to the roster relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Local player position after a move.
    Move {
        /// Player name.
        name: String,
        /// Left edge.
        #[serde(rename = "transformX")]
        x: i32,
        /// Top edge.
        #[serde(rename = "transformY")]
        y: i32,
    },

    /// Player is leaving.
    Leave,
}

/// Messages sent from the roster relay to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full set of other players. Replaces any previous roster.
    Roster {
        /// Every remote player currently in the arena.
        players: Vec<RosterEntry>,
    },

    /// Relay-side error.
    Error {
        /// Human-readable message.
        message: String,
    },
}

/// Remote player as reported by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Relay-assigned id.
    pub id: u32,
    /// Player name.
    pub name: String,
    /// Left edge.
    #[serde(rename = "transformX")]
    pub x: i32,
    /// Top edge.
    #[serde(rename = "transformY")]
    pub y: i32,
}

impl RosterEntry {
    /// Convert to a remote-player actor.
    pub fn into_actor(self) -> Actor {
        Actor::remote(self.id, &self.name, self.x, self.y)
    }
}

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::actor::ActorRole;

    #[test]
    fn test_leaderboard_uses_backend_field_names() {
        let json = r#"[{"name":"Ann","highScore":42},{"name":"Bob","highScore":7}]"#;
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].high_score, 42);

        let out = serde_json::to_value(&entries[1]).unwrap();
        assert_eq!(out["highScore"], 7);
        assert!(out.get("high_score").is_none());
    }

    #[test]
    fn test_profile_shape() {
        let json = r#"{"id":"u-1","name":"Ann","highScore":3}"#;
        let profile: PlayerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.high_score, 3);
    }

    #[test]
    fn test_move_message_json() {
        let msg = ClientMessage::Move {
            name: "Ann".into(),
            x: 125,
            y: 100,
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains(r#""type":"move""#));
        assert!(json.contains(r#""transformX":125"#));
        assert_eq!(ClientMessage::from_json(&json).unwrap(), msg);
    }

    #[test]
    fn test_roster_becomes_remote_actors() {
        let json = r#"{"type":"roster","players":[{"id":3,"name":"Bob","transformX":10,"transformY":20}]}"#;
        let ServerMessage::Roster { players } = ServerMessage::from_json(json).unwrap() else {
            panic!("expected roster");
        };
        let actor = players.into_iter().next().unwrap().into_actor();
        assert_eq!(actor.role, ActorRole::RemotePlayer);
        assert_eq!((actor.id, actor.x, actor.y), (3, 10, 20));
    }
}

use crate::model::candidate::IceCandidate;
use crate::model::description::SessionDescription;
use crate::model::participant::ParticipantId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Kind tag of a signaling message.
///
/// Anything the signaling server sends that is not part of the negotiation
/// vocabulary (`room_full`, future additions) lands in [`EventKind::Unknown`]
/// so that decoding never fails on the tag alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Join,
    Joined,
    Leave,
    Left,
    Offer,
    Answer,
    IceCandidate,
    NoMembers,
    Unknown(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Join => "join",
            EventKind::Joined => "joined",
            EventKind::Leave => "leave",
            EventKind::Left => "left",
            EventKind::Offer => "offer",
            EventKind::Answer => "answer",
            EventKind::IceCandidate => "icecandidate",
            EventKind::NoMembers => "nomembers",
            EventKind::Unknown(name) => name,
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "join" => EventKind::Join,
            "joined" => EventKind::Joined,
            "leave" => EventKind::Leave,
            "left" => EventKind::Left,
            "offer" => EventKind::Offer,
            "answer" => EventKind::Answer,
            "icecandidate" => EventKind::IceCandidate,
            "nomembers" => EventKind::NoMembers,
            _ => EventKind::Unknown(name),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Unknown(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `join` / `joined`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinBody {
    pub username: String,
}

/// One frame on the signaling channel: `{ "event", "from", "body" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalingMessage {
    pub event: EventKind,
    #[serde(default)]
    pub from: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl SignalingMessage {
    pub fn new(event: EventKind, from: ParticipantId, body: Option<Value>) -> Self {
        Self { event, from, body }
    }

    pub fn join(from: &ParticipantId) -> Self {
        Self::new(EventKind::Join, from.clone(), Some(Self::join_body(from)))
    }

    pub fn joined(from: &ParticipantId) -> Self {
        Self::new(EventKind::Joined, from.clone(), Some(Self::join_body(from)))
    }

    pub fn leave(from: &ParticipantId) -> Self {
        Self::new(EventKind::Leave, from.clone(), None)
    }

    pub fn left(from: &ParticipantId) -> Self {
        Self::new(EventKind::Left, from.clone(), None)
    }

    pub fn offer(
        from: &ParticipantId,
        description: &SessionDescription,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            EventKind::Offer,
            from.clone(),
            Some(serde_json::to_value(description)?),
        ))
    }

    pub fn answer(
        from: &ParticipantId,
        description: &SessionDescription,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            EventKind::Answer,
            from.clone(),
            Some(serde_json::to_value(description)?),
        ))
    }

    /// `None` is forwarded as an explicit `"body": null` end-of-candidates marker.
    pub fn ice_candidate(
        from: &ParticipantId,
        candidate: Option<&IceCandidate>,
    ) -> Result<Self, serde_json::Error> {
        let body = match candidate {
            Some(c) => serde_json::to_value(c)?,
            None => Value::Null,
        };
        Ok(Self::new(EventKind::IceCandidate, from.clone(), Some(body)))
    }

    /// Decode the body, treating an absent or `null` body as `None`.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.body {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value).map(Some),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn join_body(from: &ParticipantId) -> Value {
        serde_json::json!({ "username": from.as_str() })
    }
}

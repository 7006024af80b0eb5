//! Persistence models
//!
//! Row types for the conversation/plan store. Activities themselves are
//! the canonical [`schedcore::Activity`]; plans and messages carry the
//! surrounding conversation state.

use chrono::{DateTime, Utc};

/// A chat user. The application seeds exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub summary: String,
    /// Opaque preferences blob (JSON text).
    pub preferences: String,
}

/// Direction of a chat message relative to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Incoming,
    Outgoing,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "incoming" => Some(Self::Incoming),
            "outgoing" => Some(Self::Outgoing),
            _ => None,
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub time: DateTime<Utc>,
    pub user_id: String,
    /// Plan this message belongs to, when known.
    pub plan_id: Option<String>,
    pub message: String,
    pub kind: MessageKind,
    pub sender: Sender,
}

/// One plan version. The ordered activity list lives in its own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    pub id: String,
    pub user_id: String,
    pub time_creation: DateTime<Utc>,
    pub version_number: i64,
    /// Message that produced this plan version.
    pub message_id_created: String,
    /// Travel details context blob (JSON text).
    pub context: String,
    pub summary_of_plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_round_trip() {
        for kind in [MessageKind::Incoming, MessageKind::Outgoing] {
            assert_eq!(MessageKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::from_str("sideways"), None);
    }

    #[test]
    fn test_sender_round_trip() {
        for sender in [Sender::User, Sender::Agent] {
            assert_eq!(Sender::from_str(sender.as_str()), Some(sender));
        }
        assert_eq!(Sender::from_str("bot"), None);
    }
}

//! Transcript types: who said what, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the interview produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Interviewer,
    User,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Interviewer => "interviewer",
            Role::User => "you",
        }
    }
}

/// One transcript entry. The transcript is append-only and chronological;
/// entries are never edited after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// An interviewer message stamped now.
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Interviewer,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A user message stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AdminError;

/// Which admin collection to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Signups,
    Messages,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Signups, RecordKind::Messages];

    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            RecordKind::Signups => "/admin/signups",
            RecordKind::Messages => "/admin/messages",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            RecordKind::Signups => "signups",
            RecordKind::Messages => "messages",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RecordKind::Signups => "Signups",
            RecordKind::Messages => "Messages",
        }
    }

    /// Get the next kind (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            RecordKind::Signups => RecordKind::Messages,
            RecordKind::Messages => RecordKind::Signups,
        }
    }

    /// Get the previous kind (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            RecordKind::Signups => RecordKind::Messages,
            RecordKind::Messages => RecordKind::Signups,
        }
    }

    /// Decode a response body into records of this kind.
    /// Anything but a JSON array of the expected shape is rejected whole.
    pub fn decode(&self, body: &str) -> Result<Vec<Record>, AdminError> {
        let malformed = |e: serde_json::Error| AdminError::MalformedResponse(e.to_string());
        match self {
            RecordKind::Signups => serde_json::from_str::<Vec<SignupRecord>>(body)
                .map(|items| items.into_iter().map(Record::Signup).collect())
                .map_err(malformed),
            RecordKind::Messages => serde_json::from_str::<Vec<MessageRecord>>(body)
                .map(|items| items.into_iter().map(Record::Message).collect())
                .map_err(malformed),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RecordKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "signups" => Ok(RecordKind::Signups),
            "messages" => Ok(RecordKind::Messages),
            other => Err(AdminError::Validation(format!(
                "Unknown record kind '{}' (expected signups or messages)",
                other
            ))),
        }
    }
}

/// An email signup from the notify form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A message from the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Sender name, or the email when no name was given
    pub fn sender(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Signup(SignupRecord),
    Message(MessageRecord),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Signup(r) => &r.id,
            Record::Message(r) => &r.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Record::Signup(r) => &r.email,
            Record::Message(r) => &r.email,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Record::Signup(r) => r.timestamp,
            Record::Message(r) => r.timestamp,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Signup(_) => RecordKind::Signups,
            Record::Message(_) => RecordKind::Messages,
        }
    }
}

/// Order records newest first. The sort is stable, so records with equal
/// timestamps keep the order the server returned them in.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
}

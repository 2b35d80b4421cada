//! crates/skill_swap_client/src/model.rs
//!
//! The JSON documents exchanged with the swap board API, as seen by a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A full swap document as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_name: String,
    pub department: String,
    pub can_help_with: String,
    pub needs_help_with: String,
    #[serde(default)]
    pub notes: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub interested_users: Vec<InterestDocument>,
    #[serde(default)]
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub preferred_time: String,
    pub preferred_location: String,
    pub contact_date: DateTime<Utc>,
}

/// Swap fields sent when posting or editing. `None` keys are omitted from the
/// body, which the server reads as "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_help_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_help_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Interest fields sent when expressing interest or editing an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
}

/// The server's `{message}` body, used for errors and delete confirmations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Per-field messages; `None` marks a field that was supplied.
    #[serde(default)]
    pub details: Option<BTreeMap<String, Option<String>>>,
}

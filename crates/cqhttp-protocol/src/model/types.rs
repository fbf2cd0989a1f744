//! Small shared types used inside several entities.

use serde::{Deserialize, Serialize};

/// Sender information attached to fetched messages.
///
/// Gateways fill in only what they know, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub nickname: Option<String>,
    /// `male`, `female` or `unknown`.
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    /// Group card (group-scoped display name).
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    /// `owner`, `admin` or `member`.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// An anonymous group member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anonymous {
    /// Anonymous user ID.
    pub id: i64,
    /// Anonymous display name.
    pub name: String,
    /// Flag used to mute this anonymous member.
    pub flag: String,
}

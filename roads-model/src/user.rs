use crate::ids::UserID;
use chrono::{DateTime, Utc};

/// A service user (county engineer, admin, viewer).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserID,
    pub name: String,
    /// Unique login email.
    pub email: String,
    pub role: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub avatar_url: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub last_login: Option<DateTime<Utc>>,
}

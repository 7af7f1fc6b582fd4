use crate::ids::{NotificationID, UserID};
use chrono::{DateTime, Utc};

/// An in-app notification row addressed to a single user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    pub id: NotificationID,
    pub user_id: UserID,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

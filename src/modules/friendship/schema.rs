use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
}

/// A directed edge between two accounts. One row per unordered pair; once
/// the status leaves `pending` it never changes again.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipEntity {
    /// Whichever of requester/addressee is not `user`.
    pub fn other_party(&self, user: &Uuid) -> Uuid {
        if self.requester_id == *user {
            self.addressee_id
        } else {
            self.requester_id
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::friendship::schema::FriendshipStatus;
use crate::modules::user::model::ProfileSummary;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub addressee_id: Uuid,
}

/// The two answers an addressee can give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn status(self) -> FriendshipStatus {
        match self {
            Decision::Accept => FriendshipStatus::Accepted,
            Decision::Decline => FriendshipStatus::Declined,
        }
    }
}

/// How a search candidate relates to the acting account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationState {
    None,
    PendingSent,
    PendingReceived,
    Friends,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub relation: RelationState,
}

/// An incoming pending request, with the requester resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub requester: ProfileSummary,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An accepted friendship, resolved to the other party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendResponse {
    pub friendship_id: Uuid,
    pub profile: ProfileSummary,
    pub since: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(max = 64, message = "Search query too long"))]
    pub q: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct FriendshipUserRow {
    pub friendship_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

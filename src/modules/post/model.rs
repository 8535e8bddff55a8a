use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::user::model::ProfileSummary;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct InsertPost {
    pub user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    pub id: Uuid,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author: ProfileSummary,
}

/// A feed entry: the post plus everything the card renders.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author: ProfileSummary,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub post_id: Uuid,
    pub liked: bool,
}

#[derive(sqlx::FromRow)]
pub struct PostAuthorRow {
    pub id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct CommentAuthorRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct LikeRow {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

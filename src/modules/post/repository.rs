use uuid::Uuid;

use crate::api::error;
use crate::modules::post::model::{InsertPost, PostDetail};
use crate::modules::post::schema::{CommentEntity, PostEntity};

#[async_trait::async_trait]
pub trait PostRepository {
    async fn insert(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError>;

    /// Every post, newest first, with author, likes and comments resolved.
    async fn find_feed(&self) -> Result<Vec<PostDetail>, error::SystemError>;

    /// Returns `false` when the like already existed.
    async fn insert_like(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    /// Returns `false` when there was no like to remove.
    async fn delete_like(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn insert_comment(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
        content: &str,
    ) -> Result<CommentEntity, error::SystemError>;
}

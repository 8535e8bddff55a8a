use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::{InsertPost, PostDetail},
        repository::PostRepository,
        schema::{CommentEntity, PostEntity},
    },
};

#[derive(Clone)]
pub struct PostService<P>
where
    P: PostRepository + Send + Sync,
{
    post_repo: Arc<P>,
}

impl<P> PostService<P>
where
    P: PostRepository + Send + Sync,
{
    pub fn with_dependencies(post_repo: Arc<P>) -> Self {
        PostService { post_repo }
    }

    /// A post needs text or an image; whitespace-only text alone is empty.
    pub async fn create_post(
        &self,
        author: Uuid,
        content: Option<String>,
        image_url: Option<String>,
    ) -> Result<PostEntity, error::SystemError> {
        let content = content.map(|c| c.trim().to_string()).unwrap_or_default();

        if content.is_empty() && image_url.is_none() {
            return Err(error::SystemError::bad_request("Post cannot be empty"));
        }

        self.post_repo.insert(&InsertPost { user_id: author, content, image_url }).await
    }

    pub async fn get_feed(&self) -> Result<Vec<PostDetail>, error::SystemError> {
        self.post_repo.find_feed().await
    }

    /// Like when not yet liked, unlike otherwise. Returns the resulting state.
    pub async fn toggle_like(
        &self,
        acting: Uuid,
        post_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        if self.post_repo.find_by_id(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        if self.post_repo.delete_like(&post_id, &acting).await? {
            return Ok(false);
        }

        self.post_repo.insert_like(&post_id, &acting).await?;
        Ok(true)
    }

    pub async fn add_comment(
        &self,
        acting: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<CommentEntity, error::SystemError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(error::SystemError::bad_request("Comment cannot be empty"));
        }

        if self.post_repo.find_by_id(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        self.post_repo.insert_comment(&post_id, &acting, content).await
    }
}

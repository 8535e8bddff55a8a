use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::{CommentAuthorRow, CommentDetail, InsertPost, LikeRow, PostAuthorRow, PostDetail},
        repository::PostRepository,
        schema::{CommentEntity, PostEntity},
    },
    modules::user::model::ProfileSummary,
};

#[derive(Clone)]
pub struct PostRepositoryPg {
    pool: sqlx::PgPool,
}

impl PostRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PostRepositoryPg {
    async fn insert(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError> {
        let created = sqlx::query_as::<_, PostEntity>(
            r#"
            INSERT INTO posts (id, user_id, content, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(post.user_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        let post = sqlx::query_as::<_, PostEntity>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn find_feed(&self) -> Result<Vec<PostDetail>, error::SystemError> {
        let post_rows = sqlx::query_as::<_, PostAuthorRow>(
            r#"
            SELECT
                p.id,
                p.content,
                p.image_url,
                p.created_at,
                u.id AS user_id,
                u.username,
                u.full_name,
                u.avatar_url
            FROM posts p
            JOIN users u
                ON u.id = p.user_id
            WHERE u.deleted_at IS NULL
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let post_ids: Vec<Uuid> = post_rows.iter().map(|r| r.id).collect();

        let like_rows = sqlx::query_as::<_, LikeRow>(
            "SELECT post_id, user_id FROM likes WHERE post_id = ANY($1)",
        )
        .bind(&post_ids)
        .fetch_all(&self.pool)
        .await?;

        let comment_rows = sqlx::query_as::<_, CommentAuthorRow>(
            r#"
            SELECT
                c.id,
                c.post_id,
                c.content,
                c.created_at,
                u.id AS user_id,
                u.username,
                u.full_name,
                u.avatar_url
            FROM comments c
            JOIN users u
                ON u.id = c.user_id
            WHERE c.post_id = ANY($1)
              AND u.deleted_at IS NULL
            ORDER BY c.created_at
            "#,
        )
        .bind(&post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for like in like_rows {
            likes_by_post.entry(like.post_id).or_default().push(like.user_id);
        }

        let mut comments_by_post: HashMap<Uuid, Vec<CommentDetail>> = HashMap::new();
        for row in comment_rows {
            comments_by_post.entry(row.post_id).or_default().push(CommentDetail {
                id: row.id,
                content: row.content,
                created_at: row.created_at,
                author: ProfileSummary {
                    id: row.user_id,
                    username: row.username,
                    full_name: row.full_name,
                    avatar_url: row.avatar_url,
                },
            });
        }

        Ok(post_rows
            .into_iter()
            .map(|row| PostDetail {
                id: row.id,
                content: row.content,
                image_url: row.image_url,
                created_at: row.created_at,
                author: ProfileSummary {
                    id: row.user_id,
                    username: row.username,
                    full_name: row.full_name,
                    avatar_url: row.avatar_url,
                },
                likes: likes_by_post.remove(&row.id).unwrap_or_default(),
                comments: comments_by_post.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn insert_like(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "INSERT INTO likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_like(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn insert_comment(
        &self,
        post_id: &Uuid,
        user_id: &Uuid,
        content: &str,
    ) -> Result<CommentEntity, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>(
            r#"
            INSERT INTO comments (id, post_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}

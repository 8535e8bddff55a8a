use uuid::Uuid;

use crate::{
    api::error,
    modules::friendship::{
        model::{FriendRequestResponse, FriendResponse, FriendshipUserRow},
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus},
    },
    modules::user::model::ProfileSummary,
};

#[derive(Clone)]
pub struct FriendshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryPg {
    async fn insert(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, requester_id, addressee_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(requester_id)
        .bind(addressee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_between(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (requester_id = $1 AND addressee_id = $2)
             OR (requester_id = $2 AND addressee_id = $1)
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() > 1 {
            return Err(error::SystemError::DatabaseError(
                format!("multiple friendship rows between {user_a} and {user_b}").into(),
            ));
        }

        Ok(rows.pop())
    }

    async fn find_all_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            "SELECT * FROM friendships WHERE requester_id = $1 OR addressee_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn set_status_if_pending(
        &self,
        id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let updated = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn list_pending_for_addressee(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipUserRow>(
            r#"
            SELECT
                f.id AS friendship_id,
                u.id AS user_id,
                u.username,
                u.full_name,
                u.avatar_url,
                f.created_at
            FROM friendships f
            JOIN users u
                ON u.id = f.requester_id
            WHERE f.addressee_id = $1
              AND f.status = 'pending'
              AND u.deleted_at IS NULL
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| FriendRequestResponse {
                id: r.friendship_id,
                requester: ProfileSummary {
                    id: r.user_id,
                    username: r.username,
                    full_name: r.full_name,
                    avatar_url: r.avatar_url,
                },
                created_at: r.created_at,
            })
            .collect())
    }

    async fn list_accepted(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipUserRow>(
            r#"
            SELECT
                f.id AS friendship_id,
                u.id AS user_id,
                u.username,
                u.full_name,
                u.avatar_url,
                f.created_at
            FROM friendships f
            JOIN users u
                ON u.id = CASE
                    WHEN f.requester_id = $1 THEN f.addressee_id
                    ELSE f.requester_id
                END
            WHERE (f.requester_id = $1 OR f.addressee_id = $1)
              AND f.status = 'accepted'
              AND u.deleted_at IS NULL
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| FriendResponse {
                friendship_id: r.friendship_id,
                profile: ProfileSummary {
                    id: r.user_id,
                    username: r.username,
                    full_name: r.full_name,
                    avatar_url: r.avatar_url,
                },
                since: r.created_at,
            })
            .collect())
    }
}

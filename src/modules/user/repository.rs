use uuid::Uuid;

use crate::{
    api::error,
    modules::user::model::{InsertUser, UpdateUser},
    modules::user::schema::UserEntity,
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError>;
    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Case-insensitive substring search on username or full name, excluding
    /// `exclude_id`. Ordered by username so results are deterministic.
    async fn search_profiles(
        &self,
        query: &str,
        exclude_id: &Uuid,
        limit: i32,
    ) -> Result<Vec<UserEntity>, error::SystemError>;
}

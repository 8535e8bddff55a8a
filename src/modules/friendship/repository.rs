use uuid::Uuid;

use crate::api::error;
use crate::modules::friendship::model::{FriendRequestResponse, FriendResponse};
use crate::modules::friendship::schema::{FriendshipEntity, FriendshipStatus};

#[async_trait::async_trait]
pub trait FriendshipRepository {
    /// Inserts a new pending row. The store's unordered-pair unique index
    /// rejects a second row between the same two accounts.
    async fn insert(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// The row between two accounts, in either direction. More than one row
    /// for a pair is a data-integrity violation and reported as an error.
    async fn find_between(
        &self,
        user_a: &Uuid,
        user_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Every row the account appears in, regardless of status.
    async fn find_all_for(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    /// One-shot transition: updates only while the row is still pending.
    /// Returns `None` when no pending row matched.
    async fn set_status_if_pending(
        &self,
        id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn list_pending_for_addressee(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError>;

    async fn list_accepted(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError>;
}

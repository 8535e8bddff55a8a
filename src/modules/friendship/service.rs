use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friendship::{
            debounce::SearchDebouncer,
            model::{
                Decision, FriendRequestResponse, FriendResponse, RelationState, SearchCandidate,
            },
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::repository::UserRepository,
    },
};

const SEARCH_RESULT_LIMIT: i32 = 10;
const SEARCH_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct FriendshipService<F, U>
where
    F: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friendship_repo: Arc<F>,
    user_repo: Arc<U>,
    debouncer: Arc<SearchDebouncer>,
}

impl<F, U> FriendshipService<F, U>
where
    F: FriendshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friendship_repo: Arc<F>, user_repo: Arc<U>) -> Self {
        Self::new(
            friendship_repo,
            user_repo,
            Arc::new(SearchDebouncer::new(SEARCH_DEBOUNCE_WINDOW)),
        )
    }

    pub fn new(
        friendship_repo: Arc<F>,
        user_repo: Arc<U>,
        debouncer: Arc<SearchDebouncer>,
    ) -> Self {
        FriendshipService { friendship_repo, user_repo, debouncer }
    }

    /// Debounced candidate search. An empty query and a superseded query both
    /// resolve to an empty result without touching the store. Each candidate
    /// carries how it relates to the acting account.
    pub async fn search_candidates(
        &self,
        acting: Uuid,
        raw_query: &str,
    ) -> Result<Vec<SearchCandidate>, error::SystemError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if !self.debouncer.admit(acting).await {
            return Ok(Vec::new());
        }

        let (profiles, edges) = tokio::try_join!(
            self.user_repo.search_profiles(query, &acting, SEARCH_RESULT_LIMIT),
            self.friendship_repo.find_all_for(&acting),
        )?;

        let by_other: HashMap<Uuid, &FriendshipEntity> =
            edges.iter().map(|e| (e.other_party(&acting), e)).collect();

        Ok(profiles
            .into_iter()
            .map(|p| {
                let relation = match by_other.get(&p.id) {
                    None => RelationState::None,
                    Some(edge) => match edge.status {
                        FriendshipStatus::Pending if edge.requester_id == acting => {
                            RelationState::PendingSent
                        }
                        FriendshipStatus::Pending => RelationState::PendingReceived,
                        FriendshipStatus::Accepted => RelationState::Friends,
                        FriendshipStatus::Declined => RelationState::Declined,
                    },
                };
                SearchCandidate {
                    id: p.id,
                    username: p.username,
                    full_name: p.full_name,
                    avatar_url: p.avatar_url,
                    relation,
                }
            })
            .collect())
    }

    /// Creates a pending request. The existing-pair check runs before the
    /// insert; the store's unordered-pair unique index closes the remaining
    /// race window between two concurrent requesters.
    pub async fn send_request(
        &self,
        requester: Uuid,
        addressee: Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        if requester == addressee {
            return Err(error::SystemError::bad_request(
                "Cannot send a friend request to yourself",
            ));
        }

        let (addressee_user, existing) = tokio::try_join!(
            self.user_repo.find_by_id(&addressee),
            self.friendship_repo.find_between(&requester, &addressee),
        )?;

        if addressee_user.is_none() {
            return Err(error::SystemError::not_found("Addressee not found"));
        }

        if let Some(existing) = existing {
            return Err(match existing.status {
                FriendshipStatus::Accepted => {
                    error::SystemError::conflict("Users are already friends")
                }
                FriendshipStatus::Pending => error::SystemError::conflict(
                    "A friend request is already pending between these users",
                ),
                FriendshipStatus::Declined => error::SystemError::conflict(
                    "A previous request between these users was declined",
                ),
            });
        }

        self.friendship_repo.insert(&requester, &addressee).await
    }

    /// One-shot transition out of `pending`, by the addressee only.
    pub async fn respond_to_request(
        &self,
        acting: Uuid,
        request_id: Uuid,
        decision: Decision,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let request = self
            .friendship_repo
            .find_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.addressee_id != acting {
            return Err(error::SystemError::forbidden(
                "Only the addressee may answer a friend request",
            ));
        }

        if request.status != FriendshipStatus::Pending {
            return Err(error::SystemError::conflict(
                "Friend request has already been answered",
            ));
        }

        // The guarded update catches a concurrent responder between the read
        // above and this write.
        self.friendship_repo
            .set_status_if_pending(&request_id, decision.status())
            .await?
            .ok_or_else(|| {
                error::SystemError::conflict("Friend request has already been answered")
            })
    }

    pub async fn relationship_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        self.friendship_repo.find_between(&user_a, &user_b).await
    }

    pub async fn list_pending(
        &self,
        acting: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friendship_repo.list_pending_for_addressee(&acting).await
    }

    pub async fn list_friends(
        &self,
        acting: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        self.friendship_repo.list_accepted(&acting).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::model::{InsertUser, UpdateUser};
    use crate::modules::user::schema::{UserEntity, UserRole};
    use std::sync::Mutex;

    struct TestStore {
        users: Mutex<Vec<UserEntity>>,
        friendships: Mutex<Vec<FriendshipEntity>>,
        search_queries: Mutex<Vec<String>>,
    }

    impl TestStore {
        fn new() -> Arc<Self> {
            Arc::new(TestStore {
                users: Mutex::new(Vec::new()),
                friendships: Mutex::new(Vec::new()),
                search_queries: Mutex::new(Vec::new()),
            })
        }

        fn add_user(&self, username: &str, full_name: &str) -> Uuid {
            let id = Uuid::now_v7();
            self.users.lock().unwrap().push(UserEntity {
                id,
                username: username.to_string(),
                email: format!("{username}@example.test"),
                hash_password: String::new(),
                role: UserRole::User,
                full_name: full_name.to_string(),
                bio: None,
                location: None,
                avatar_url: None,
                deleted_at: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            });
            id
        }

        fn summary(&self, id: &Uuid) -> crate::modules::user::model::ProfileSummary {
            let users = self.users.lock().unwrap();
            let user = users.iter().find(|u| u.id == *id).expect("user in store");
            crate::modules::user::model::ProfileSummary::from(user.clone())
        }
    }

    #[derive(Clone)]
    struct TestUserRepo(Arc<TestStore>);

    #[async_trait::async_trait]
    impl UserRepository for TestUserRepo {
        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self
                .0
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == *id && u.deleted_at.is_none())
                .cloned())
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self.0.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn create(&self, _user: &InsertUser) -> Result<Uuid, error::SystemError> {
            unimplemented!("not exercised by friendship tests")
        }

        async fn update(
            &self,
            _id: &Uuid,
            _user: &UpdateUser,
        ) -> Result<UserEntity, error::SystemError> {
            unimplemented!("not exercised by friendship tests")
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, error::SystemError> {
            unimplemented!("not exercised by friendship tests")
        }

        async fn search_profiles(
            &self,
            query: &str,
            exclude_id: &Uuid,
            limit: i32,
        ) -> Result<Vec<UserEntity>, error::SystemError> {
            self.0.search_queries.lock().unwrap().push(query.to_string());
            let needle = query.to_lowercase();
            let mut hits: Vec<UserEntity> = self
                .0
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.deleted_at.is_none() && u.id != *exclude_id)
                .filter(|u| {
                    u.username.to_lowercase().contains(&needle)
                        || u.full_name.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            hits.sort_by(|a, b| a.username.cmp(&b.username));
            hits.truncate(limit as usize);
            Ok(hits)
        }
    }

    #[derive(Clone)]
    struct TestFriendshipRepo(Arc<TestStore>);

    #[async_trait::async_trait]
    impl FriendshipRepository for TestFriendshipRepo {
        async fn insert(
            &self,
            requester_id: &Uuid,
            addressee_id: &Uuid,
        ) -> Result<FriendshipEntity, error::SystemError> {
            let mut rows = self.0.friendships.lock().unwrap();
            // Mirror of the store's unordered-pair unique index.
            if rows.iter().any(|f| {
                (f.requester_id == *requester_id && f.addressee_id == *addressee_id)
                    || (f.requester_id == *addressee_id && f.addressee_id == *requester_id)
            }) {
                return Err(error::SystemError::DbConflict(None));
            }
            let row = FriendshipEntity {
                id: Uuid::now_v7(),
                requester_id: *requester_id,
                addressee_id: *addressee_id,
                status: FriendshipStatus::Pending,
                created_at: chrono::Utc::now(),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<FriendshipEntity>, error::SystemError> {
            Ok(self.0.friendships.lock().unwrap().iter().find(|f| f.id == *id).cloned())
        }

        async fn find_between(
            &self,
            user_a: &Uuid,
            user_b: &Uuid,
        ) -> Result<Option<FriendshipEntity>, error::SystemError> {
            Ok(self
                .0
                .friendships
                .lock()
                .unwrap()
                .iter()
                .find(|f| {
                    (f.requester_id == *user_a && f.addressee_id == *user_b)
                        || (f.requester_id == *user_b && f.addressee_id == *user_a)
                })
                .cloned())
        }

        async fn find_all_for(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
            Ok(self
                .0
                .friendships
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.requester_id == *user_id || f.addressee_id == *user_id)
                .cloned()
                .collect())
        }

        async fn set_status_if_pending(
            &self,
            id: &Uuid,
            status: FriendshipStatus,
        ) -> Result<Option<FriendshipEntity>, error::SystemError> {
            let mut rows = self.0.friendships.lock().unwrap();
            match rows
                .iter_mut()
                .find(|f| f.id == *id && f.status == FriendshipStatus::Pending)
            {
                Some(row) => {
                    row.status = status;
                    Ok(Some(row.clone()))
                }
                None => Ok(None),
            }
        }

        async fn list_pending_for_addressee(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
            Ok(self
                .0
                .friendships
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.addressee_id == *user_id && f.status == FriendshipStatus::Pending)
                .map(|f| FriendRequestResponse {
                    id: f.id,
                    requester: self.0.summary(&f.requester_id),
                    created_at: f.created_at,
                })
                .collect())
        }

        async fn list_accepted(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<FriendResponse>, error::SystemError> {
            Ok(self
                .0
                .friendships
                .lock()
                .unwrap()
                .iter()
                .filter(|f| {
                    (f.requester_id == *user_id || f.addressee_id == *user_id)
                        && f.status == FriendshipStatus::Accepted
                })
                .map(|f| FriendResponse {
                    friendship_id: f.id,
                    profile: self.0.summary(&f.other_party(user_id)),
                    since: f.created_at,
                })
                .collect())
        }
    }

    type TestService = FriendshipService<TestFriendshipRepo, TestUserRepo>;

    fn service(store: &Arc<TestStore>) -> TestService {
        service_with_window(store, Duration::from_millis(5))
    }

    fn service_with_window(store: &Arc<TestStore>, window: Duration) -> TestService {
        FriendshipService::new(
            Arc::new(TestFriendshipRepo(store.clone())),
            Arc::new(TestUserRepo(store.clone())),
            Arc::new(SearchDebouncer::new(window)),
        )
    }

    #[tokio::test]
    async fn accepted_friendship_is_symmetric() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();
        svc.respond_to_request(ben, request.id, Decision::Accept).await.unwrap();

        let anna_friends = svc.list_friends(anna).await.unwrap();
        let ben_friends = svc.list_friends(ben).await.unwrap();
        assert_eq!(anna_friends.len(), 1);
        assert_eq!(anna_friends[0].profile.id, ben);
        assert_eq!(ben_friends.len(), 1);
        assert_eq!(ben_friends[0].profile.id, anna);
    }

    #[tokio::test]
    async fn self_request_is_rejected_before_the_store() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let svc = service(&store);

        let result = svc.send_request(anna, anna).await;
        assert!(matches!(result, Err(error::SystemError::BadRequest(_))));
        assert!(store.friendships.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_request_is_rejected_in_both_directions() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        svc.send_request(anna, ben).await.unwrap();

        let same_direction = svc.send_request(anna, ben).await;
        assert!(matches!(same_direction, Err(error::SystemError::Conflict(_))));

        let reverse_direction = svc.send_request(ben, anna).await;
        assert!(matches!(reverse_direction, Err(error::SystemError::Conflict(_))));

        assert_eq!(store.friendships.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn declined_pair_blocks_a_fresh_request() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();
        svc.respond_to_request(ben, request.id, Decision::Decline).await.unwrap();

        let retry = svc.send_request(anna, ben).await;
        assert!(matches!(retry, Err(error::SystemError::Conflict(_))));
    }

    #[tokio::test]
    async fn answered_request_accepts_no_further_transitions() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();
        svc.respond_to_request(ben, request.id, Decision::Decline).await.unwrap();

        let flip = svc.respond_to_request(ben, request.id, Decision::Accept).await;
        assert!(matches!(flip, Err(error::SystemError::Conflict(_))));

        // Re-applying the same decision is rejected too; the transition is
        // one-shot, not idempotent.
        let repeat = svc.respond_to_request(ben, request.id, Decision::Decline).await;
        assert!(matches!(repeat, Err(error::SystemError::Conflict(_))));
    }

    #[tokio::test]
    async fn only_the_addressee_may_respond() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();

        let by_requester = svc.respond_to_request(anna, request.id, Decision::Accept).await;
        assert!(matches!(by_requester, Err(error::SystemError::Forbidden(_))));

        let row = svc.relationship_between(anna, ben).await.unwrap().unwrap();
        assert_eq!(row.status, FriendshipStatus::Pending);
    }

    #[tokio::test]
    async fn responding_to_unknown_request_is_not_found() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let svc = service(&store);

        let result = svc.respond_to_request(anna, Uuid::now_v7(), Decision::Accept).await;
        assert!(matches!(result, Err(error::SystemError::NotFound(_))));
    }

    #[tokio::test]
    async fn request_to_unknown_addressee_is_not_found() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let svc = service(&store);

        let result = svc.send_request(anna, Uuid::now_v7()).await;
        assert!(matches!(result, Err(error::SystemError::NotFound(_))));
    }

    #[tokio::test]
    async fn request_then_accept_scenario() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();
        assert_eq!(request.requester_id, anna);
        assert_eq!(request.addressee_id, ben);
        assert_eq!(request.status, FriendshipStatus::Pending);

        let incoming = svc.list_pending(ben).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].id, request.id);
        assert_eq!(incoming[0].requester.id, anna);

        let accepted = svc.respond_to_request(ben, request.id, Decision::Accept).await.unwrap();
        assert_eq!(accepted.status, FriendshipStatus::Accepted);

        let friends = svc.list_friends(anna).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].profile.id, ben);
        assert_eq!(friends[0].profile.username, "ben");

        // The answered request leaves the pending list.
        assert!(svc.list_pending(ben).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_never_returns_the_acting_account() {
        let store = TestStore::new();
        let alex = store.add_user("alex_j", "Alex Johnson");
        store.add_user("alexa", "Alexa Venter");
        let svc = service(&store);

        let results = svc.search_candidates(alex, "alex").await.unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|c| c.id != alex));
    }

    #[tokio::test]
    async fn empty_query_short_circuits_without_a_store_call() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let svc = service(&store);

        let results = svc.search_candidates(anna, "   ").await.unwrap();
        assert!(results.is_empty());
        assert!(store.search_queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_without_matches_returns_empty() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let results = svc.search_candidates(anna, "mike").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_annotates_relation_state_from_both_sides() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        let ben = store.add_user("ben", "Ben Groenewald");
        let svc = service(&store);

        let request = svc.send_request(anna, ben).await.unwrap();

        let seen_by_anna = svc.search_candidates(anna, "ben").await.unwrap();
        assert_eq!(seen_by_anna[0].relation, RelationState::PendingSent);

        let seen_by_ben = svc.search_candidates(ben, "anna").await.unwrap();
        assert_eq!(seen_by_ben[0].relation, RelationState::PendingReceived);

        svc.respond_to_request(ben, request.id, Decision::Accept).await.unwrap();

        let after_accept = svc.search_candidates(anna, "ben").await.unwrap();
        assert_eq!(after_accept[0].relation, RelationState::Friends);
    }

    #[tokio::test]
    async fn rapid_keystrokes_issue_one_store_query_for_the_last_input() {
        let store = TestStore::new();
        let anna = store.add_user("anna", "Anna Brink");
        store.add_user("alex_j", "Alex Johnson");
        let svc = service_with_window(&store, Duration::from_millis(80));

        let mut handles = Vec::new();
        for query in ["al", "ale", "alex"] {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.search_candidates(anna, query).await.unwrap()
            }));
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let results: Vec<Vec<SearchCandidate>> = futures_util::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        // Superseded keystrokes resolved empty; only the last one searched.
        assert!(results[0].is_empty());
        assert!(results[1].is_empty());
        assert_eq!(results[2].len(), 1);
        assert_eq!(*store.search_queries.lock().unwrap(), vec!["alex".to_string()]);
    }
}

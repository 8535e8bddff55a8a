use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friendship::{
            model::{
                Decision, FriendRequestResponse, FriendResponse, SearchCandidate, SearchParams,
                SendRequestBody,
            },
            repository_pg::FriendshipRepositoryPg,
            schema::FriendshipEntity,
            service::FriendshipService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedQuery,
};

pub type FriendshipSvc = FriendshipService<FriendshipRepositoryPg, UserRepositoryPg>;

#[post("/requests")]
pub async fn send_friend_request(
    friendship_service: web::Data<FriendshipSvc>,
    body: web::Json<SendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let requester = get_claims(&req)?.sub;
    let request = friendship_service.send_request(requester, body.addressee_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[post("/requests/{request_id}/accept")]
pub async fn accept_friend_request(
    friendship_service: web::Data<FriendshipSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let updated =
        friendship_service.respond_to_request(acting, *request_id, Decision::Accept).await?;

    Ok(success::Success::ok(Some(updated)).message("Friend request accepted successfully"))
}

#[post("/requests/{request_id}/decline")]
pub async fn decline_friend_request(
    friendship_service: web::Data<FriendshipSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let updated =
        friendship_service.respond_to_request(acting, *request_id, Decision::Decline).await?;

    Ok(success::Success::ok(Some(updated)).message("Friend request declined"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    friendship_service: web::Data<FriendshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let requests = friendship_service.list_pending(acting).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/search")]
pub async fn search_candidates(
    friendship_service: web::Data<FriendshipSvc>,
    params: ValidatedQuery<SearchParams>,
    req: HttpRequest,
) -> Result<success::Success<Vec<SearchCandidate>>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let query = params.0.q.as_deref().unwrap_or("");
    let candidates = friendship_service.search_candidates(acting, query).await?;

    Ok(success::Success::ok(Some(candidates)))
}

#[get("/with/{user_id}")]
pub async fn relationship_with(
    friendship_service: web::Data<FriendshipSvc>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipEntity>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let relationship = friendship_service.relationship_between(acting, *user_id).await?;

    Ok(success::Success::ok(relationship))
}

#[get("/")]
pub async fn list_friends(
    friendship_service: web::Data<FriendshipSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let friends = friendship_service.list_friends(acting).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

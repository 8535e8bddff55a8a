use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::post::{
        model::{CommentBody, CreatePostBody, LikeResponse, PostDetail},
        repository_pg::PostRepositoryPg,
        schema::{CommentEntity, PostEntity},
        service::PostService,
    },
};

pub type PostSvc = PostService<PostRepositoryPg>;

#[post("/")]
pub async fn create_post(
    post_service: web::Data<PostSvc>,
    body: web::Json<CreatePostBody>,
    req: HttpRequest,
) -> Result<success::Success<PostEntity>, error::Error> {
    let author = get_claims(&req)?.sub;
    let post =
        post_service.create_post(author, body.content.clone(), body.image_url.clone()).await?;

    Ok(success::Success::created(Some(post)).message("Post created successfully"))
}

#[get("/")]
pub async fn get_feed(
    post_service: web::Data<PostSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PostDetail>>, error::Error> {
    get_claims(&req)?;
    let feed = post_service.get_feed().await?;

    Ok(success::Success::ok(Some(feed)))
}

#[post("/{post_id}/like")]
pub async fn toggle_like(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<LikeResponse>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let post_id = post_id.into_inner();
    let liked = post_service.toggle_like(acting, post_id).await?;

    Ok(success::Success::ok(Some(LikeResponse { post_id, liked })))
}

#[post("/{post_id}/comments")]
pub async fn add_comment(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    body: web::Json<CommentBody>,
    req: HttpRequest,
) -> Result<success::Success<CommentEntity>, error::Error> {
    let acting = get_claims(&req)?.sub;
    let comment = post_service.add_comment(acting, *post_id, &body.content).await?;

    Ok(success::Success::created(Some(comment)).message("Comment posted successfully"))
}

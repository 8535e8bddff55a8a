use crate::modules::friendship::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(list_friend_requests)
            .service(search_candidates)
            .service(relationship_with)
            .service(list_friends),
    );
}

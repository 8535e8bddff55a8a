use actix_web::web::{resource, scope, ServiceConfig};

use crate::modules::file_upload::handle;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/files")
            .service(resource("/upload").route(actix_web::web::post().to(handle::upload_file)))
            .service(
                resource("/{file_id}")
                    .route(actix_web::web::get().to(handle::get_file))
                    .route(actix_web::web::delete().to(handle::delete_file)),
            ),
    );
}

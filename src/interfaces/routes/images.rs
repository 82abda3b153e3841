use actix_web::web;

use crate::handlers::images;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/images")
            .service(
                web::resource("")
                    .route(web::get().to(images::list_images))
                    .route(web::post().to(images::upload_image))
            )
            .service(
                web::resource("/{image_id}")
                    .route(web::get().to(images::get_image))
                    .route(web::delete().to(images::delete_image))
            )
            .service(
                web::resource("/{image_id}/file")
                    .route(web::get().to(images::serve_image_file))
            )
    );
}

use actix_web::web;

use crate::{entities::image::UploadPolicy, handlers::system::health_check};

mod articles;
mod images;
mod extractor_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_policy: &UploadPolicy) {
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(articles::config_routes)
            .configure(images::config_routes)
    );

    cfg.configure(|cfg| extractor_errors::config_routes(cfg, upload_policy.max_size));
}

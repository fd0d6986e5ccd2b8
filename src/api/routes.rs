// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::page_shell))
        .route("/", web::post().to(handlers::submit))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
        )
        .route("/{_:.*}", web::get().to(handlers::static_file));
}

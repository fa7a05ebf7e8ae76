// Route exports
pub mod profile;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(profile::health_check))
        .service(web::scope("/api").configure(profile::configure));
}

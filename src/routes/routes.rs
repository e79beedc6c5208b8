use actix_web::web;

use crate::error::AppError;
use crate::handlers::health_handlers::health_check;
use crate::handlers::track_handlers::track_visit;
use crate::handlers::visit_handlers::{get_all_visits, get_unique_visits, get_visit_summary};

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON error shape as failed validation
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidBody(err.to_string()).into()),
    );

    cfg.route("/track", web::post().to(track_visit));
    cfg.route("/health", web::get().to(health_check));
    cfg.service(
        web::scope("/api/visits")
            .route("", web::get().to(get_all_visits))
            .route("/unique", web::get().to(get_unique_visits))
            .route("/summary", web::get().to(get_visit_summary)),
    );
}

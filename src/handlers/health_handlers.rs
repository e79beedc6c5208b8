use actix_web::{HttpResponse, web};

use crate::state::app_state::AppState;

pub async fn health_check(app_state: web::Data<AppState>) -> HttpResponse {
    // A round trip to the store is the only dependency worth checking
    match app_state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Health check failed: {e:#}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": "Database connection failed" }))
        }
    }
}

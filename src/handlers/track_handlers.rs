use actix_web::{HttpRequest, HttpResponse, http, web};
use validator::Validate;

use crate::error::AppError;
use crate::models::visitor::Visitor;
use crate::state::app_state::AppState;
use crate::structs::track_request::{TrackRequest, TrackResponse};
use crate::utils::client_ip::{normalize_ip, resolve_client_ip};
use crate::utils::user_agent::parse_user_agent;

/// One-line log description. Caller-supplied fields are debug-quoted so
/// embedded control characters cannot start a new log line.
fn describe_visit(visitor: &Visitor) -> String {
    format!(
        "ip={:?} browser={:?} device={:?} page={:?} is_new_visit={}",
        visitor.ip, visitor.browser, visitor.device, visitor.page, visitor.is_new_visit
    )
}

/// Record a page visit
pub async fn track_visit(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    web::Json(body): web::Json<TrackRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let ip = normalize_ip(&resolve_client_ip(&req), app_state.placeholder_ip);

    // Explicit body value first, then whatever the caller itself sent
    let user_agent = body.user_agent.unwrap_or_else(|| {
        req.headers()
            .get(http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    });
    let parsed = parse_user_agent(&user_agent);

    let visitor = Visitor::new(
        ip,
        parsed.browser,
        parsed.device,
        body.page,
        user_agent,
        body.is_new_visit,
    );

    app_state.store.insert(&visitor).await?;

    log::info!("Tracked visit: {}", describe_visit(&visitor));

    Ok(HttpResponse::Ok().json(TrackResponse { success: true }))
}

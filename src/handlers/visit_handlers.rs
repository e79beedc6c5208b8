use actix_web::{HttpResponse, web};

use crate::db::store::{GroupField, VisitFilter};
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::structs::summary::VisitSummaryResponse;

/// All visits, newest first
pub async fn get_all_visits(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let visits = app_state.store.find(VisitFilter::All).await?;
    Ok(HttpResponse::Ok().json(visits))
}

/// Visits flagged as new, newest first
pub async fn get_unique_visits(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let visits = app_state.store.find(VisitFilter::NewVisitsOnly).await?;
    Ok(HttpResponse::Ok().json(visits))
}

/// Totals, device and browser breakdowns, and located visits
pub async fn get_visit_summary(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = &app_state.store;

    // Independent reads; the first failure fails the whole summary
    let (total_unique, total_visits, by_device, by_browser, coordinates) = futures_util::try_join!(
        store.count(VisitFilter::NewVisitsOnly),
        store.count(VisitFilter::All),
        store.group_counts(GroupField::Device),
        store.group_counts(GroupField::Browser),
        store.coordinates(),
    )?;

    let summary = VisitSummaryResponse {
        total_unique,
        total_visits,
        by_device: by_device.into_iter().map(Into::into).collect(),
        by_browser: by_browser.into_iter().map(Into::into).collect(),
        coordinates,
    };

    Ok(HttpResponse::Ok().json(summary))
}

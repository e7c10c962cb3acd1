// Route exports
pub mod activities;
pub mod centres;
pub mod sitemap;

use actix_web::{http::header, web, HttpResponse, HttpResponseBuilder, Responder};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::core::geolocation::{LocationOptions, ProximityState, ReportedLocation};
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{UpstreamClient, UpstreamError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub location: LocationOptions,
    /// Public origin used for sitemap links
    pub site_url: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sitemap.xml", web::get().to(sitemap::sitemap))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(health_check))
                .configure(centres::configure)
                .configure(activities::configure),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_responses: state.upstream.cache().stats().entries,
    })
}

/// Calendar day used for date-window filtering
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve the "close to me" toggle for one request
pub(crate) async fn resolve_proximity(
    near: bool,
    reported: &ReportedLocation,
    options: &LocationOptions,
) -> ProximityState {
    let mut proximity = ProximityState::default();
    proximity.set_enabled(near, reported, options).await;
    proximity
}

/// Successful listing response, cacheable for the upstream revalidation interval
pub(crate) fn listing_ok(state: &AppState) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.insert_header((
        header::CACHE_CONTROL,
        format!("public, max-age={}", state.upstream.cache().ttl_secs()),
    ));
    builder
}

pub(crate) fn validation_error(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

pub(crate) fn not_found(message: String) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
        message,
        status_code: 404,
    })
}

/// Map an upstream failure to a JSON error; missing resources become 404, the rest 502
pub(crate) fn upstream_error(context: &str, err: UpstreamError) -> HttpResponse {
    if err.is_not_found() {
        tracing::info!("{}: {}", context, err);
        return not_found(err.to_string());
    }

    tracing::error!("{}: {}", context, err);
    HttpResponse::BadGateway().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 502,
    })
}

// Route exports
pub mod matching;
pub mod tenders;

use crate::models::{ErrorResponse, HealthResponse, StatusResponse};
use crate::services::{MatchingError, MatchingService};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .configure(matching::configure)
                .configure(tenders::configure),
        );
}

/// Root endpoint, reports that the API is up
async fn status() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "Tender Match API".to_string(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.service.store().health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn service_error(context: &str, err: MatchingError) -> HttpResponse {
    if err.is_client_error() {
        tracing::info!("{}: {}", context, err);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: context.to_string(),
            message: err.to_string(),
            status_code: 400,
        });
    }

    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 500,
    })
}

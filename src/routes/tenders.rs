use super::{service_error, AppState};
use crate::models::{ErrorResponse, FetchTendersResponse, TenderCountResponse};
use actix_web::{web, HttpResponse, Responder};

/// Configure tender routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/tenders/count", web::get().to(count_tenders))
        .route("/tenders/fetch", web::post().to(fetch_tenders));
}

/// GET /api/v1/tenders/count
async fn count_tenders(state: web::Data<AppState>) -> impl Responder {
    match state.service.store().count_tenders().await {
        Ok(total_tenders) => HttpResponse::Ok().json(TenderCountResponse { total_tenders }),
        Err(e) => {
            tracing::error!("Failed to count tenders: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to count tenders".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Pull a fresh listing from GeM and store it
///
/// POST /api/v1/tenders/fetch
async fn fetch_tenders(state: web::Data<AppState>) -> impl Responder {
    match state.service.fetch_and_store_tenders(true).await {
        Ok(total_tenders) => HttpResponse::Ok().json(FetchTendersResponse {
            success: true,
            message: format!("Fetched and saved {} tenders", total_tenders),
            total_tenders,
        }),
        Err(e) => service_error("Failed to fetch tenders", e),
    }
}

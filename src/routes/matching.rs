use super::{service_error, validation_error, AppState};
use crate::models::{
    AsyncMatchingResponse, ErrorResponse, ListMatchesQuery, RunMatchingRequest,
    RunMatchingResponse,
};
use crate::services::MatchFilter;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match", web::post().to(run_matching))
        .route("/match/async", web::post().to(run_matching_async))
        .route("/matches", web::get().to(list_matches))
        .route("/stats", web::get().to(match_statistics));
}

/// Run a matching pass and return its results
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// {
///   "use_ai": false,
///   "min_score": 1.0,
///   "save_results": true
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state
        .service
        .execute(req.use_ai, req.min_score, req.save_results)
        .await
    {
        Ok(matches) => HttpResponse::Ok().json(RunMatchingResponse {
            success: true,
            message: format!("Found {} matches", matches.len()),
            total_matches: matches.len(),
            matches,
        }),
        Err(e) => service_error("Matching failed", e),
    }
}

/// Start a matching pass in the background
///
/// POST /api/v1/match/async
async fn run_matching_async(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let job_id = uuid::Uuid::new_v4().to_string();
    let service = state.service.clone();
    let req = req.into_inner();

    tracing::info!("Queued matching job {}", job_id);

    let job = job_id.clone();
    actix_web::rt::spawn(async move {
        match service.execute(req.use_ai, req.min_score, req.save_results).await {
            Ok(matches) => tracing::info!("Matching job {} finished with {} matches", job, matches.len()),
            Err(e) => tracing::error!("Matching job {} failed: {}", job, e),
        }
    });

    HttpResponse::Accepted().json(AsyncMatchingResponse {
        success: true,
        message: "Matching started in background".to_string(),
        status: "processing".to_string(),
        job_id,
    })
}

/// List stored matches
///
/// GET /api/v1/matches?min_score=2&product=Cloud%20Migration&limit=50
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ListMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let query = query.into_inner();
    let filter = MatchFilter {
        min_score: query.min_score,
        product: query.product,
        limit: Some(query.limit),
    };

    match state.service.store().find_matches(&filter).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => {
            tracing::error!("Failed to list matches: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Statistics over stored matches
///
/// GET /api/v1/stats
async fn match_statistics(state: web::Data<AppState>) -> impl Responder {
    match state.service.statistics().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => service_error("Failed to compute statistics", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summarize;
    use crate::models::{ExternalMatchRecord, MatchType};

    #[test]
    fn test_run_matching_response_shape() {
        let matches = vec![ExternalMatchRecord {
            tender_id: "t1".to_string(),
            tender_name: "Cloud".to_string(),
            matched_product: "Cloud Migration".to_string(),
            score: 2.0,
            reasons: vec!["Keyword 'cloud' found in tender tags".to_string()],
            market_url: "https://x/t1".to_string(),
            match_type: MatchType::RuleBased,
        }];

        let response = RunMatchingResponse {
            success: true,
            message: "Found 1 matches".to_string(),
            total_matches: matches.len(),
            matches: matches.clone(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["total_matches"], 1);
        assert_eq!(json["matches"][0]["match_type"], "rule-based");
        assert_eq!(summarize(&matches).by_product["Cloud Migration"], 1);
    }
}

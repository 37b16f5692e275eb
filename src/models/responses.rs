use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::ExternalMatchRecord;

/// Response for the run matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchingResponse {
    pub success: bool,
    pub message: String,
    pub total_matches: usize,
    pub matches: Vec<ExternalMatchRecord>,
}

/// Response for a matching run started in the background
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncMatchingResponse {
    pub success: bool,
    pub message: String,
    pub status: String,
    pub job_id: String,
}

/// Aggregate view over stored matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub total_matches: usize,
    pub by_product: BTreeMap<String, usize>,
    pub score_distribution: BTreeMap<String, usize>,
}

/// Response for the tender fetch endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchTendersResponse {
    pub success: bool,
    pub message: String,
    pub total_tenders: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderCountResponse {
    pub total_tenders: i64,
}

/// Service status for the root endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

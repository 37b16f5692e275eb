use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to run a matching pass
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchingRequest {
    #[serde(default)]
    pub use_ai: bool,
    /// Falls back to the configured threshold of the selected mode when absent
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default = "default_true")]
    pub save_results: bool,
}

fn default_true() -> bool {
    true
}

/// Query parameters for listing stored matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListMatchesQuery {
    #[validate(range(min = 0.0))]
    pub min_score: Option<f64>,
    #[validate(length(min = 1))]
    pub product: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

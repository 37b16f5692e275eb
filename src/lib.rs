//! Tender Match - government tender ingestion and product matching service
//!
//! Tenders are pulled from the GeM marketplace and matched against a product
//! catalog, either by keyword scoring or by a language model.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, format_matches, rank_by_score, MatchError, Matcher};
pub use models::{ExternalMatchRecord, MatchCandidate, MatchType, ProductOffering, Tender};

// Core algorithm exports
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod normalizer;
pub mod scoring;
pub mod stats;

pub use error::MatchError;
pub use formatter::{cap_per_tender, format_matches, rank_by_score};
pub use matcher::Matcher;
pub use normalizer::{normalize, normalize_all, normalize_set};
pub use scoring::calculate_match_score;
pub use stats::summarize;

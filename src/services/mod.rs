// Service exports
pub mod cache;
pub mod catalog;
pub mod gem;
pub mod matching;
pub mod ollama;
pub mod postgres;

pub use cache::{listing_key, CacheError, CacheManager};
pub use catalog::{export_matches, load_catalog, load_tenders_file, CatalogError};
pub use gem::{GemClient, GemError};
pub use matching::{resolve_threshold, run_matching, MatchEngine, MatchingError, MatchingService};
pub use ollama::{parse_llm_response, OllamaClient, OllamaError};
pub use postgres::{MatchFilter, PostgresClient, PostgresError};

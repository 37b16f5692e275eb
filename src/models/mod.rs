// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ExternalMatchRecord, LlmMatchResult, MatchCandidate, MatchType, ProductCatalog,
    ProductOffering, Tender, TenderCollection, ACTIVE_STATUS,
};
pub use requests::{ListMatchesQuery, RunMatchingRequest};
pub use responses::{
    AsyncMatchingResponse, ErrorResponse, FetchTendersResponse, HealthResponse,
    MatchStatistics, RunMatchingResponse, StatusResponse, TenderCountResponse,
};

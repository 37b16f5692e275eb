use crate::config::{Settings, TenderSource};
use crate::core::{cap_per_tender, format_matches, rank_by_score, summarize, MatchError, Matcher};
use crate::models::{
    ExternalMatchRecord, MatchCandidate, MatchStatistics, MatchType, ProductOffering, Tender,
    TenderCollection,
};
use crate::services::cache::CacheManager;
use crate::services::catalog::{self, CatalogError};
use crate::services::gem::{GemClient, GemError};
use crate::services::ollama::OllamaClient;
use crate::services::postgres::{MatchFilter, PostgresClient, PostgresError};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort a matching run
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("GeM error: {0}")]
    Gem(#[from] GemError),

    #[error("Database error: {0}")]
    Store(#[from] PostgresError),

    #[error("Data file error: {0}")]
    Catalog(#[from] CatalogError),
}

impl MatchingError {
    /// Caller-supplied input was rejected
    pub fn is_client_error(&self) -> bool {
        matches!(self, MatchingError::Match(_))
    }
}

/// The matcher selected for a run
pub enum MatchEngine<'a> {
    RuleBased(&'a Matcher),
    AiAssisted(&'a OllamaClient),
}

impl MatchEngine<'_> {
    pub fn match_type(&self) -> MatchType {
        match self {
            MatchEngine::RuleBased(_) => MatchType::RuleBased,
            MatchEngine::AiAssisted(_) => MatchType::Ai,
        }
    }

    pub async fn run(
        &self,
        offerings: &[ProductOffering],
        tenders: &[Tender],
        min_score: f64,
    ) -> Result<Vec<MatchCandidate>, MatchError> {
        match self {
            MatchEngine::RuleBased(matcher) => matcher.find_matches(offerings, tenders, min_score),
            MatchEngine::AiAssisted(client) => {
                ensure_finite(min_score)?;
                Ok(client.analyze(tenders, offerings, min_score).await)
            }
        }
    }
}

/// Pick the threshold for a run: the explicit value, else the mode default
pub fn resolve_threshold(
    requested: Option<f64>,
    use_ai: bool,
    settings: &Settings,
) -> Result<f64, MatchError> {
    let min_score = requested.unwrap_or(if use_ai {
        settings.llm.min_score
    } else {
        settings.matching.min_score
    });

    ensure_finite(min_score)?;
    Ok(min_score)
}

fn ensure_finite(min_score: f64) -> Result<(), MatchError> {
    if min_score.is_finite() {
        Ok(())
    } else {
        Err(MatchError::Configuration(format!(
            "min_score must be a finite number, got {}",
            min_score
        )))
    }
}

/// Run an engine and shape its output into ranked records
pub async fn run_matching(
    engine: &MatchEngine<'_>,
    offerings: &[ProductOffering],
    tenders: &[Tender],
    min_score: f64,
    max_per_tender: Option<usize>,
) -> Result<Vec<ExternalMatchRecord>, MatchError> {
    let candidates = engine.run(offerings, tenders, min_score).await?;

    let mut records = format_matches(candidates);
    rank_by_score(&mut records);

    Ok(match max_per_tender {
        Some(limit) => cap_per_tender(records, limit),
        None => records,
    })
}

/// End-to-end matching: load inputs, match, persist
pub struct MatchingService {
    gem: Arc<GemClient>,
    store: Arc<PostgresClient>,
    cache: Option<Arc<CacheManager>>,
    matcher: Matcher,
    ollama: Arc<OllamaClient>,
    settings: Arc<Settings>,
}

impl MatchingService {
    pub fn new(
        gem: Arc<GemClient>,
        store: Arc<PostgresClient>,
        cache: Option<Arc<CacheManager>>,
        matcher: Matcher,
        ollama: Arc<OllamaClient>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            gem,
            store,
            cache,
            matcher,
            ollama,
            settings,
        }
    }

    pub fn store(&self) -> &PostgresClient {
        &self.store
    }

    /// Run one matching pass
    pub async fn execute(
        &self,
        use_ai: bool,
        min_score: Option<f64>,
        save_results: bool,
    ) -> Result<Vec<ExternalMatchRecord>, MatchingError> {
        let engine = if use_ai {
            MatchEngine::AiAssisted(&self.ollama)
        } else {
            MatchEngine::RuleBased(&self.matcher)
        };
        let min_score = resolve_threshold(min_score, use_ai, &self.settings)?;

        tracing::info!(
            "Starting {} matching (min_score={})",
            engine.match_type(),
            min_score
        );

        let tenders = self.load_tenders().await?;
        if tenders.is_empty() {
            tracing::warn!("No tenders available for matching");
            return Ok(vec![]);
        }

        let products = catalog::load_catalog(&self.settings.matching.products_file).await?;
        if products.offerings.is_empty() {
            tracing::warn!("No products available for matching");
            return Ok(vec![]);
        }

        let records = run_matching(
            &engine,
            &products.offerings,
            &tenders,
            min_score,
            self.settings.matching.max_matches_per_tender,
        )
        .await?;

        tracing::info!(
            "Matching complete: {} matches across {} tenders and {} products",
            records.len(),
            tenders.len(),
            products.offerings.len()
        );

        if save_results && !records.is_empty() {
            self.store.save_matches(&records).await?;

            if let Some(dir) = &self.settings.matching.export_dir {
                if let Err(e) = catalog::export_matches(dir, &records).await {
                    tracing::warn!("Failed to export matches to {}: {}", dir, e);
                }
            }
        }

        Ok(records)
    }

    /// Fetch the GeM listing and upsert it into the store
    ///
    /// With `refresh` the cached listing is dropped first.
    pub async fn fetch_and_store_tenders(&self, refresh: bool) -> Result<usize, MatchingError> {
        let status = &self.settings.gem.status;

        if refresh {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.invalidate_listing(status).await {
                    tracing::warn!("Failed to invalidate cached listing: {}", e);
                }
            }
        }

        let collection = self.fetch_listing(status).await?;
        catalog::validate_tenders(&collection.services).map_err(CatalogError::from)?;
        self.store.save_tenders(&collection.services).await?;

        Ok(collection.services.len())
    }

    /// Statistics over every stored match
    pub async fn statistics(&self) -> Result<MatchStatistics, MatchingError> {
        let records = self.store.find_matches(&MatchFilter::default()).await?;
        Ok(summarize(&records))
    }

    async fn load_tenders(&self) -> Result<Vec<Tender>, MatchingError> {
        match self.settings.matching.tender_source {
            TenderSource::File => {
                let path = &self.settings.matching.tenders_file;
                Ok(catalog::load_tenders_file(path).await?.services)
            }
            TenderSource::Database => {
                if self.store.count_tenders().await? == 0 {
                    tracing::info!("No tenders stored, fetching from GeM");
                    self.fetch_and_store_tenders(false).await?;
                }
                Ok(self.store.find_all_tenders().await?)
            }
        }
    }

    async fn fetch_listing(&self, status: &str) -> Result<TenderCollection, MatchingError> {
        if let Some(cache) = &self.cache {
            match cache.get_listing(status).await {
                Ok(Some(collection)) => {
                    tracing::debug!("Using cached GeM listing ({} tenders)", collection.services.len());
                    return Ok(collection);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Cached listing unavailable: {}", e),
            }
        }

        let collection = self.gem.fetch_tenders().await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_listing(status, &collection).await {
                tracing::warn!("Failed to cache GeM listing: {}", e);
            }
        }

        Ok(collection)
    }
}

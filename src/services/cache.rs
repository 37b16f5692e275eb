use crate::models::TenderCollection;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Redis key of the GeM listing fetched for a status filter
pub fn listing_key(status: &str) -> String {
    format!("tenders:gem:{}", status)
}

/// Cache for GeM tender listings
///
/// Listings are kept in a small in-process moka cache and as JSON in Redis,
/// both expiring after the same TTL. Redis survives restarts and is shared
/// between instances.
pub struct CacheManager {
    redis: ConnectionManager,
    listings: moka::future::Cache<String, Arc<TenderCollection>>,
    ttl: Duration,
}

impl CacheManager {
    pub async fn connect(redis_url: &str, l1_capacity: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        let ttl = Duration::from_secs(ttl_secs);

        let listings = moka::future::Cache::builder()
            .max_capacity(l1_capacity)
            .time_to_live(ttl)
            .build();

        Ok(Self { redis, listings, ttl })
    }

    /// Cached listing for `status`, if any
    pub async fn get_listing(&self, status: &str) -> Result<Option<TenderCollection>, CacheError> {
        let key = listing_key(status);

        if let Some(listing) = self.listings.get(&key).await {
            tracing::trace!("Listing served from memory: {}", key);
            return Ok(Some(listing.as_ref().clone()));
        }

        let mut conn = self.redis.clone();
        let cached: Option<String> = conn.get(&key).await?;

        let Some(json) = cached else {
            return Ok(None);
        };

        let listing: TenderCollection = serde_json::from_str(&json)?;
        self.listings.insert(key.clone(), Arc::new(listing.clone())).await;

        tracing::trace!("Listing served from Redis: {}", key);
        Ok(Some(listing))
    }

    pub async fn set_listing(&self, status: &str, listing: &TenderCollection) -> Result<(), CacheError> {
        let key = listing_key(status);
        let json = serde_json::to_string(listing)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, json, self.ttl.as_secs()).await?;
        self.listings.insert(key, Arc::new(listing.clone())).await;

        Ok(())
    }

    pub async fn invalidate_listing(&self, status: &str) -> Result<(), CacheError> {
        let key = listing_key(status);

        self.listings.invalidate(&key).await;
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(&key).await?;

        Ok(())
    }
}

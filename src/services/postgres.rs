use crate::models::{ExternalMatchRecord, MatchType, Tender};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

/// Filters for listing stored matches
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub min_score: Option<f64>,
    pub product: Option<String>,
    pub limit: Option<i64>,
}

/// PostgreSQL document store for tenders and match results
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Upsert tenders by id
    pub async fn save_tenders(&self, tenders: &[Tender]) -> Result<u64, PostgresError> {
        if tenders.is_empty() {
            return Ok(0);
        }

        let query = r#"
            INSERT INTO tenders (id, display_name, description, search_tags, market_url, status, service_type, sla, fetched_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (id)
            DO UPDATE SET
                display_name = EXCLUDED.display_name,
                description = EXCLUDED.description,
                search_tags = EXCLUDED.search_tags,
                market_url = EXCLUDED.market_url,
                status = EXCLUDED.status,
                service_type = EXCLUDED.service_type,
                sla = EXCLUDED.sla,
                fetched_at = EXCLUDED.fetched_at
        "#;

        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for tender in tenders {
            let result = sqlx::query(query)
                .bind(&tender.id)
                .bind(&tender.display_name)
                .bind(&tender.description)
                .bind(Json(&tender.search_tags))
                .bind(&tender.market_url)
                .bind(&tender.status)
                .bind(&tender.service_type)
                .bind(&tender.sla)
                .execute(&mut *tx)
                .await?;
            affected += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("Saved {} tenders", affected);
        Ok(affected)
    }

    pub async fn find_all_tenders(&self) -> Result<Vec<Tender>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, display_name, description, search_tags, market_url, status, service_type, sla
            FROM tenders
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tenders: Vec<Tender> = rows.iter().map(tender_from_row).collect();
        tracing::debug!("Retrieved {} tenders from database", tenders.len());
        Ok(tenders)
    }

    pub async fn count_tenders(&self) -> Result<i64, PostgresError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM tenders")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    /// Upsert match records on (tender, product, match type)
    pub async fn save_matches(&self, records: &[ExternalMatchRecord]) -> Result<u64, PostgresError> {
        if records.is_empty() {
            return Ok(0);
        }

        let query = r#"
            INSERT INTO matches (id, tender_id, tender_name, matched_product, score, reasons, market_url, match_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (tender_id, matched_product, match_type)
            DO UPDATE SET
                tender_name = EXCLUDED.tender_name,
                score = EXCLUDED.score,
                reasons = EXCLUDED.reasons,
                market_url = EXCLUDED.market_url,
                created_at = EXCLUDED.created_at
        "#;

        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for record in records {
            let result = sqlx::query(query)
                .bind(uuid::Uuid::new_v4())
                .bind(&record.tender_id)
                .bind(&record.tender_name)
                .bind(&record.matched_product)
                .bind(record.score)
                .bind(Json(&record.reasons))
                .bind(&record.market_url)
                .bind(record.match_type.as_str())
                .execute(&mut *tx)
                .await?;
            affected += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("Saved {} matches", affected);
        Ok(affected)
    }

    /// List stored matches, best score first
    pub async fn find_matches(&self, filter: &MatchFilter) -> Result<Vec<ExternalMatchRecord>, PostgresError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT tender_id, tender_name, matched_product, score, reasons, market_url, match_type FROM matches WHERE TRUE",
        );

        if let Some(min_score) = filter.min_score {
            builder.push(" AND score >= ").push_bind(min_score);
        }
        if let Some(product) = &filter.product {
            builder.push(" AND matched_product = ").push_bind(product.clone());
        }

        builder.push(" ORDER BY score DESC, created_at DESC");

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(match_from_row).collect()
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn tender_from_row(row: &PgRow) -> Tender {
    let Json(search_tags): Json<Vec<String>> = row.get("search_tags");

    Tender {
        id: row.get("id"),
        display_name: row.get("display_name"),
        description: row.get("description"),
        search_tags,
        market_url: row.get("market_url"),
        status: row.get("status"),
        service_type: row.get("service_type"),
        sla: row.get("sla"),
    }
}

fn match_from_row(row: &PgRow) -> Result<ExternalMatchRecord, PostgresError> {
    let match_type: String = row.get("match_type");
    let match_type = MatchType::parse(&match_type)
        .ok_or_else(|| PostgresError::InvalidData(format!("unknown match_type '{}'", match_type)))?;
    let Json(reasons): Json<Vec<String>> = row.get("reasons");

    Ok(ExternalMatchRecord {
        tender_id: row.get("tender_id"),
        tender_name: row.get("tender_name"),
        matched_product: row.get("matched_product"),
        score: row.get("score"),
        reasons,
        market_url: row.get("market_url"),
        match_type,
    })
}

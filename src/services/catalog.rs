use crate::core::MatchError;
use crate::models::{ExternalMatchRecord, ProductCatalog, ProductOffering, Tender, TenderCollection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when reading or writing local data files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] MatchError),
}

/// Load and validate the product catalog
pub async fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ProductCatalog, CatalogError> {
    let path = path.as_ref();
    tracing::info!("Loading products from file: {}", path.display());

    let catalog: ProductCatalog = read_json(path).await?;
    validate_offerings(&catalog.offerings)?;

    tracing::info!(
        "Loaded {} products for {}",
        catalog.offerings.len(),
        catalog.company_name
    );
    Ok(catalog)
}

/// Load and validate a tender listing saved to disk
pub async fn load_tenders_file<P: AsRef<Path>>(path: P) -> Result<TenderCollection, CatalogError> {
    let path = path.as_ref();
    tracing::info!("Loading tenders from file: {}", path.display());

    let collection: TenderCollection = read_json(path).await?;
    validate_tenders(&collection.services)?;

    tracing::info!("Loaded {} tenders from file", collection.services.len());
    Ok(collection)
}

/// Write match records to `<dir>/matches_<timestamp>.json`
pub async fn export_matches<P: AsRef<Path>>(
    dir: P,
    records: &[ExternalMatchRecord],
) -> Result<PathBuf, CatalogError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let file_name = format!("matches_{}.json", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);

    let json = serde_json::to_vec_pretty(records).map_err(|source| CatalogError::InvalidJson {
        path: path.display().to_string(),
        source,
    })?;
    tokio::fs::write(&path, json).await?;

    tracing::info!("Exported {} matches to {}", records.len(), path.display());
    Ok(path)
}

/// Reject offerings without a name and duplicate names
pub fn validate_offerings(offerings: &[ProductOffering]) -> Result<(), MatchError> {
    let mut names = HashSet::new();

    for (idx, offering) in offerings.iter().enumerate() {
        offering
            .validate()
            .map_err(|e| MatchError::Validation(format!("offering #{}: {}", idx, e)))?;

        if !names.insert(offering.name.as_str()) {
            return Err(MatchError::Validation(format!(
                "duplicate offering name '{}'",
                offering.name
            )));
        }
    }

    Ok(())
}

/// Reject tenders without an id
pub fn validate_tenders(tenders: &[Tender]) -> Result<(), MatchError> {
    for (idx, tender) in tenders.iter().enumerate() {
        tender
            .validate()
            .map_err(|e| MatchError::Validation(format!("tender #{}: {}", idx, e)))?;
    }

    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CatalogError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_slice(&bytes).map_err(|source| CatalogError::InvalidJson {
        path: path.display().to_string(),
        source,
    })
}

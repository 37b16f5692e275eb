use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub gem: GemSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// GeM marketplace listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GemSettings {
    #[serde(default = "default_gem_base_url")]
    pub base_url: String,
    #[serde(default = "default_gem_status")]
    pub status: String,
    #[serde(default = "default_gem_language")]
    pub language: String,
    #[serde(default = "default_gem_timeout")]
    pub timeout_secs: u64,
}

impl Default for GemSettings {
    fn default() -> Self {
        Self {
            base_url: default_gem_base_url(),
            status: default_gem_status(),
            language: default_gem_language(),
            timeout_secs: default_gem_timeout(),
        }
    }
}

fn default_gem_base_url() -> String {
    "https://mkp.gem.gov.in/cms/others/api/services/list.json".to_string()
}
fn default_gem_status() -> String { "active".to_string() }
fn default_gem_language() -> String { "en".to_string() }
fn default_gem_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

/// Where tenders are loaded from for a matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderSource {
    File,
    Database,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    pub max_matches_per_tender: Option<usize>,
    #[serde(default = "default_tender_source")]
    pub tender_source: TenderSource,
    #[serde(default = "default_products_file")]
    pub products_file: String,
    #[serde(default = "default_tenders_file")]
    pub tenders_file: String,
    pub export_dir: Option<String>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_matches_per_tender: None,
            tender_source: default_tender_source(),
            products_file: default_products_file(),
            tenders_file: default_tenders_file(),
            export_dir: None,
        }
    }
}

fn default_min_score() -> f64 { 1.0 }
fn default_tender_source() -> TenderSource { TenderSource::File }
fn default_products_file() -> String { "data/products/our_products.json".to_string() }
fn default_tenders_file() -> String { "data/tenders/available_tenders.json".to_string() }

/// Ollama settings for AI-assisted matching
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_llm_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_llm_min_score")]
    pub min_score: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
            batch_size: default_llm_batch_size(),
            min_score: default_llm_min_score(),
        }
    }
}

fn default_llm_endpoint() -> String { "http://localhost:11434".to_string() }
fn default_llm_model() -> String { "deepseek-r1:8b".to_string() }
fn default_llm_timeout() -> u64 { 120 }
fn default_llm_batch_size() -> usize { 10 }
fn default_llm_min_score() -> f64 { 50.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with TENDER__)
    /// 4. Well-known variables such as DATABASE_URL and OLLAMA_MODEL
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., TENDER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TENDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TENDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the matching pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.matching.min_score.is_finite() {
            return Err(ConfigError::Message(format!(
                "matching.min_score must be a finite number, got {}",
                self.matching.min_score
            )));
        }
        if !self.llm.min_score.is_finite() {
            return Err(ConfigError::Message(format!(
                "llm.min_score must be a finite number, got {}",
                self.llm.min_score
            )));
        }
        if self.llm.batch_size == 0 {
            return Err(ConfigError::Message("llm.batch_size must be at least 1".into()));
        }
        if self.matching.max_matches_per_tender == Some(0) {
            return Err(ConfigError::Message(
                "matching.max_matches_per_tender must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Apply well-known environment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("REDIS_URL", "cache.redis_url"),
        ("GEM_API_URL", "gem.base_url"),
        ("OLLAMA_HOST", "llm.endpoint"),
        ("OLLAMA_MODEL", "llm.model"),
        ("MIN_MATCH_SCORE", "matching.min_score"),
        ("TENDER_DATA_SOURCE", "matching.tender_source"),
        ("PRODUCTS_FILE", "matching.products_file"),
        ("TENDERS_FILE", "matching.tenders_file"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

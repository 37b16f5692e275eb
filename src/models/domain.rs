use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Company product or service offering
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductOffering {
    #[validate(custom(function = "non_blank"))]
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Government procurement listing, shaped after the GeM services feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tender {
    #[validate(custom(function = "non_blank"))]
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub search_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_url: String,
    #[serde(default = "default_status", deserialize_with = "null_as_active")]
    pub status: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub sla: Option<String>,
}

pub const ACTIVE_STATUS: &str = "active";

impl Tender {
    /// Only active listings take part in matching
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

fn default_status() -> String {
    ACTIVE_STATUS.to_string()
}

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifiers must carry something besides whitespace
fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn null_as_active<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

/// Which matcher produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "rule-based")]
    RuleBased,
    #[serde(rename = "ai")]
    Ai,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::RuleBased => "rule-based",
            MatchType::Ai => "ai",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rule-based" => Some(MatchType::RuleBased),
            "ai" => Some(MatchType::Ai),
            _ => None,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored (offering, tender) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub tender_id: String,
    pub tender_name: String,
    pub matched_product: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub market_url: String,
    pub match_type: MatchType,
}

/// Match record as stored and returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalMatchRecord {
    pub tender_id: String,
    pub tender_name: String,
    pub matched_product: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub market_url: String,
    pub match_type: MatchType,
}

/// Product catalog file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub offerings: Vec<ProductOffering>,
}

/// Tender listing as returned by the marketplace API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderCollection {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub services: Vec<Tender>,
}

fn default_source() -> String {
    "GeM".to_string()
}

/// One entry of the JSON array the language model is asked to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMatchResult {
    pub tender_id: String,
    #[serde(default)]
    pub tender_title: String,
    pub matched_product: String,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub matching_score: f64,
    #[serde(default)]
    pub customization_possibility: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Models sometimes quote numbers, e.g. `"matching_score": "85"`
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(score) => Ok(score),
        Score::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("matching_score is not a number: '{}'", text))),
    }
}

impl LlmMatchResult {
    pub fn into_candidate(self, market_url: String) -> MatchCandidate {
        let reasons = if self.reasoning.is_empty() {
            vec![]
        } else {
            vec![self.reasoning]
        };

        MatchCandidate {
            tender_id: self.tender_id,
            tender_name: self.tender_title,
            matched_product: self.matched_product,
            score: self.matching_score,
            reasons,
            market_url,
            match_type: MatchType::Ai,
        }
    }
}

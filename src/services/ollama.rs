use crate::models::{LlmMatchResult, MatchCandidate, ProductOffering, Tender};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the Ollama API
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// LLM-backed matcher
///
/// Sends tenders in batches together with the full catalog and asks the
/// model for a JSON list of matches. Scores are on the model's 0-100 scale.
pub struct OllamaClient {
    endpoint: String,
    model: String,
    batch_size: usize,
    client: Client,
}

impl OllamaClient {
    pub fn new(
        endpoint: &str,
        model: &str,
        timeout_secs: u64,
        batch_size: usize,
    ) -> Result<Self, OllamaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            batch_size: batch_size.max(1),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Match active tenders against the catalog
    ///
    /// A batch that fails (transport error, unparsable answer) is logged and
    /// contributes no matches.
    pub async fn analyze(
        &self,
        tenders: &[Tender],
        offerings: &[ProductOffering],
        min_score: f64,
    ) -> Vec<MatchCandidate> {
        let active: Vec<&Tender> = tenders.iter().filter(|t| t.is_active()).collect();

        tracing::info!(
            "Starting LLM analysis with {}: {} tenders, {} products",
            self.model,
            active.len(),
            offerings.len()
        );

        let mut candidates = Vec::new();

        for (idx, batch) in active.chunks(self.batch_size).enumerate() {
            tracing::debug!("Processing batch {}: {} tenders", idx + 1, batch.len());

            let prompt = build_prompt(batch, offerings, min_score);
            match self.chat(&prompt).await {
                Ok(content) => {
                    let urls: HashMap<&str, &str> = batch
                        .iter()
                        .map(|t| (t.id.as_str(), t.market_url.as_str()))
                        .collect();

                    candidates.extend(parse_llm_response(&content).into_iter().map(|result| {
                        let market_url = urls
                            .get(result.tender_id.as_str())
                            .map(|url| url.to_string())
                            .unwrap_or_default();
                        result.into_candidate(market_url)
                    }));
                }
                Err(e) => {
                    tracing::error!("LLM batch {} failed: {}", idx + 1, e);
                }
            }
        }

        let matches = postprocess(candidates, min_score);
        tracing::info!("LLM analysis complete: found {} matches", matches.len());
        matches
    }

    /// Single non-streaming chat completion, returns the assistant content
    async fn chat(&self, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.endpoint);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(OllamaError::ApiError(format!(
                "Chat request failed: {}",
                response.status()
            )));
        }

        let body: ChatResponse = response.json().await?;
        tracing::debug!("LLM response received: {} characters", body.message.content.len());

        Ok(body.message.content)
    }
}

fn build_prompt(tenders: &[&Tender], offerings: &[ProductOffering], min_score: f64) -> String {
    let tenders_data: Vec<Value> = tenders
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "title": t.display_name,
                "description": t.description,
                "sla": t.sla,
                "tags": t.search_tags,
            })
        })
        .collect();

    let products_data: Vec<Value> = offerings
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "keywords": p.keywords,
                "category": p.category,
                "description": p.description,
            })
        })
        .collect();

    let tenders_json = serde_json::to_string_pretty(&tenders_data).unwrap_or_default();
    let products_json = serde_json::to_string_pretty(&products_data).unwrap_or_default();

    format!(
        r#"You are a Sales Engineer analyzing government tenders to find viable sales opportunities.

AVAILABLE TENDERS:
{tenders_json}

COMPANY PRODUCTS:
{products_json}

Task:
1. For each tender, identify if any of our products can fulfill the requirement
2. Only return substantial matches (Matching Score > {min_score})
3. Analyze if the product needs customization
4. Provide clear reasoning for each match

Return ONLY a JSON list of objects in this exact format:
[
    {{
        "tender_id": "<id from tender list>",
        "tender_title": "<title from tender list>",
        "matched_product": "<product name>",
        "matching_score": <int 0-100>,
        "customization_possibility": "<string explanation>",
        "reasoning": "<short reasoning>"
    }}
]

If no matches are found, return an empty list [].
Do not include any other text, only the JSON array.
"#
    )
}

/// Extract match results from a model answer
///
/// Accepts fenced code blocks, a leading `<think>` section and a single
/// object in place of a list. Entries that do not fit the schema are skipped.
pub fn parse_llm_response(content: &str) -> Vec<LlmMatchResult> {
    let mut content = content;

    if let Some(end) = content.find("</think>") {
        content = &content[end + "</think>".len()..];
    }

    if let Some(start) = content.find("```json") {
        content = &content[start + "```json".len()..];
        content = content.split("```").next().unwrap_or_default();
    } else if let Some(start) = content.find("```") {
        content = &content[start + "```".len()..];
        content = content.split("```").next().unwrap_or_default();
    }

    let value: Value = match serde_json::from_str(content.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse LLM JSON response: {}", e);
            return vec![];
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => {
            tracing::warn!("LLM response is not a list, wrapping in list");
            vec![value]
        }
        _ => return vec![],
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<LlmMatchResult>(item) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Skipping malformed LLM match entry: {}", e);
                None
            }
        })
        .collect()
}

/// Drop weak and duplicate matches, best score first
///
/// Sorting happens before de-duplication so the best scored entry of a
/// (tender, product) pair is the one kept.
fn postprocess(candidates: Vec<MatchCandidate>, min_score: f64) -> Vec<MatchCandidate> {
    let total = candidates.len();

    let mut matches: Vec<MatchCandidate> = candidates
        .into_iter()
        .filter(|c| c.score >= min_score)
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = HashSet::new();
    matches.retain(|c| seen.insert((c.tender_id.clone(), c.matched_product.clone())));

    tracing::debug!(
        "Postprocessing: {} -> {} matches (min_score={})",
        total,
        matches.len(),
        min_score
    );
    matches
}

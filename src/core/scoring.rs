use crate::models::{ProductOffering, Tender};
use crate::core::normalizer::{normalize_all, normalize_set};

/// Contribution of a keyword that equals one of the tender tags
pub const TAG_MATCH_SCORE: f64 = 2.0;
/// Contribution of a keyword found inside the tender title or description
pub const BODY_MATCH_SCORE: f64 = 1.0;

/// Score an offering against a tender by keyword overlap
///
/// Scoring rules, evaluated per keyword in catalog order:
/// - exact (case-insensitive) tag equality: +2.0
/// - otherwise substring of `display_name + " " + description`: +1.0
/// - otherwise nothing
///
/// Each contribution appends exactly one reason. A keyword contributes at
/// most once and a tag hit is never also counted as a body hit.
pub fn calculate_match_score(
    offering: &ProductOffering,
    tender: &Tender,
) -> (f64, Vec<String>) {
    let keywords = normalize_all(&offering.keywords);
    let tags = normalize_set(&tender.search_tags);
    let body = format!("{} {}", tender.display_name, tender.description).to_lowercase();

    let mut score = 0.0;
    let mut reasons = Vec::new();

    for keyword in keywords {
        // An empty keyword is a substring of every body
        if keyword.is_empty() {
            continue;
        }

        if tags.contains(&keyword) {
            score += TAG_MATCH_SCORE;
            reasons.push(format!("Keyword '{}' found in tender tags", keyword));
        } else if body.contains(&keyword) {
            score += BODY_MATCH_SCORE;
            reasons.push(format!("Keyword '{}' found in tender description", keyword));
        }
    }

    (score, reasons)
}

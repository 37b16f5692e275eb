use crate::models::{MatchCandidate, MatchType, ProductOffering, Tender};
use crate::core::{error::MatchError, scoring::calculate_match_score};

/// Rule-based matching orchestrator
///
/// Scores the full offerings x tenders cross product and keeps every pair
/// whose score reaches the threshold.
///
/// # Pipeline Stages
/// 1. Threshold check
/// 2. Active tender filter
/// 3. Keyword scoring (offering-major, tender-minor)
/// 4. Minimum score filter
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Find rule-based matches between offerings and tenders
    ///
    /// # Arguments
    /// * `offerings` - Product catalog, already validated
    /// * `tenders` - Tender listing, already validated
    /// * `min_score` - Inclusive score threshold, must be finite
    ///
    /// # Returns
    /// Candidates in iteration order; callers rank them if needed
    pub fn find_matches(
        &self,
        offerings: &[ProductOffering],
        tenders: &[Tender],
        min_score: f64,
    ) -> Result<Vec<MatchCandidate>, MatchError> {
        if !min_score.is_finite() {
            return Err(MatchError::Configuration(format!(
                "min_score must be a finite number, got {}",
                min_score
            )));
        }

        let active: Vec<&Tender> = tenders.iter().filter(|t| t.is_active()).collect();

        tracing::debug!(
            "Rule-based matching: {} offerings x {} active tenders ({} skipped), min_score={}",
            offerings.len(),
            active.len(),
            tenders.len() - active.len(),
            min_score
        );

        let matches: Vec<MatchCandidate> = offerings
            .iter()
            .flat_map(|offering| {
                active.iter().filter_map(move |tender| {
                    let (score, reasons) = calculate_match_score(offering, tender);

                    if score < min_score {
                        return None;
                    }

                    Some(MatchCandidate {
                        tender_id: tender.id.clone(),
                        tender_name: tender.display_name.clone(),
                        matched_product: offering.name.clone(),
                        score,
                        reasons,
                        market_url: tender.market_url.clone(),
                        match_type: MatchType::RuleBased,
                    })
                })
            })
            .collect();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_offering(name: &str, keywords: &[&str]) -> ProductOffering {
        ProductOffering {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category: "it".to_string(),
            description: None,
        }
    }

    fn create_tender(id: &str, description: &str, tags: &[&str], status: &str) -> Tender {
        Tender {
            id: id.to_string(),
            display_name: format!("Tender {}", id),
            description: description.to_string(),
            search_tags: tags.iter().map(|t| t.to_string()).collect(),
            market_url: format!("https://mkp.gem.gov.in/{}", id),
            status: status.to_string(),
            service_type: None,
            sla: None,
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::new();
        let offerings = vec![create_offering("Cloud", &["cloud"])];
        let tenders = vec![
            create_tender("1", "cloud hosting", &[], "active"),
            create_tender("2", "office furniture", &[], "active"),
        ];

        let matches = matcher.find_matches(&offerings, &tenders, 1.0).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tender_id, "1");
        assert_eq!(matches[0].tender_name, "Tender 1");
        assert_eq!(matches[0].market_url, "https://mkp.gem.gov.in/1");
        assert_eq!(matches[0].match_type, MatchType::RuleBased);
    }

    #[test]
    fn test_inactive_tenders_skipped() {
        let matcher = Matcher::new();
        let offerings = vec![create_offering("Cloud", &["cloud"])];
        let tenders = vec![
            create_tender("1", "cloud", &["cloud"], "inactive"),
            create_tender("2", "cloud", &["cloud"], "ACTIVE"),
        ];

        let matches = matcher.find_matches(&offerings, &tenders, 0.0).unwrap();

        assert!(matches.is_empty());
    }

    #[test]
    fn test_offering_major_order_without_sorting() {
        let matcher = Matcher::new();
        let offerings = vec![
            create_offering("A", &["cloud"]),
            create_offering("B", &["cloud", "migration"]),
        ];
        let tenders = vec![
            create_tender("1", "cloud migration", &[], "active"),
            create_tender("2", "cloud", &["cloud"], "active"),
        ];

        let matches = matcher.find_matches(&offerings, &tenders, 1.0).unwrap();
        let order: Vec<(&str, &str)> = matches
            .iter()
            .map(|m| (m.matched_product.as_str(), m.tender_id.as_str()))
            .collect();

        assert_eq!(order, vec![("A", "1"), ("A", "2"), ("B", "1"), ("B", "2")]);
        // A/1 scores lowest but keeps its place
        assert_eq!(matches[0].score, 1.0);
        assert_eq!(matches[2].score, 2.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let matcher = Matcher::new();
        let offerings = vec![create_offering("Cloud", &["cloud"])];
        let tenders = vec![create_tender("1", "cloud", &[], "active")];

        assert_eq!(matcher.find_matches(&offerings, &tenders, 1.0).unwrap().len(), 1);
        assert!(matcher.find_matches(&offerings, &tenders, 1.5).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let matcher = Matcher::new();

        let err = matcher.find_matches(&[], &[], f64::NAN).unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));

        let err = matcher.find_matches(&[], &[], f64::INFINITY).unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }

    #[test]
    fn test_malformed_offering_does_not_abort() {
        let matcher = Matcher::new();
        let offerings = vec![
            create_offering("Empty", &[]),
            create_offering("Cloud", &["cloud"]),
        ];
        let tenders = vec![
            create_tender("1", "", &[], "active"),
            create_tender("2", "cloud", &[], "active"),
        ];

        let matches = matcher.find_matches(&offerings, &tenders, 1.0).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_product, "Cloud");
        assert_eq!(matches[0].tender_id, "2");
    }
}

use std::collections::BTreeMap;
use crate::models::{ExternalMatchRecord, MatchStatistics};

const SCORE_BUCKETS: [&str; 4] = ["0-25", "26-50", "51-75", "76-100"];

/// Summarize stored matches by product and by score bucket
pub fn summarize(records: &[ExternalMatchRecord]) -> MatchStatistics {
    let mut by_product: BTreeMap<String, usize> = BTreeMap::new();
    let mut score_distribution: BTreeMap<String, usize> = SCORE_BUCKETS
        .iter()
        .map(|bucket| (bucket.to_string(), 0))
        .collect();

    for record in records {
        *by_product.entry(record.matched_product.clone()).or_insert(0) += 1;
        *score_distribution
            .entry(score_bucket(record.score).to_string())
            .or_insert(0) += 1;
    }

    MatchStatistics {
        total_matches: records.len(),
        by_product,
        score_distribution,
    }
}

#[inline]
fn score_bucket(score: f64) -> &'static str {
    if score <= 25.0 {
        SCORE_BUCKETS[0]
    } else if score <= 50.0 {
        SCORE_BUCKETS[1]
    } else if score <= 75.0 {
        SCORE_BUCKETS[2]
    } else {
        SCORE_BUCKETS[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchType;

    fn record(product: &str, score: f64) -> ExternalMatchRecord {
        ExternalMatchRecord {
            tender_id: "t".to_string(),
            tender_name: "Tender".to_string(),
            matched_product: product.to_string(),
            score,
            reasons: vec![],
            market_url: String::new(),
            match_type: MatchType::Ai,
        }
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&[]);

        assert_eq!(stats.total_matches, 0);
        assert!(stats.by_product.is_empty());
        assert_eq!(stats.score_distribution.len(), 4);
        assert!(stats.score_distribution.values().all(|&count| count == 0));
    }

    #[test]
    fn test_summarize_counts() {
        let stats = summarize(&[
            record("Cloud", 2.0),
            record("Cloud", 60.0),
            record("AI", 25.5),
            record("AI", 90.0),
        ]);

        assert_eq!(stats.total_matches, 4);
        assert_eq!(stats.by_product["Cloud"], 2);
        assert_eq!(stats.by_product["AI"], 2);
        assert_eq!(stats.score_distribution["0-25"], 1);
        assert_eq!(stats.score_distribution["26-50"], 1);
        assert_eq!(stats.score_distribution["51-75"], 1);
        assert_eq!(stats.score_distribution["76-100"], 1);
    }
}

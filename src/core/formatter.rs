use std::collections::HashMap;
use crate::models::{ExternalMatchRecord, MatchCandidate};

/// Map candidates to the externally consumed record shape
///
/// Pure one-to-one mapping: no filtering, re-scoring or de-duplication.
pub fn format_matches(candidates: Vec<MatchCandidate>) -> Vec<ExternalMatchRecord> {
    candidates
        .into_iter()
        .map(|candidate| ExternalMatchRecord {
            tender_id: candidate.tender_id,
            tender_name: candidate.tender_name,
            matched_product: candidate.matched_product,
            score: candidate.score,
            reasons: candidate.reasons,
            market_url: candidate.market_url,
            match_type: candidate.match_type,
        })
        .collect()
}

/// Sort records by score (descending), keeping input order among ties
pub fn rank_by_score(records: &mut [ExternalMatchRecord]) {
    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Keep at most `limit` records per tender, in their current order
pub fn cap_per_tender(records: Vec<ExternalMatchRecord>, limit: usize) -> Vec<ExternalMatchRecord> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    records
        .into_iter()
        .filter(|record| {
            let count = seen.entry(record.tender_id.clone()).or_insert(0);
            *count += 1;
            *count <= limit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchType;

    fn candidate(tender_id: &str, product: &str, score: f64) -> MatchCandidate {
        MatchCandidate {
            tender_id: tender_id.to_string(),
            tender_name: format!("Tender {}", tender_id),
            matched_product: product.to_string(),
            score,
            reasons: vec![format!("Keyword '{}' found in tender tags", product)],
            market_url: "not a url ?? ".to_string(),
            match_type: MatchType::RuleBased,
        }
    }

    #[test]
    fn test_format_is_one_to_one() {
        let candidates = vec![
            candidate("1", "a", 1.0),
            candidate("1", "a", 1.0),
            candidate("2", "b", 0.0),
        ];

        let records = format_matches(candidates.clone());

        assert_eq!(records.len(), 3);
        for (record, candidate) in records.iter().zip(candidates.iter()) {
            assert_eq!(record.tender_id, candidate.tender_id);
            assert_eq!(record.score, candidate.score);
            assert_eq!(record.reasons, candidate.reasons);
            assert_eq!(record.market_url, "not a url ?? ");
            assert_eq!(record.match_type, MatchType::RuleBased);
        }
    }

    #[test]
    fn test_rank_by_score_is_stable() {
        let mut records = format_matches(vec![
            candidate("1", "a", 1.0),
            candidate("2", "b", 3.0),
            candidate("3", "c", 1.0),
            candidate("4", "d", 2.0),
        ]);

        rank_by_score(&mut records);

        let ids: Vec<&str> = records.iter().map(|r| r.tender_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_cap_per_tender() {
        let records = format_matches(vec![
            candidate("1", "a", 3.0),
            candidate("1", "b", 2.0),
            candidate("2", "a", 2.0),
            candidate("1", "c", 1.0),
        ]);

        let capped = cap_per_tender(records, 2);

        let pairs: Vec<(&str, &str)> = capped
            .iter()
            .map(|r| (r.tender_id.as_str(), r.matched_product.as_str()))
            .collect();
        assert_eq!(pairs, vec![("1", "a"), ("1", "b"), ("2", "a")]);
    }
}

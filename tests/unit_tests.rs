// Unit tests for Tender Match

use tender_match::core::{
    normalizer::{normalize, normalize_all},
    scoring::calculate_match_score,
    MatchError, Matcher,
};
use tender_match::models::{MatchType, ProductOffering, Tender};

fn create_offering(name: &str, keywords: &[&str]) -> ProductOffering {
    ProductOffering {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        category: "it".to_string(),
        description: None,
    }
}

fn create_tender(id: &str, display_name: &str, description: &str, tags: &[&str]) -> Tender {
    Tender {
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        search_tags: tags.iter().map(|t| t.to_string()).collect(),
        market_url: format!("https://mkp.gem.gov.in/services/{}", id),
        status: "active".to_string(),
        service_type: None,
        sla: None,
    }
}

#[test]
fn test_normalize_trims_and_lowercases() {
    assert_eq!(normalize("  Cloud Migration\t"), "cloud migration");
    assert_eq!(normalize(""), "");
    assert_eq!(
        normalize_all(&["3D Printing", " AI "]),
        vec!["3d printing".to_string(), "ai".to_string()]
    );
}

#[test]
fn test_empty_keywords_score_zero() {
    let offering = create_offering("Nothing", &[]);
    let tender = create_tender("t1", "Cloud", "cloud everything", &["Cloud"]);

    let (score, reasons) = calculate_match_score(&offering, &tender);

    assert_eq!(score, 0.0);
    assert!(reasons.is_empty());
}

#[test]
fn test_scenario_a_all_tag_hits() {
    let offering = create_offering(
        "3D Printing Service",
        &["3d printing", "additive manufacturing", "rapid prototyping"],
    );
    let tender = create_tender(
        "t1",
        "3D Printing Service",
        "Additive manufacturing services for prototyping",
        &["3d printing", "additive manufacturing", "rapid prototyping"],
    );

    let (score, reasons) = calculate_match_score(&offering, &tender);

    assert_eq!(score, 6.0);
    assert_eq!(reasons.len(), 3);
    assert!(reasons.iter().all(|r| r.ends_with("found in tender tags")));
}

#[test]
fn test_scenario_b_description_hit() {
    let offering = create_offering("Cloud Migration", &["cloud"]);
    let tender = create_tender("t1", "Infrastructure", "Cloud Migration Service", &[]);

    let (score, reasons) = calculate_match_score(&offering, &tender);

    assert_eq!(score, 1.0);
    assert_eq!(reasons, vec!["Keyword 'cloud' found in tender description"]);
}

#[test]
fn test_scenario_c_exact_tag_semantics() {
    let offering = create_offering(
        "AI Consulting",
        &["ai", "artificial intelligence", "machine learning"],
    );
    let tender = create_tender(
        "t1",
        "Analytics Platform",
        "Requires machine learning models for forecasting",
        &["Artificial Intelligence"],
    );

    let (score, reasons) = calculate_match_score(&offering, &tender);

    assert_eq!(score, 3.0);
    assert_eq!(
        reasons,
        vec![
            "Keyword 'artificial intelligence' found in tender tags",
            "Keyword 'machine learning' found in tender description",
        ]
    );
}

#[test]
fn test_scenario_d_high_threshold_yields_empty() {
    let matcher = Matcher::new();
    let offerings = vec![create_offering("Cloud Migration", &["cloud", "migration"])];
    let tenders = vec![create_tender("t1", "Cloud Migration", "cloud migration", &["Cloud"])];

    let matches = matcher.find_matches(&offerings, &tenders, 10.0).unwrap();

    assert!(matches.is_empty());
}

#[test]
fn test_score_equals_sum_of_reasons() {
    let offering = create_offering("Mixed", &["cloud", "migration", "hosting", "backup"]);
    let tender = create_tender("t1", "Data Migration", "Managed hosting", &["Cloud", "Backup"]);

    let (score, reasons) = calculate_match_score(&offering, &tender);

    let expected: f64 = reasons
        .iter()
        .map(|r| if r.ends_with("tags") { 2.0 } else { 1.0 })
        .sum();
    assert_eq!(reasons.len(), 4);
    assert_eq!(score, expected);
    assert_eq!(score, 6.0);
}

#[test]
fn test_matching_is_idempotent() {
    let matcher = Matcher::new();
    let offerings = vec![
        create_offering("Cloud Migration", &["cloud", "migration"]),
        create_offering("AI Consulting", &["machine learning"]),
    ];
    let tenders = vec![
        create_tender("t1", "Cloud Hosting", "Machine learning workloads", &["Cloud"]),
        create_tender("t2", "Migration", "", &["Migration"]),
    ];

    let first = matcher.find_matches(&offerings, &tenders, 1.0).unwrap();
    let second = matcher.find_matches(&offerings, &tenders, 1.0).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_no_candidate_below_threshold() {
    let matcher = Matcher::new();
    let offerings = vec![
        create_offering("A", &["cloud"]),
        create_offering("B", &["cloud", "migration", "storage"]),
    ];
    let tenders = vec![
        create_tender("t1", "Cloud", "", &[]),
        create_tender("t2", "Cloud Storage Migration", "", &["Cloud"]),
        create_tender("t3", "Furniture", "", &[]),
    ];

    for min_score in [0.0, 1.0, 2.0, 3.0, 4.0] {
        let matches = matcher.find_matches(&offerings, &tenders, min_score).unwrap();
        assert!(matches.iter().all(|m| m.score >= min_score));
    }
}

#[test]
fn test_inactive_tenders_never_returned() {
    let matcher = Matcher::new();
    let offerings = vec![create_offering("Cloud", &["cloud"])];
    let mut closed = create_tender("closed", "Cloud", "cloud", &["Cloud"]);
    closed.status = "inactive".to_string();
    let open = create_tender("open", "Cloud", "cloud", &["Cloud"]);

    let matches = matcher.find_matches(&offerings, &[closed, open], 0.0).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].tender_id, "open");
    assert_eq!(matches[0].match_type, MatchType::RuleBased);
}

#[test]
fn test_non_finite_threshold_is_configuration_error() {
    let matcher = Matcher::new();
    let err = matcher.find_matches(&[], &[], f64::NEG_INFINITY).unwrap_err();
    assert!(matches!(err, MatchError::Configuration(_)));
}

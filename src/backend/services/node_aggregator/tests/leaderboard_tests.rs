use std::collections::HashMap;

use node_aggregator::models::score::{AiScore, NodeScores, Region, ScoreSnapshot};
use node_aggregator::services::leaderboard_service::LeaderboardService;

fn region(id: &str, name: &str) -> Region {
    Region {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn scores(entries: &[(&str, f64)]) -> NodeScores {
    NodeScores {
        scores: entries.iter().map(|(r, s)| (r.to_string(), *s)).collect(),
        ..Default::default()
    }
}

fn service() -> LeaderboardService {
    LeaderboardService::new(vec![
        region("FRA", "Frankfurt"),
        region("LON", "London"),
        region("NYC", "New York City"),
        region("GLOBAL", "Global (World)"),
    ])
}

#[test]
fn global_pseudo_region_is_excluded_from_top_score() {
    let top = service().top_regional_score(&scores(&[("FRA", 0.9), ("GLOBAL", 0.99)]));
    assert_eq!(top.score, 0.9);
    assert_eq!(top.region, "Frankfurt");
}

#[test]
fn global_exclusion_matches_on_the_code_when_metadata_is_missing() {
    let service = LeaderboardService::new(vec![]);
    let top = service.top_regional_score(&scores(&[("FRA", 0.9), ("GLOBAL", 0.99)]));
    assert_eq!(top.score, 0.9);
    // no metadata: display name falls back to N/A, score still wins
    assert_eq!(top.region, "N/A");
}

#[test]
fn ties_keep_the_first_region_encountered() {
    // BTreeMap iteration is lexicographic by region code
    let top = service().top_regional_score(&scores(&[("LON", 0.9), ("FRA", 0.9)]));
    assert_eq!(top.region, "Frankfurt");
}

#[test]
fn empty_score_set_defaults_to_not_available() {
    let top = service().top_regional_score(&scores(&[]));
    assert_eq!(top.region, "N/A");
    assert_eq!(top.score, 0.0);
}

#[test]
fn ai_score_surface_requires_a_positive_value() {
    let mut node_scores = scores(&[("FRA", 0.5)]);
    node_scores.top_ai_score = Some(AiScore {
        value: 0.0,
        region: "NYC".to_string(),
        pipeline: "text-to-image".to_string(),
        model: "sd-turbo".to_string(),
    });
    assert_eq!(service().top_ai_score(&node_scores), None);

    node_scores.top_ai_score = Some(AiScore {
        value: 0.72,
        region: "NYC".to_string(),
        pipeline: "text-to-image".to_string(),
        model: "sd-turbo".to_string(),
    });
    let ai = service().top_ai_score(&node_scores).unwrap();
    assert_eq!(ai.region, "New York City");
    assert_eq!(ai.value, 0.72);
    assert_eq!(ai.pipeline, "text-to-image");
}

#[test]
fn regional_leaderboard_ranks_highest_first_with_stable_ties() {
    let mut nodes = HashMap::new();
    nodes.insert("0xaa".to_string(), scores(&[("FRA", 0.7)]));
    nodes.insert("0xbb".to_string(), scores(&[("FRA", 0.9), ("LON", 0.2)]));
    nodes.insert("0xcc".to_string(), scores(&[("FRA", 0.7)]));
    nodes.insert("0xdd".to_string(), scores(&[("LON", 0.95)]));
    let snapshot = ScoreSnapshot {
        nodes,
        ..Default::default()
    };

    let rows = service().regional_leaderboard(&snapshot, "FRA");
    let ranked: Vec<(&str, f64)> = rows.iter().map(|r| (r.address.as_str(), r.score)).collect();
    // 0xdd has no FRA score and does not appear
    assert_eq!(ranked, vec![("0xbb", 0.9), ("0xaa", 0.7), ("0xcc", 0.7)]);
}

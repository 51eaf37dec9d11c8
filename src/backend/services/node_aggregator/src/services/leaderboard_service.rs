use std::cmp::Ordering;

use serde::Serialize;

use crate::models::score::{NodeScores, Region, ScoreSnapshot};
use crate::utils::format::NOT_AVAILABLE;

/// Best regional score for one node, excluding aggregate pseudo-regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopScore {
    pub region: String,
    pub score: f64,
}

impl Default for TopScore {
    fn default() -> Self {
        Self {
            region: NOT_AVAILABLE.to_string(),
            score: 0.0,
        }
    }
}

/// Best AI-pipeline score for one node, with resolved region name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiScoreView {
    pub value: f64,
    pub region: String,
    pub pipeline: String,
    pub model: String,
}

/// One row of a regional leaderboard, highest score first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub address: String,
    pub score: f64,
}

/// Reporting-side score selection over a region-metadata listing.
pub struct LeaderboardService {
    regions: Vec<Region>,
}

impl LeaderboardService {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    fn region_name(&self, id: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }

    /// Top regional score for one node. Regions whose label starts with
    /// "global" (case-insensitive) are aggregate pseudo-regions and are
    /// skipped; the raw pipeline-level high score applies no such
    /// exclusion. Iteration order over the score set is deterministic, and
    /// only a strictly greater score replaces the running best, so ties
    /// keep the first region encountered.
    pub fn top_regional_score(&self, scores: &NodeScores) -> TopScore {
        let mut top = TopScore::default();
        for (id, &score) in &scores.scores {
            let name = self.region_name(id);
            // fall back to the region code when metadata is missing, so an
            // unlisted "GLOBAL" key is still excluded
            let label = name.unwrap_or(id);
            if label.to_lowercase().starts_with("global") {
                continue;
            }
            if score > top.score {
                top = TopScore {
                    region: name.unwrap_or(NOT_AVAILABLE).to_string(),
                    score,
                };
            }
        }
        top
    }

    /// AI-score surface, present only when the reported value is positive.
    pub fn top_ai_score(&self, scores: &NodeScores) -> Option<AiScoreView> {
        let ai = scores.top_ai_score.as_ref()?;
        if ai.value <= 0.0 {
            return None;
        }
        Some(AiScoreView {
            value: ai.value,
            region: self
                .region_name(&ai.region)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            pipeline: ai.pipeline.clone(),
            model: ai.model.clone(),
        })
    }

    /// All nodes with a score in the given region, ranked highest first;
    /// ties break on address so the ranking is stable across cycles.
    pub fn regional_leaderboard(&self, snapshot: &ScoreSnapshot, region: &str) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = snapshot
            .nodes
            .iter()
            .filter_map(|(address, scores)| {
                scores.scores.get(region).map(|&score| LeaderboardRow {
                    address: address.clone(),
                    score,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });
        rows
    }
}

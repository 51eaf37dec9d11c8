use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Region codes the score service is known to report for transcoding work.
pub const KNOWN_REGIONS: [&str; 7] = ["FRA", "MDW", "SIN", "NYC", "LAX", "LON", "PRG"];

/// Best AI-pipeline score for one node, with the pipeline and model that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiScore {
    pub value: f64,
    pub region: String,
    pub pipeline: String,
    pub model: String,
}

/// Region metadata from the score service, used to resolve display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// Per-region performance scores for one node. Scores are in [0, 1]; a
/// region absent from the map means "no data", never zero. The map is
/// ordered so iteration (and therefore tie-breaking downstream) is
/// deterministic regardless of the order the service returned the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeScores {
    pub scores: BTreeMap<String, f64>,
    pub top_ai_score: Option<AiScore>,
    pub price_per_pixel: Option<f64>,
}

impl NodeScores {
    /// Highest raw score over every present region, `None` when the node has
    /// no region entries at all.
    pub fn high_score(&self) -> Option<f64> {
        self.scores
            .values()
            .copied()
            .fold(None, |max, s| Some(max.map_or(s, |m: f64| m.max(s))))
    }

    /// Arithmetic mean over every present region, 0 when none are present.
    pub fn average_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.values().sum::<f64>() / self.scores.len() as f64
    }
}

/// One bulk snapshot of the score service, keyed by node identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSnapshot {
    pub nodes: HashMap<String, NodeScores>,
    pub fetched_at: DateTime<Utc>,
}

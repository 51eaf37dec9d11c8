use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::models::score::{AiScore, NodeScores, Region, ScoreSnapshot};
use crate::sources::traits::ScoreSource;
use crate::utils::errors::{Result, SourceError};

const SOURCE: &str = "score service";

/// Score-source adapter over the leaderboard HTTP API. The whole snapshot
/// arrives as one unauthenticated GET; there is no pagination.
pub struct ScoreApi {
    client: reqwest::Client,
    base_url: String,
}

impl ScoreApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "score service fetch");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(SOURCE, e))?;
        response
            .json()
            .await
            .map_err(|e| SourceError::malformed(SOURCE, e))
    }
}

#[async_trait]
impl ScoreSource for ScoreApi {
    async fn snapshot(&self) -> Result<ScoreSnapshot> {
        let raw: HashMap<String, RawNodeScores> = self.get("aggregated_stats").await?;
        let mut nodes = HashMap::with_capacity(raw.len());
        for (address, entry) in raw {
            nodes.insert(address, entry.into_scores()?);
        }
        Ok(ScoreSnapshot {
            nodes,
            fetched_at: Utc::now(),
        })
    }

    async fn regions(&self) -> Result<Vec<Region>> {
        let raw: RawRegions = self.get("regions").await?;
        Ok(raw.regions)
    }
}

#[derive(Debug, Deserialize)]
struct RawRegions {
    regions: Vec<Region>,
}

// Region entries share the object with the AI-score and price fields, so
// the named fields are pulled out first and the remaining keys are treated
// as regions.
#[derive(Debug, Deserialize)]
struct RawNodeScores {
    #[serde(rename = "topAIScore")]
    top_ai_score: Option<AiScore>,
    #[serde(rename = "pricePerPixel")]
    price_per_pixel: Option<f64>,
    #[serde(flatten)]
    regions: BTreeMap<String, RawRegionScore>,
}

#[derive(Debug, Deserialize)]
struct RawRegionScore {
    score: f64,
}

impl RawNodeScores {
    fn into_scores(self) -> Result<NodeScores> {
        let mut scores = BTreeMap::new();
        for (region, entry) in self.regions {
            if !(0.0..=1.0).contains(&entry.score) {
                return Err(SourceError::malformed(
                    SOURCE,
                    format!("score out of range for {region}: {}", entry.score),
                ));
            }
            scores.insert(region, entry.score);
        }
        Ok(NodeScores {
            scores,
            top_ai_score: self.top_ai_score,
            price_per_pixel: self.price_per_pixel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bulk_snapshot_entries() {
        let raw: RawNodeScores = serde_json::from_value(serde_json::json!({
            "FRA": { "score": 0.91 },
            "LON": { "score": 0.85 },
            "topAIScore": {
                "value": 0.72,
                "region": "NYC",
                "pipeline": "text-to-image",
                "model": "sd-turbo"
            },
            "pricePerPixel": 1200.0
        }))
        .unwrap();

        let scores = raw.into_scores().unwrap();
        assert_eq!(scores.scores.len(), 2);
        assert_eq!(scores.scores["FRA"], 0.91);
        assert_eq!(scores.price_per_pixel, Some(1200.0));
        let ai = scores.top_ai_score.unwrap();
        assert_eq!(ai.region, "NYC");
        assert_eq!(ai.value, 0.72);
    }

    #[test]
    fn out_of_range_score_is_malformed() {
        let raw: RawNodeScores = serde_json::from_value(serde_json::json!({
            "FRA": { "score": 1.7 }
        }))
        .unwrap();
        assert!(matches!(
            raw.into_scores(),
            Err(SourceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn entry_without_regions_yields_empty_map() {
        let raw: RawNodeScores = serde_json::from_value(serde_json::json!({
            "pricePerPixel": 900.0
        }))
        .unwrap();
        let scores = raw.into_scores().unwrap();
        assert!(scores.scores.is_empty());
        assert_eq!(scores.high_score(), None);
        assert_eq!(scores.average_score(), 0.0);
    }
}

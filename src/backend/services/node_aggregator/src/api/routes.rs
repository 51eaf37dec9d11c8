use actix_web::{web, HttpResponse, Scope};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::models::node::NodeRecord;
use crate::services::leaderboard_service::{AiScoreView, LeaderboardService, TopScore};
use crate::sources::http::ScoreApi;
use crate::sources::traits::ScoreSource;
use crate::utils::format::{
    abbreviate_address, abbreviate_number, format_percent, format_ratio, NOT_AVAILABLE,
};
use crate::HttpAggregationService;

pub struct AppState {
    pub aggregator: HttpAggregationService,
    pub scores: Arc<ScoreApi>,
}

pub fn node_routes() -> Scope {
    web::scope("")
        .route("/health", web::get().to(health))
        .route("/nodes", web::get().to(list_nodes))
        .route("/nodes/{address}", web::get().to(node_stats))
        .route("/leaderboard/{region}", web::get().to(regional_leaderboard))
}

#[derive(Debug, Serialize)]
struct CycleFailure {
    error: String,
    retryable: bool,
}

fn cycle_failure(err: impl ToString) -> HttpResponse {
    // a failed cycle is a retryable condition for the caller, never a crash
    HttpResponse::BadGateway().json(CycleFailure {
        error: err.to_string(),
        retryable: true,
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn list_nodes(state: web::Data<AppState>) -> HttpResponse {
    match state.aggregator.aggregate().await {
        Ok(output) => HttpResponse::Ok().json(output.records),
        Err(err) => {
            error!(%err, "refresh cycle failed");
            cycle_failure(err)
        }
    }
}

/// Formatted stat view for one node. Missing metrics render as "N/A",
/// never as zero.
#[derive(Debug, Serialize)]
struct NodeStatsView {
    address: String,
    display_name: String,
    total_stake: String,
    self_stake: String,
    delegated_stake: String,
    top_regional_score: String,
    top_ai_score: String,
    ai_model_note: String,
    earned_fees: String,
    price_per_pixel: String,
    reward_cut: String,
    fee_cut: String,
    reward_calls: String,
    total_delegators: usize,
}

#[derive(Debug, Serialize)]
struct NodeStatsResponse {
    record: NodeRecord,
    stats: NodeStatsView,
}

async fn node_stats(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let address = path.into_inner().to_lowercase();

    let output = match state.aggregator.aggregate().await {
        Ok(output) => output,
        Err(err) => {
            error!(%err, "refresh cycle failed");
            return cycle_failure(err);
        }
    };

    let record = match output
        .records
        .iter()
        .find(|r| r.address.to_lowercase() == address)
    {
        Some(record) => record.clone(),
        None => return HttpResponse::NotFound().finish(),
    };

    // region metadata only affects display names; degrade to codes on failure
    let regions = state.scores.regions().await.unwrap_or_default();
    let leaderboard = LeaderboardService::new(regions);
    let scores = output.snapshot.nodes.get(&record.address);

    let top = scores
        .map(|s| leaderboard.top_regional_score(s))
        .unwrap_or_default();
    let ai = scores.and_then(|s| leaderboard.top_ai_score(s));
    let stats = stats_view(&record, top, ai, scores.and_then(|s| s.price_per_pixel));

    HttpResponse::Ok().json(NodeStatsResponse { record, stats })
}

fn stats_view(
    record: &NodeRecord,
    top: TopScore,
    ai: Option<AiScoreView>,
    price_per_pixel: Option<f64>,
) -> NodeStatsView {
    let display_name = record
        .ens
        .name
        .clone()
        .or_else(|| record.username.clone())
        .unwrap_or_else(|| abbreviate_address(&record.address));

    let top_regional_score = if top.score > 0.0 {
        format!("{:.1}% - {}", top.score * 100.0, top.region)
    } else {
        NOT_AVAILABLE.to_string()
    };

    let (top_ai_score, ai_model_note) = match ai {
        Some(ai) => (
            format!("{:.1}% - {}", ai.value * 100.0, ai.region),
            format!("pipeline '{}', model '{}'", ai.pipeline, ai.model),
        ),
        None => (NOT_AVAILABLE.to_string(), String::new()),
    };

    NodeStatsView {
        address: record.address.clone(),
        display_name,
        total_stake: abbreviate_number(record.total_stake, 3),
        self_stake: abbreviate_number(record.self_stake, 3),
        delegated_stake: abbreviate_number(record.delegated_stake, 3),
        top_regional_score,
        top_ai_score,
        ai_model_note,
        earned_fees: format!("{} ETH", abbreviate_number(record.total_volume_eth, 3)),
        price_per_pixel: match price_per_pixel {
            Some(price) => format!("{} WEI", price.max(0.0).round()),
            None => NOT_AVAILABLE.to_string(),
        },
        reward_cut: format_percent(record.reward_cut_fraction),
        fee_cut: format_percent(record.fee_cut_fraction),
        reward_calls: format_ratio(record.reward_call_count, record.reward_call_denominator),
        total_delegators: record.total_delegators,
    }
}

async fn regional_leaderboard(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let region = path.into_inner();

    let snapshot = match state.scores.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(%err, "score snapshot fetch failed");
            return cycle_failure(err);
        }
    };

    let regions = state.scores.regions().await.unwrap_or_default();
    let leaderboard = LeaderboardService::new(regions);
    HttpResponse::Ok().json(leaderboard.regional_leaderboard(&snapshot, &region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::node::EnsIdentity;

    fn record() -> NodeRecord {
        NodeRecord {
            address: "0x525419ff5707190389bfb5c87c375d710f5fcb0e".to_string(),
            ens: EnsIdentity::default(),
            username: None,
            avatar: None,
            total_stake: 12_345.0,
            self_stake: 345.0,
            delegated_stake: 12_000.0,
            total_volume_eth: 1.5,
            current_high_score: None,
            average_score: 0.0,
            reward_call_count: 28,
            reward_call_denominator: 30,
            reward_cut_fraction: 0.5,
            fee_cut_fraction: 0.8,
            total_delegators: 12,
            pools: vec![],
        }
    }

    #[test]
    fn missing_score_data_renders_not_available() {
        let view = stats_view(&record(), TopScore::default(), None, None);
        assert_eq!(view.top_regional_score, NOT_AVAILABLE);
        assert_eq!(view.top_ai_score, NOT_AVAILABLE);
        assert_eq!(view.price_per_pixel, NOT_AVAILABLE);
        assert_eq!(view.reward_calls, "28/30");
        assert_eq!(view.reward_cut, "50%");
        assert_eq!(view.fee_cut, "80%");
    }

    #[test]
    fn unnamed_nodes_fall_back_to_short_address() {
        let view = stats_view(&record(), TopScore::default(), None, None);
        assert_eq!(view.display_name, "0x5254…cb0e");
    }
}

use std::sync::Arc;
use std::time::Duration;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;

use crate::config::AggregatorConfig;
use crate::services::aggregation_service::AggregationService;
use crate::sources::http::{IdentityApi, RpcStakingContract, ScoreApi, SubgraphChainData};

/// Aggregation service wired to the HTTP implementations of every source.
pub type HttpAggregationService =
    AggregationService<SubgraphChainData, ScoreApi, IdentityApi, RpcStakingContract>;

/// Builds the full adapter stack from a config constructed at process start.
/// All adapters share one HTTP client so the request timeout applies to
/// every external fetch.
pub fn build_services(
    config: &AggregatorConfig,
) -> anyhow::Result<(HttpAggregationService, Arc<ScoreApi>)> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let chain = Arc::new(SubgraphChainData::new(client.clone(), &config.subgraph_url));
    let scores = Arc::new(ScoreApi::new(client.clone(), &config.score_api_url));
    let identity = Arc::new(IdentityApi::new(
        client.clone(),
        &config.identity_api_url,
        &config.profile_api_url,
    ));
    let staking = Arc::new(RpcStakingContract::new(
        client,
        &config.rpc_url,
        &config.bonding_manager,
    ));

    let aggregator = AggregationService::new(
        chain,
        Arc::clone(&scores),
        identity,
        staking,
        &config.profile_namespace,
    );

    Ok((aggregator, scores))
}

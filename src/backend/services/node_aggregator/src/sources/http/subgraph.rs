use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::models::chain::{NodeInfo, RewardPool};
use crate::sources::traits::ChainDataSource;
use crate::utils::errors::{Result, SourceError};

const SOURCE: &str = "subgraph";

/// Chain-data adapter backed by a GraphQL subgraph. Responses are validated
/// into typed rows at this boundary; anything off-shape becomes
/// `MalformedResponse` instead of propagating silently.
pub struct SubgraphChainData {
    client: reqwest::Client,
    url: String,
}

impl SubgraphChainData {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn query(&self, query: String) -> Result<serde_json::Value> {
        debug!(url = %self.url, "subgraph query");
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| SourceError::unavailable(SOURCE, e))?;

        let payload: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| SourceError::malformed(SOURCE, e))?;

        if let Some(errors) = payload.errors {
            let detail = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SourceError::malformed(SOURCE, detail));
        }

        payload
            .data
            .ok_or_else(|| SourceError::malformed(SOURCE, "response carries no data field"))
    }
}

#[async_trait]
impl ChainDataSource for SubgraphChainData {
    async fn current_epoch(&self) -> Result<u64> {
        let data = self.query(CURRENT_EPOCH_QUERY.to_string()).await?;
        let parsed: ProtocolData =
            serde_json::from_value(data).map_err(|e| SourceError::malformed(SOURCE, e))?;
        parse_u64("protocol.currentRound.id", &parsed.protocol.current_round.id)
    }

    async fn active_nodes(&self, epoch: u64) -> Result<Vec<NodeInfo>> {
        let data = self.query(active_nodes_query(epoch)).await?;
        let parsed: TranscodersData =
            serde_json::from_value(data).map_err(|e| SourceError::malformed(SOURCE, e))?;
        parsed
            .transcoders
            .into_iter()
            .map(RawNode::into_node)
            .collect()
    }
}

const CURRENT_EPOCH_QUERY: &str = r#"{ protocol(id: "0") { currentRound { id } } }"#;

/// Active set for the given epoch, ordered by stake descending, with the
/// reward-pool window capped at 30 and the current epoch excluded.
fn active_nodes_query(epoch: u64) -> String {
    format!(
        r#"{{
  transcoders(
    orderBy: "totalStake"
    orderDirection: "desc"
    where: {{
      activationRound_lte: {epoch},
      deactivationRound_gt: {epoch},
    }}
  ) {{
    id
    activationRound
    deactivationRound
    totalStake
    totalVolumeETH
    rewardCut
    feeShare
    delegator {{
      startRound
    }}
    pools(first: 30, orderBy: id, orderDirection: desc, where: {{ round_not: "{epoch}" }}) {{
      rewardTokens
    }}
    delegators(first: 1000) {{
      id
    }}
  }}
}}"#
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProtocolData {
    protocol: RawProtocol,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProtocol {
    current_round: RawRound,
}

#[derive(Debug, Deserialize)]
struct RawRound {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TranscodersData {
    transcoders: Vec<RawNode>,
}

// The indexer reports every numeric field as a string; rows are parsed into
// `NodeInfo` here and malformed numbers are rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    activation_round: String,
    deactivation_round: String,
    total_stake: String,
    #[serde(rename = "totalVolumeETH")]
    total_volume_eth: String,
    reward_cut: String,
    fee_share: String,
    delegator: Option<RawDelegator>,
    #[serde(default)]
    pools: Vec<RewardPool>,
    #[serde(default)]
    delegators: Vec<RawId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDelegator {
    start_round: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawId {
    id: String,
}

impl RawNode {
    fn into_node(self) -> Result<NodeInfo> {
        let start_round = match self.delegator.and_then(|d| d.start_round) {
            Some(raw) => Some(parse_u64("delegator.startRound", &raw)?),
            None => None,
        };
        Ok(NodeInfo {
            activation_round: parse_u64("activationRound", &self.activation_round)?,
            deactivation_round: parse_round_ceiling("deactivationRound", &self.deactivation_round)?,
            total_stake: parse_f64("totalStake", &self.total_stake)?,
            total_volume_eth: parse_f64("totalVolumeETH", &self.total_volume_eth)?,
            reward_cut: parse_u64("rewardCut", &self.reward_cut)?,
            fee_share: parse_u64("feeShare", &self.fee_share)?,
            start_round,
            pools: self.pools,
            delegators: self.delegators.into_iter().map(|d| d.id).collect(),
            id: self.id,
        })
    }
}

fn parse_u64(field: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| SourceError::malformed(SOURCE, format!("{field}: not an integer: {raw:?}")))
}

// Never-deactivates sentinels come back as max-uint256; saturate those to
// u64::MAX instead of rejecting the row.
fn parse_round_ceiling(field: &str, raw: &str) -> Result<u64> {
    match raw.parse() {
        Ok(round) => Ok(round),
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Ok(u64::MAX),
        Err(_) => Err(SourceError::malformed(
            SOURCE,
            format!("{field}: not an integer: {raw:?}"),
        )),
    }
}

fn parse_f64(field: &str, raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|_| SourceError::malformed(SOURCE, format!("{field}: not a decimal: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> serde_json::Value {
        serde_json::json!({
            "id": "0x4f4758f7167b18e1f5b3c1a7575e3eb584894dbc",
            "activationRound": "2100",
            "deactivationRound": "115792089237316195423570985008687907853269",
            "totalStake": "150000.5",
            "totalVolumeETH": "12.25",
            "rewardCut": "500000",
            "feeShare": "200000",
            "delegator": { "startRound": "2101" },
            "pools": [
                { "rewardTokens": "42.0" },
                { "rewardTokens": null }
            ],
            "delegators": [{ "id": "0xaa" }, { "id": "0xbb" }]
        })
    }

    #[test]
    fn parses_validated_rows() {
        let raw: RawNode = serde_json::from_value(sample_row()).unwrap();
        let node = raw.into_node().unwrap();
        assert_eq!(node.activation_round, 2100);
        // never-deactivates sentinel saturates instead of failing the row
        assert_eq!(node.deactivation_round, u64::MAX);
        assert_eq!(node.total_stake, 150000.5);
        assert_eq!(node.reward_cut, 500_000);
        assert_eq!(node.fee_share, 200_000);
        assert_eq!(node.start_round, Some(2101));
        assert_eq!(node.pools.len(), 2);
        assert_eq!(node.pools[0].reward_tokens.as_deref(), Some("42.0"));
        assert_eq!(node.pools[1].reward_tokens, None);
        assert_eq!(node.delegators, vec!["0xaa", "0xbb"]);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let mut row = sample_row();
        row["totalStake"] = serde_json::json!("not-a-number");
        let raw: RawNode = serde_json::from_value(row).unwrap();
        assert!(matches!(
            raw.into_node(),
            Err(SourceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn query_filters_on_the_epoch_window() {
        let query = active_nodes_query(2500);
        assert!(query.contains("activationRound_lte: 2500"));
        assert!(query.contains("deactivationRound_gt: 2500"));
        assert!(query.contains(r#"round_not: "2500""#));
        assert!(query.contains("first: 30"));
    }
}

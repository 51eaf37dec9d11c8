use serde::{Deserialize, Serialize};

/// One entry of the reward-pool window. `reward_tokens` is null for epochs
/// where the node did not call reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardPool {
    #[serde(rename = "rewardTokens")]
    pub reward_tokens: Option<String>,
}

/// An active staking node as reported by the indexer, already validated and
/// parsed out of the wire representation at the adapter boundary.
///
/// `total_stake` and `total_volume_eth` are 18-decimal token values;
/// `reward_cut` and `fee_share` are parts-per-million fixed point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: String,
    pub activation_round: u64,
    pub deactivation_round: u64,
    pub total_stake: f64,
    pub total_volume_eth: f64,
    pub reward_cut: u64,
    pub fee_share: u64,
    /// Start round of the node's own delegator position, when present.
    pub start_round: Option<u64>,
    /// Reward-pool window: at most 30 pools, most recent first, current
    /// epoch excluded.
    pub pools: Vec<RewardPool>,
    /// Identities of delegators bonded to this node.
    pub delegators: Vec<String>,
}

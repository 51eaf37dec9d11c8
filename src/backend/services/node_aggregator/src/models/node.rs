use serde::{Deserialize, Serialize};

use crate::models::chain::RewardPool;

/// Naming-service identity for a node. Every field is independently
/// optional: a failed or empty lookup leaves it `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnsIdentity {
    pub name: Option<String>,
    pub url: Option<String>,
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
}

/// Profile from the decentralized content store, scoped to a namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// One denormalized record per active node, rebuilt from the external
/// sources on every refresh cycle. Derived, read-only; nothing here is
/// persisted.
///
/// `current_high_score` is `None` when the node is missing from the score
/// snapshot entirely. Consumers must render that as "N/A", never as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub address: String,
    pub ens: EnsIdentity,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub total_stake: f64,
    pub self_stake: f64,
    /// `total_stake - self_stake`, deliberately not clamped: a failed
    /// self-stake read defaults to 0 and overstates this field.
    pub delegated_stake: f64,
    pub total_volume_eth: f64,
    pub current_high_score: Option<f64>,
    pub average_score: f64,
    pub reward_call_count: usize,
    pub reward_call_denominator: usize,
    pub reward_cut_fraction: f64,
    pub fee_cut_fraction: f64,
    pub total_delegators: usize,
    pub pools: Vec<RewardPool>,
}

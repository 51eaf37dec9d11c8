use async_trait::async_trait;

use crate::models::chain::NodeInfo;
use crate::models::node::{EnsIdentity, Profile};
use crate::models::score::{Region, ScoreSnapshot};
use crate::utils::errors::Result;

/// Read-only view of the staking-protocol indexer.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Identifier of the protocol's current epoch.
    async fn current_epoch(&self) -> Result<u64>;

    /// Nodes with `activation_round <= epoch < deactivation_round`, ordered
    /// by total stake descending, each carrying its reward-pool window.
    async fn active_nodes(&self, epoch: u64) -> Result<Vec<NodeInfo>>;
}

/// Bulk performance-score feed. A node missing from the snapshot means "no
/// score data", not an error.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn snapshot(&self) -> Result<ScoreSnapshot>;

    /// Region id to display-name listing.
    async fn regions(&self) -> Result<Vec<Region>>;
}

/// Naming-service and decentralized-profile lookups. Both lookups are
/// per-node and independently optional: the pipeline substitutes defaults
/// on failure instead of aborting the node.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<EnsIdentity>;

    async fn profile(&self, address: &str, namespace: &str) -> Result<Option<Profile>>;
}

/// Read-only staking-contract calls.
#[async_trait]
pub trait StakingContract: Send + Sync {
    /// `pendingStake(node, epoch)` in wei (18 decimals).
    async fn pending_stake(&self, address: &str, epoch: u64) -> Result<u128>;
}

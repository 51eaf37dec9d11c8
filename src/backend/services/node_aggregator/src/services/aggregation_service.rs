use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::models::chain::NodeInfo;
use crate::models::node::{EnsIdentity, NodeRecord, Profile};
use crate::models::score::{NodeScores, ScoreSnapshot};
use crate::sources::traits::{ChainDataSource, IdentitySource, ScoreSource, StakingContract};
use crate::utils::errors::Result;
use crate::utils::format::wei_to_tokens;

const MICRO_DENOMINATOR: f64 = 1_000_000.0;

/// Result of one refresh cycle: one record per active node plus the raw
/// score snapshot for leaderboard consumers.
#[derive(Debug, Clone)]
pub struct AggregateOutput {
    pub epoch: u64,
    pub records: Vec<NodeRecord>,
    pub snapshot: ScoreSnapshot,
}

/// Joins the chain-data, score and identity sources into one denormalized
/// record per active node.
///
/// Failure semantics: a chain-data or score-source failure is fatal to the
/// cycle; identity and self-stake failures degrade the affected node only
/// and never block its siblings.
pub struct AggregationService<C, S, I, K> {
    chain: Arc<C>,
    scores: Arc<S>,
    identity: Arc<I>,
    staking: Arc<K>,
    profile_namespace: String,
}

impl<C, S, I, K> AggregationService<C, S, I, K>
where
    C: ChainDataSource,
    S: ScoreSource,
    I: IdentitySource,
    K: StakingContract,
{
    pub fn new(
        chain: Arc<C>,
        scores: Arc<S>,
        identity: Arc<I>,
        staking: Arc<K>,
        profile_namespace: impl Into<String>,
    ) -> Self {
        Self {
            chain,
            scores,
            identity,
            staking,
            profile_namespace: profile_namespace.into(),
        }
    }

    /// Run one refresh cycle.
    pub async fn aggregate(&self) -> Result<AggregateOutput> {
        let epoch = self.chain.current_epoch().await?;

        // the node list and the score snapshot have no ordering dependency
        let (nodes, snapshot) =
            tokio::try_join!(self.chain.active_nodes(epoch), self.scores.snapshot())?;
        info!(epoch, nodes = nodes.len(), "aggregating active node set");

        // per-node resolution runs concurrently and completes in any order;
        // records are accumulated by reducing the joined results
        let mut records: Vec<NodeRecord> = join_all(
            nodes
                .into_iter()
                .map(|node| self.build_record(node, epoch, &snapshot)),
        )
        .await;

        // match the indexer's requested ordering
        records.sort_by(|a, b| {
            b.total_stake
                .partial_cmp(&a.total_stake)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });

        Ok(AggregateOutput {
            epoch,
            records,
            snapshot,
        })
    }

    async fn build_record(&self, node: NodeInfo, epoch: u64, snapshot: &ScoreSnapshot) -> NodeRecord {
        let (ens, profile, self_stake_wei) = tokio::join!(
            self.resolve_identity(&node.id),
            self.resolve_profile(&node.id),
            self.resolve_self_stake(&node.id, epoch),
        );

        let scores = snapshot.nodes.get(&node.id);
        let current_high_score = scores.and_then(NodeScores::high_score);
        let average_score = scores.map(NodeScores::average_score).unwrap_or(0.0);

        let self_stake = wei_to_tokens(self_stake_wei);
        let reward_call_count = node
            .pools
            .iter()
            .filter(|p| p.reward_tokens.is_some())
            .count();

        NodeRecord {
            address: node.id,
            ens,
            username: profile.as_ref().and_then(|p| p.name.clone()),
            avatar: profile.and_then(|p| p.image),
            total_stake: node.total_stake,
            self_stake,
            delegated_stake: node.total_stake - self_stake,
            total_volume_eth: node.total_volume_eth,
            current_high_score,
            average_score,
            reward_call_count,
            reward_call_denominator: node.pools.len(),
            reward_cut_fraction: node.reward_cut as f64 / MICRO_DENOMINATOR,
            fee_cut_fraction: 1.0 - node.fee_share as f64 / MICRO_DENOMINATOR,
            total_delegators: node.delegators.len(),
            pools: node.pools,
        }
    }

    async fn resolve_identity(&self, address: &str) -> EnsIdentity {
        match self.identity.resolve(address).await {
            Ok(ens) => ens,
            Err(err) => {
                warn!(%address, %err, "name resolution failed");
                EnsIdentity::default()
            }
        }
    }

    async fn resolve_profile(&self, address: &str) -> Option<Profile> {
        match self
            .identity
            .profile(address, &self.profile_namespace)
            .await
        {
            Ok(profile) => profile,
            Err(err) => {
                warn!(%address, %err, "profile lookup failed");
                None
            }
        }
    }

    async fn resolve_self_stake(&self, address: &str, epoch: u64) -> u128 {
        match self.staking.pending_stake(address, epoch).await {
            Ok(wei) => wei,
            Err(err) => {
                warn!(%address, %err, "self-stake read failed, defaulting to 0");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::models::chain::RewardPool;
    use crate::models::score::Region;
    use crate::utils::errors::SourceError;

    struct FakeChain;

    #[async_trait]
    impl ChainDataSource for FakeChain {
        async fn current_epoch(&self) -> Result<u64> {
            Ok(2500)
        }

        async fn active_nodes(&self, _epoch: u64) -> Result<Vec<NodeInfo>> {
            Ok(vec![NodeInfo {
                id: "0x01".to_string(),
                activation_round: 100,
                deactivation_round: u64::MAX,
                total_stake: 10.0,
                total_volume_eth: 1.0,
                reward_cut: 500_000,
                fee_share: 200_000,
                start_round: Some(101),
                pools: vec![RewardPool {
                    reward_tokens: Some("1.0".to_string()),
                }],
                delegators: vec!["0xd1".to_string()],
            }])
        }
    }

    struct FakeScores;

    #[async_trait]
    impl ScoreSource for FakeScores {
        async fn snapshot(&self) -> Result<ScoreSnapshot> {
            Ok(ScoreSnapshot {
                nodes: HashMap::new(),
                ..Default::default()
            })
        }

        async fn regions(&self) -> Result<Vec<Region>> {
            Ok(vec![])
        }
    }

    struct FakeIdentity;

    #[async_trait]
    impl IdentitySource for FakeIdentity {
        async fn resolve(&self, _address: &str) -> Result<EnsIdentity> {
            Ok(EnsIdentity::default())
        }

        async fn profile(&self, _address: &str, _namespace: &str) -> Result<Option<Profile>> {
            Ok(None)
        }
    }

    struct FailingStake;

    #[async_trait]
    impl StakingContract for FailingStake {
        async fn pending_stake(&self, address: &str, _epoch: u64) -> Result<u128> {
            Err(SourceError::resolution(address, "execution reverted"))
        }
    }

    #[test]
    fn failed_self_stake_defaults_to_zero_but_keeps_the_record() {
        let service = AggregationService::new(
            Arc::new(FakeChain),
            Arc::new(FakeScores),
            Arc::new(FakeIdentity),
            Arc::new(FailingStake),
            "stakeboard",
        );

        let output = tokio_test::block_on(service.aggregate()).unwrap();
        assert_eq!(output.records.len(), 1);
        let record = &output.records[0];
        assert_eq!(record.self_stake, 0.0);
        assert_eq!(record.delegated_stake, record.total_stake);
    }
}

pub mod chain;
pub mod node;
pub mod score;

pub use chain::{NodeInfo, RewardPool};
pub use node::{EnsIdentity, NodeRecord, Profile};
pub use score::{AiScore, NodeScores, Region, ScoreSnapshot};

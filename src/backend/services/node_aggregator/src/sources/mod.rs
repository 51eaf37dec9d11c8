pub mod http;
pub mod traits;

pub use traits::{ChainDataSource, IdentitySource, ScoreSource, StakingContract};

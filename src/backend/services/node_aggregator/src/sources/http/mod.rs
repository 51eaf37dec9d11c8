pub mod identity;
pub mod rpc;
pub mod score_api;
pub mod subgraph;

pub use identity::IdentityApi;
pub use rpc::RpcStakingContract;
pub use score_api::ScoreApi;
pub use subgraph::SubgraphChainData;

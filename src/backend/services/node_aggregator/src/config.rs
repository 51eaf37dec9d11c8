use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the aggregation backend. Constructed once at process
/// start and passed by reference into the pipeline, never held as ambient
/// global state, so tests can substitute fakes for every source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// GraphQL endpoint of the staking-protocol subgraph
    pub subgraph_url: String,
    /// Base URL of the performance-score service
    pub score_api_url: String,
    /// JSON-RPC endpoint used for read-only contract calls
    pub rpc_url: String,
    /// Address of the bonding manager contract
    pub bonding_manager: String,
    /// Base URL of the naming-service gateway
    pub identity_api_url: String,
    /// Base URL of the decentralized-profile gateway
    pub profile_api_url: String,
    /// Namespace used for profile lookups
    pub profile_namespace: String,
    /// Timeout applied to every external fetch, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Bind address for the JSON API
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            subgraph_url: "http://127.0.0.1:8000/subgraphs/name/staking".to_string(),
            score_api_url: "http://127.0.0.1:8001/api".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            bonding_manager: "0x511bc4556d823ae99630ae8de28b9b80df90ea2e".to_string(),
            identity_api_url: "http://127.0.0.1:8002/ens".to_string(),
            profile_api_url: "http://127.0.0.1:8003/profile".to_string(),
            profile_namespace: "stakeboard".to_string(),
            request_timeout_secs: default_request_timeout(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from `STAKEBOARD_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            subgraph_url: env_or("STAKEBOARD_SUBGRAPH_URL", defaults.subgraph_url),
            score_api_url: env_or("STAKEBOARD_SCORE_API_URL", defaults.score_api_url),
            rpc_url: env_or("STAKEBOARD_RPC_URL", defaults.rpc_url),
            bonding_manager: env_or("STAKEBOARD_BONDING_MANAGER", defaults.bonding_manager),
            identity_api_url: env_or("STAKEBOARD_IDENTITY_API_URL", defaults.identity_api_url),
            profile_api_url: env_or("STAKEBOARD_PROFILE_API_URL", defaults.profile_api_url),
            profile_namespace: env_or("STAKEBOARD_PROFILE_NAMESPACE", defaults.profile_namespace),
            request_timeout_secs: env_or("STAKEBOARD_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs.to_string())
                .parse()
                .unwrap_or(defaults.request_timeout_secs),
            bind_addr: env_or("STAKEBOARD_BIND_ADDR", defaults.bind_addr),
        }
    }
}

fn env_or(key: &str, fallback: String) -> String {
    env::var(key).unwrap_or(fallback)
}

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::sources::traits::StakingContract;
use crate::utils::errors::{Result, SourceError};

const SOURCE: &str = "rpc";

// keccak256("pendingStake(address,uint256)")[0..4]
const PENDING_STAKE_SELECTOR: &str = "9d0b2c7a";

/// Staking-contract reads over plain JSON-RPC `eth_call`. The only call
/// this system makes is `pendingStake(node, epoch)` with the node's own
/// identity as delegator, so the ABI encoding is done by hand.
pub struct RpcStakingContract {
    client: reqwest::Client,
    url: String,
    contract: String,
}

impl RpcStakingContract {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        contract: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            contract: contract.into(),
        }
    }
}

#[async_trait]
impl StakingContract for RpcStakingContract {
    async fn pending_stake(&self, address: &str, epoch: u64) -> Result<u128> {
        let data = encode_pending_stake(address, epoch)?;
        debug!(%address, epoch, "pendingStake eth_call");

        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": self.contract, "data": data }, "latest"],
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;

        let payload: RpcResponse = response
            .json()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;

        if let Some(error) = payload.error {
            return Err(SourceError::resolution(address, error.message));
        }

        let result = payload
            .result
            .ok_or_else(|| SourceError::malformed(SOURCE, "response carries no result"))?;
        decode_wei_word(&result)
    }
}

/// ABI-encode `pendingStake(address,uint256)`: 4-byte selector, the address
/// left-padded to 32 bytes, then the epoch as a 32-byte big-endian word.
fn encode_pending_stake(address: &str, epoch: u64) -> Result<String> {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    let raw = hex::decode(stripped)
        .map_err(|_| SourceError::resolution(address, "identity is not hex"))?;
    if raw.len() != 20 {
        return Err(SourceError::resolution(address, "identity is not 20 bytes"));
    }
    Ok(format!(
        "0x{PENDING_STAKE_SELECTOR}{:0>64}{epoch:064x}",
        stripped.to_lowercase()
    ))
}

/// Decode one 32-byte return word into wei. Stake amounts beyond u128 never
/// occur with an 18-decimal token supply.
fn decode_wei_word(result: &str) -> Result<u128> {
    let digits = result.trim_start_matches("0x").trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 32 {
        return Err(SourceError::malformed(SOURCE, "return word exceeds u128"));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| SourceError::malformed(SOURCE, format!("bad return word: {result:?}")))
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

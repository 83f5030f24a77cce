//! Network configuration types.
//!
//! Each network the engine may connect to has its own RPC endpoints and its
//! own deployment of the tender contract. A network without a deployment
//! address is known but unusable: connecting to it is a network mismatch.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for an RPC endpoint. An entry without `http` is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcEndpoint {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http: Option<String>,
}

impl RpcEndpoint {
	/// Creates a new RPC endpoint with HTTP URL only.
	pub fn http_only(url: impl Into<String>) -> Self {
		Self {
			http: Some(url.into()),
		}
	}
}

/// Configuration for a single network.
///
/// # Fields
///
/// * `name` - Optional human-readable label
/// * `rpc_urls` - RPC endpoints, the first HTTP one is used
/// * `tender_contract_address` - Deployment address of the tender contract on this network
/// * `deployment_block` - Block the contract was deployed at, the default start of a replay
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub rpc_urls: Vec<RpcEndpoint>,
	#[serde(default)]
	pub tender_contract_address: Option<Address>,
	#[serde(default)]
	pub deployment_block: u64,
}

impl NetworkConfig {
	/// Get the first available HTTP URL from the RPC endpoints.
	pub fn get_http_url(&self) -> Option<&str> {
		self.rpc_urls
			.iter()
			.find_map(|endpoint| endpoint.http.as_deref())
	}
}

/// Networks configuration mapping chain IDs to their configurations.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Deserializes network configurations keyed by chain ID.
///
/// TOML table keys are strings, so chain IDs arrive as `"31337"` and are
/// parsed to `u64` here.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Deserialize)]
	struct Wrapper {
		#[serde(deserialize_with = "deserialize_networks")]
		networks: NetworksConfig,
	}

	#[test]
	fn test_deserialize_networks_from_toml() {
		let input = r#"
[networks.31337]
name = "anvil"
tender_contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
deployment_block = 12
[[networks.31337.rpc_urls]]
http = "http://localhost:8545"

[networks.11155111]
[[networks.11155111.rpc_urls]]
[[networks.11155111.rpc_urls]]
http = "https://sepolia.example"
"#;
		let parsed: Wrapper = toml::from_str(input).unwrap();
		let local = &parsed.networks[&31337];
		assert_eq!(local.get_http_url(), Some("http://localhost:8545"));
		assert_eq!(local.deployment_block, 12);
		assert!(local.tender_contract_address.is_some());

		let sepolia = &parsed.networks[&11155111];
		assert_eq!(sepolia.get_http_url(), Some("https://sepolia.example"));
		assert_eq!(sepolia.tender_contract_address, None);
		assert_eq!(sepolia.deployment_block, 0);
	}

	#[test]
	fn test_deserialize_networks_rejects_bad_chain_id() {
		let input = r#"
[networks.mainnet]
rpc_urls = []
"#;
		let result: Result<Wrapper, _> = toml::from_str(input);
		assert!(result.is_err());
	}
}

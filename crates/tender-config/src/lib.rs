//! Configuration module for the tender lifecycle engine.
//!
//! Configuration is a single TOML file. String values may reference
//! environment variables as `${NAME}` or `${NAME:-default}`; references are
//! resolved before parsing, so secrets such as the account key never need to
//! be written to disk.
//!
//! ```toml
//! [engine]
//! network_id = 31337
//!
//! [networks.31337]
//! tender_contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//! [[networks.31337.rpc_urls]]
//! http = "http://localhost:8545"
//!
//! [account]
//! private_key = "${TENDER_PRIVATE_KEY}"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tender_types::networks::deserialize_networks;
use tender_types::{NetworksConfig, SecretString};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Engine-wide settings, including the active network.
	pub engine: EngineConfig,
	/// Known networks keyed by chain ID.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Ledger request settings.
	#[serde(default)]
	pub ledger: LedgerConfig,
	/// Caller account.
	#[serde(default)]
	pub account: AccountConfig,
	/// Client-side storage for the account hint and replay cursors.
	#[serde(default)]
	pub storage: StorageConfig,
	/// Event replay settings.
	#[serde(default)]
	pub replay: ReplayConfig,
}

/// Engine-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
	/// Chain ID of the network to connect to on startup.
	pub network_id: u64,
}

/// Ledger request settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
	/// Timeout applied to every individual RPC request.
	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,
	/// Maximum time to wait for a submitted transaction to be mined.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub confirmation_timeout_seconds: u64,
	/// Extra gas on top of the estimate, in basis points (1000 = 10%).
	#[serde(default)]
	pub gas_buffer_bps: u32,
}

impl Default for LedgerConfig {
	fn default() -> Self {
		Self {
			request_timeout_seconds: default_request_timeout_seconds(),
			confirmation_timeout_seconds: default_confirmation_timeout_seconds(),
			gas_buffer_bps: 0,
		}
	}
}

fn default_request_timeout_seconds() -> u64 {
	30
}

fn default_confirmation_timeout_seconds() -> u64 {
	120
}

/// Caller account configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex-encoded private key. Usually supplied through an environment reference.
	#[serde(default)]
	pub private_key: Option<SecretString>,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	/// Process-local, lost on exit.
	#[default]
	Memory,
	/// Files under `storage.path`.
	File,
}

/// Client-side storage configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
	#[serde(default)]
	pub primary: StorageBackend,
	/// Directory for the file backend.
	#[serde(default)]
	pub path: Option<PathBuf>,
}

/// Event replay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
	/// Largest block span requested in a single log query.
	#[serde(default = "default_max_block_range")]
	pub max_block_range: u64,
	/// Resume replays from a persisted cursor instead of scanning from the
	/// deployment block every time.
	#[serde(default)]
	pub use_cursor: bool,
}

impl Default for ReplayConfig {
	fn default() -> Self {
		Self {
			max_block_range: default_max_block_range(),
			use_cursor: false,
		}
	}
}

fn default_max_block_range() -> u64 {
	10_000
}

/// Resolves `${VAR}` and `${VAR:-default}` references in the raw file contents.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut missing = Vec::new();
	let result = re.replace_all(input, |caps: &regex::Captures<'_>| {
		let var_name = &caps[1];
		match std::env::var(var_name) {
			Ok(value) => value,
			Err(_) => match caps.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					missing.push(var_name.to_string());
					String::new()
				},
			},
		}
	});

	if let Some(var_name) = missing.first() {
		return Err(ConfigError::Validation(format!(
			"Environment variable '{var_name}' not found"
		)));
	}

	Ok(result.into_owned())
}

impl Config {
	/// Loads configuration from a file, resolving environment references.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		tracing::debug!(path = %path, "Loaded configuration file");
		contents.parse()
	}

	/// Validates cross-field constraints that serde cannot express.
	///
	/// A network without a contract deployment is valid configuration; it is
	/// rejected at connect time instead, since the active network can change
	/// while running.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		if !self.networks.contains_key(&self.engine.network_id) {
			return Err(ConfigError::Validation(format!(
				"Active network {} not found in networks",
				self.engine.network_id
			)));
		}
		for (chain_id, network) in &self.networks {
			if network.get_http_url().is_none() {
				return Err(ConfigError::Validation(format!(
					"Network {chain_id} must have at least one HTTP RPC URL"
				)));
			}
		}

		if self.ledger.request_timeout_seconds == 0 || self.ledger.request_timeout_seconds > 600
		{
			return Err(ConfigError::Validation(
				"request_timeout_seconds must be between 1 and 600".into(),
			));
		}
		if self.ledger.confirmation_timeout_seconds == 0
			|| self.ledger.confirmation_timeout_seconds > 3600
		{
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds must be between 1 and 3600".into(),
			));
		}
		if self.ledger.gas_buffer_bps > 10_000 {
			return Err(ConfigError::Validation(
				"gas_buffer_bps cannot exceed 10000 (100%)".into(),
			));
		}

		if self.storage.primary == StorageBackend::File && self.storage.path.is_none() {
			return Err(ConfigError::Validation(
				"File storage requires storage.path".into(),
			));
		}

		if self.replay.max_block_range == 0 {
			return Err(ConfigError::Validation(
				"replay.max_block_range must be at least 1".into(),
			));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const MINIMAL: &str = r#"
[engine]
network_id = 31337

[networks.31337]
tender_contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
[[networks.31337.rpc_urls]]
http = "http://localhost:8545"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TENDER_TEST_HOST", "localhost");
		std::env::set_var("TENDER_TEST_PORT", "8545");

		let input = "url = \"http://${TENDER_TEST_HOST}:${TENDER_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");

		std::env::remove_var("TENDER_TEST_HOST");
		std::env::remove_var("TENDER_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${TENDER_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${TENDER_UNSET_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.unwrap_err().to_string().contains("TENDER_UNSET_VAR"));
	}

	#[test]
	fn test_minimal_config_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.engine.network_id, 31337);
		assert_eq!(config.ledger.request_timeout_seconds, 30);
		assert_eq!(config.ledger.confirmation_timeout_seconds, 120);
		assert_eq!(config.ledger.gas_buffer_bps, 0);
		assert_eq!(config.storage.primary, StorageBackend::Memory);
		assert_eq!(config.replay.max_block_range, 10_000);
		assert!(!config.replay.use_cursor);
		assert!(config.account.private_key.is_none());
	}

	#[test]
	fn test_config_with_env_private_key() {
		std::env::set_var(
			"TENDER_TEST_KEY",
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let input = format!(
			"{MINIMAL}\n[account]\nprivate_key = \"${{TENDER_TEST_KEY}}\"\n"
		);
		let config: Config = input.parse().unwrap();
		assert_eq!(
			config.account.private_key.unwrap().expose_secret(),
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
		);
		std::env::remove_var("TENDER_TEST_KEY");
	}

	#[test]
	fn test_active_network_must_exist() {
		let input = MINIMAL.replace("network_id = 31337", "network_id = 1");
		let err = input.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Active network 1"));
	}

	#[test]
	fn test_network_without_deployment_is_accepted() {
		let input = format!(
			"{MINIMAL}\n[networks.11155111]\n[[networks.11155111.rpc_urls]]\nhttp = \"https://rpc.sepolia.example\"\n"
		);
		let config: Config = input.parse().unwrap();
		assert!(config.networks[&11155111].tender_contract_address.is_none());
	}

	#[test]
	fn test_network_requires_http_url() {
		let input = r#"
[engine]
network_id = 5

[networks.5]
[[networks.5.rpc_urls]]
"#;
		let err = input.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("HTTP RPC URL"));
	}

	#[test]
	fn test_file_storage_requires_path() {
		let input = format!("{MINIMAL}\n[storage]\nprimary = \"file\"\n");
		let err = input.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));

		let input = format!("{MINIMAL}\n[storage]\nprimary = \"file\"\npath = \"./data\"\n");
		let config: Config = input.parse().unwrap();
		assert_eq!(config.storage.path, Some(PathBuf::from("./data")));
	}

	#[test]
	fn test_ledger_bounds() {
		let input = format!("{MINIMAL}\n[ledger]\ngas_buffer_bps = 20000\n");
		assert!(input.parse::<Config>().is_err());

		let input = format!("{MINIMAL}\n[ledger]\nrequest_timeout_seconds = 0\n");
		assert!(input.parse::<Config>().is_err());

		let input = format!("{MINIMAL}\n[replay]\nmax_block_range = 0\n");
		assert!(input.parse::<Config>().is_err());
	}

	#[test]
	fn test_parse_error_is_reported() {
		let err = "[engine\nnetwork_id = 1".parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(MINIMAL.as_bytes()).unwrap();
		let path = file.path().to_str().unwrap().to_string();

		let config = Config::from_file(&path).await.unwrap();
		assert!(config.networks.contains_key(&31337));

		let missing = Config::from_file("/nonexistent/tender.toml").await;
		assert!(matches!(missing, Err(ConfigError::Io(_))));
	}
}

//! Tender lifecycle engine.
//!
//! The ledger is the system of record for tenders, bids and approvals. This
//! crate keeps no authoritative state of its own: it holds a [`Session`] to
//! the ledger, reads the current tender list from the contract, replays the
//! contract's event log for bids and approvals, and issues the three
//! state-changing calls. Everything a caller sees is derived from those reads
//! on demand.
//!
//! [`TenderEngine`] is the entry point. The components it wires together are
//! public so they can be driven directly with a session of your own.

pub mod commands;
pub mod derived;
pub mod engine;
pub mod error;
pub mod event_bus;
pub mod query;
pub mod replay;
pub mod role;
pub mod session;

pub use commands::CommandIssuer;
pub use engine::TenderEngine;
pub use error::{
	AuthorizationError, CommandError, EngineError, QueryError, ReplayError, RoleError,
	SessionError, SubmissionError, SubmissionStage,
};
pub use event_bus::{CommandKind, EngineEvent, EventBus, InvalidationReason};
pub use query::QueryService;
pub use replay::{
	CheckpointKey, CheckpointStore, EventReplayer, LedgerEvent, ReplayCheckpoint,
	StorageCheckpointStore,
};
pub use role::RoleResolver;
pub use session::{AccountHint, ContractHandle, ProviderEvent, Session, SessionManager};

#[cfg(test)]
pub(crate) mod test_utils {
	use crate::session::{ContractHandle, Session};
	use alloy_primitives::{address, Address};
	use alloy_signer_local::PrivateKeySigner;
	use std::sync::Arc;
	use tender_ledger::MockLedgerInterface;
	use tender_types::{NetworkConfig, NetworksConfig, RpcEndpoint};

	pub(crate) const CHAIN_ID: u64 = 31337;
	pub(crate) const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
	pub(crate) const AUTHORITY: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	pub(crate) const VENDOR: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

	pub(crate) fn anvil_signer() -> PrivateKeySigner {
		"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
			.parse()
			.unwrap()
	}

	pub(crate) fn networks_with(entries: &[(u64, Option<Address>)]) -> NetworksConfig {
		entries
			.iter()
			.map(|(chain_id, contract)| {
				(
					*chain_id,
					NetworkConfig {
						name: None,
						rpc_urls: vec![RpcEndpoint::http_only("http://127.0.0.1:8545")],
						tender_contract_address: *contract,
						deployment_block: 0,
					},
				)
			})
			.collect()
	}

	/// A session over `ledger` on the local test chain, acting as `account`.
	pub(crate) fn session_with(ledger: MockLedgerInterface, account: Address) -> Session {
		session_at(ledger, account, 0)
	}

	/// Like [`session_with`] with the contract deployed at `deployment_block`.
	pub(crate) fn session_at(
		ledger: MockLedgerInterface,
		account: Address,
		deployment_block: u64,
	) -> Session {
		Session::new(
			Arc::new(ledger),
			ContractHandle {
				address: CONTRACT,
				chain_id: CHAIN_ID,
				deployment_block,
			},
			account,
		)
	}
}

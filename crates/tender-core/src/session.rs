//! Session management.
//!
//! A [`Session`] binds one ledger endpoint, the tender contract deployed on
//! that network and the caller account. The [`SessionManager`] owns the only
//! mutable reference to the current session: it is published whole after
//! every connection step succeeded and dropped whole when the provider
//! reports an account or chain change. Readers clone the `Arc` and never see
//! a half-built session.

use crate::error::SessionError;
use crate::event_bus::{EngineEvent, EventBus, InvalidationReason};
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tender_account::AccountInterface;
use tender_ledger::{LedgerConnector, LedgerInterface};
use tender_storage::{StorageKey, StorageService};
use tender_types::{current_timestamp, NetworksConfig, Transaction};
use tokio::sync::{Mutex, RwLock};

const ACCOUNT_HINT_ID: &str = "last";

/// Address and network of the tender contract a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractHandle {
	pub address: Address,
	pub chain_id: u64,
	/// First block that can contain contract events.
	pub deployment_block: u64,
}

/// An established connection: endpoint, contract and caller.
pub struct Session {
	ledger: Arc<dyn LedgerInterface>,
	contract: ContractHandle,
	account: Address,
}

impl Session {
	pub fn new(ledger: Arc<dyn LedgerInterface>, contract: ContractHandle, account: Address) -> Self {
		Self {
			ledger,
			contract,
			account,
		}
	}

	pub fn ledger(&self) -> &dyn LedgerInterface {
		self.ledger.as_ref()
	}

	pub fn contract(&self) -> &ContractHandle {
		&self.contract
	}

	pub fn account(&self) -> Address {
		self.account
	}

	pub fn chain_id(&self) -> u64 {
		self.contract.chain_id
	}

	/// A transaction to the bound contract carrying `calldata`.
	pub fn contract_call(&self, calldata: impl Into<Bytes>) -> Transaction {
		Transaction::call(self.contract.address, calldata, self.contract.chain_id)
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("contract", &self.contract)
			.field("account", &self.account)
			.finish_non_exhaustive()
	}
}

/// Notifications from the ledger-access provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
	/// The active account changed.
	AccountsChanged,
	/// The provider switched to another chain.
	ChainChanged(u64),
}

/// Last account a session was established for. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHint {
	pub account: Address,
	pub chain_id: u64,
	pub connected_at: u64,
}

/// Owns the current [`Session`].
pub struct SessionManager {
	networks: NetworksConfig,
	active_network: RwLock<u64>,
	account: Arc<dyn AccountInterface>,
	connector: Arc<dyn LedgerConnector>,
	storage: Arc<StorageService>,
	event_bus: EventBus,
	session: RwLock<Option<Arc<Session>>>,
	/// Serializes connect and invalidate so an in-flight connect cannot
	/// publish a session for a network that was switched away from.
	transition: Mutex<()>,
}

impl SessionManager {
	pub fn new(
		networks: NetworksConfig,
		active_network: u64,
		account: Arc<dyn AccountInterface>,
		connector: Arc<dyn LedgerConnector>,
		storage: Arc<StorageService>,
		event_bus: EventBus,
	) -> Self {
		Self {
			networks,
			active_network: RwLock::new(active_network),
			account,
			connector,
			storage,
			event_bus,
			session: RwLock::new(None),
			transition: Mutex::new(()),
		}
	}

	/// Returns the current session, establishing one if there is none.
	#[tracing::instrument(skip_all)]
	pub async fn connect(&self) -> Result<Arc<Session>, SessionError> {
		let _guard = self.transition.lock().await;

		if let Some(session) = self.session.read().await.clone() {
			return Ok(session);
		}

		let chain_id = *self.active_network.read().await;
		let session = Arc::new(self.establish(chain_id).await?);

		*self.session.write().await = Some(session.clone());
		tracing::info!(
			chain_id = chain_id,
			account = %session.account(),
			contract = %session.contract().address,
			"Session established"
		);

		self.persist_hint(chain_id, session.account()).await;
		self.event_bus.publish(EngineEvent::SessionEstablished {
			chain_id,
			account: session.account(),
		});

		Ok(session)
	}

	async fn establish(&self, chain_id: u64) -> Result<Session, SessionError> {
		let network = self
			.networks
			.get(&chain_id)
			.ok_or_else(|| SessionError::NetworkMismatch {
				chain_id,
				reason: "network is not configured".to_string(),
			})?;

		let ledger = self
			.connector
			.connect(chain_id, network, self.account.signer())
			.map_err(|e| SessionError::NoProvider(e.to_string()))?;

		let reported = ledger
			.chain_id()
			.await
			.map_err(|e| SessionError::NoProvider(e.to_string()))?;
		if reported != chain_id {
			return Err(SessionError::NetworkMismatch {
				chain_id,
				reason: format!("endpoint reports chain {reported}"),
			});
		}

		let address = network
			.tender_contract_address
			.ok_or_else(|| SessionError::NetworkMismatch {
				chain_id,
				reason: "no tender contract deployed on this network".to_string(),
			})?;

		let account = self.account.address().await?;

		Ok(Session::new(
			ledger,
			ContractHandle {
				address,
				chain_id,
				deployment_block: network.deployment_block,
			},
			account,
		))
	}

	/// Returns the current session without connecting.
	pub async fn current(&self) -> Result<Arc<Session>, SessionError> {
		self.session
			.read()
			.await
			.clone()
			.ok_or(SessionError::NotConnected)
	}

	pub async fn active_network(&self) -> u64 {
		*self.active_network.read().await
	}

	/// Applies a provider notification. The session is dropped either way;
	/// a chain change also makes the new chain the active network.
	pub async fn handle_provider_event(&self, event: ProviderEvent) {
		let _guard = self.transition.lock().await;

		let reason = match event {
			ProviderEvent::AccountsChanged => InvalidationReason::AccountsChanged,
			ProviderEvent::ChainChanged(chain_id) => {
				*self.active_network.write().await = chain_id;
				InvalidationReason::ChainChanged { chain_id }
			},
		};

		self.invalidate(reason).await;
	}

	/// Drops the current session.
	pub async fn disconnect(&self) {
		let _guard = self.transition.lock().await;
		self.invalidate(InvalidationReason::Disconnected).await;
	}

	async fn invalidate(&self, reason: InvalidationReason) {
		let previous = self.session.write().await.take();
		if previous.is_some() {
			tracing::info!(?reason, "Session invalidated");
		}
		self.event_bus
			.publish(EngineEvent::SessionInvalidated { reason });
	}

	/// Last account a session was established for, if recorded.
	pub async fn account_hint(&self) -> Option<AccountHint> {
		match self
			.storage
			.retrieve_optional(StorageKey::AccountHint, ACCOUNT_HINT_ID)
			.await
		{
			Ok(hint) => hint,
			Err(e) => {
				tracing::warn!(error = %e, "Failed to read account hint");
				None
			},
		}
	}

	async fn persist_hint(&self, chain_id: u64, account: Address) {
		let hint = AccountHint {
			account,
			chain_id,
			connected_at: current_timestamp(),
		};
		if let Err(e) = self
			.storage
			.store(StorageKey::AccountHint, ACCOUNT_HINT_ID, &hint)
			.await
		{
			tracing::warn!(error = %e, "Failed to persist account hint");
		}
	}
}

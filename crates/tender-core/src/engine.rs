//! Engine facade.
//!
//! [`TenderEngine`] wires the session manager to the role resolver, command
//! issuer, query service and event replayer, and is the surface the CLI
//! talks to. Every operation except [`connect`](TenderEngine::connect) runs
//! against the current session and fails with `NotConnected` when there is
//! none.

use crate::commands::CommandIssuer;
use crate::derived;
use crate::error::{EngineError, QueryError};
use crate::event_bus::{CommandKind, EngineEvent, EventBus};
use crate::query::QueryService;
use crate::replay::{approvals_of, bids_of, EventReplayer, StorageCheckpointStore};
use crate::role::RoleResolver;
use crate::session::{AccountHint, ProviderEvent, Session, SessionManager};
use alloy_primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;
use tender_account::create_account;
use tender_config::{Config, StorageBackend, StorageConfig};
use tender_ledger::AlloyConnector;
use tender_storage::{FileStorage, MemoryStorage, StorageInterface, StorageService};
use tender_types::{
	ApprovalRecord, Bid, BlockRange, EventKind, NewTender, Role, SortOrder, Tender, TenderDetail,
	TenderId, TransactionReceipt,
};
use tokio::sync::broadcast;
use tracing::instrument;

/// Capacity of the engine event channel.
const EVENT_BUS_CAPACITY: usize = 64;

fn create_storage(config: &StorageConfig) -> Result<StorageService, EngineError> {
	let backend: Box<dyn StorageInterface> = match config.primary {
		StorageBackend::Memory => Box::new(MemoryStorage::new()),
		StorageBackend::File => {
			let path = config.path.clone().ok_or_else(|| {
				EngineError::Configuration("file storage requires storage.path".to_string())
			})?;
			Box::new(FileStorage::new(path))
		},
	};
	Ok(StorageService::new(backend))
}

/// Entry point for all tender operations.
pub struct TenderEngine {
	sessions: Arc<SessionManager>,
	roles: RoleResolver,
	commands: CommandIssuer,
	queries: QueryService,
	/// Full-range reads go through the persisted cursor when the replayer
	/// has a checkpoint store.
	replayer: EventReplayer,
	event_bus: EventBus,
}

impl TenderEngine {
	pub fn new(
		sessions: Arc<SessionManager>,
		commands: CommandIssuer,
		replayer: EventReplayer,
		event_bus: EventBus,
	) -> Self {
		Self {
			sessions,
			roles: RoleResolver::new(),
			commands,
			queries: QueryService::new(),
			replayer,
			event_bus,
		}
	}

	/// Builds an engine from configuration. Nothing is contacted until
	/// [`connect`](Self::connect).
	pub fn from_config(config: &Config) -> Result<Self, EngineError> {
		let account = create_account(config.account.private_key.as_ref())
			.map_err(|e| EngineError::Configuration(e.to_string()))?;

		let connector = AlloyConnector::new(
			Duration::from_secs(config.ledger.request_timeout_seconds),
			Duration::from_secs(config.ledger.confirmation_timeout_seconds),
		);

		let storage = Arc::new(create_storage(&config.storage)?);
		let event_bus = EventBus::new(EVENT_BUS_CAPACITY);

		let sessions = Arc::new(SessionManager::new(
			config.networks.clone(),
			config.engine.network_id,
			Arc::from(account),
			Arc::new(connector),
			storage.clone(),
			event_bus.clone(),
		));

		let mut replayer = EventReplayer::new(config.replay.max_block_range);
		if config.replay.use_cursor {
			replayer = replayer.with_checkpoints(Arc::new(StorageCheckpointStore::new(storage)));
		}

		tracing::debug!(
			network_id = config.engine.network_id,
			storage = ?config.storage.primary,
			use_cursor = config.replay.use_cursor,
			"Engine configured"
		);

		Ok(Self::new(
			sessions,
			CommandIssuer::new(config.ledger.gas_buffer_bps),
			replayer,
			event_bus,
		))
	}

	async fn session(&self) -> Result<Arc<Session>, EngineError> {
		Ok(self.sessions.current().await?)
	}

	/// Establishes the session, or returns the current one.
	#[instrument(skip_all)]
	pub async fn connect(&self) -> Result<Arc<Session>, EngineError> {
		Ok(self.sessions.connect().await?)
	}

	pub async fn disconnect(&self) {
		self.sessions.disconnect().await;
	}

	/// Forwards an account or chain change from the provider.
	pub async fn handle_provider_event(&self, event: ProviderEvent) {
		self.sessions.handle_provider_event(event).await;
	}

	pub async fn account_hint(&self) -> Option<AccountHint> {
		self.sessions.account_hint().await
	}

	pub async fn active_network(&self) -> u64 {
		self.sessions.active_network().await
	}

	pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
		self.event_bus.subscribe()
	}

	/// Role of the session account, queried fresh.
	#[instrument(skip_all)]
	pub async fn resolve_role(&self) -> Result<Role, EngineError> {
		let session = self.session().await?;
		Ok(self.roles.resolve(&session).await?)
	}

	/// Fails with an authorization error unless the caller is the authority.
	pub async fn require_authority(&self) -> Result<Role, EngineError> {
		let session = self.session().await?;
		Ok(self.roles.require(&session, Role::Authority).await?)
	}

	#[instrument(skip_all)]
	pub async fn create_tender(&self, params: &NewTender) -> Result<TransactionReceipt, EngineError> {
		let session = self.session().await?;
		let receipt = self.commands.create_tender(&session, params).await?;
		self.confirmed(CommandKind::CreateTender, None, &receipt);
		Ok(receipt)
	}

	#[instrument(skip_all, fields(tender_id = %tender_id))]
	pub async fn submit_bid(
		&self,
		tender_id: TenderId,
		amount: U256,
		bid_date: u64,
	) -> Result<TransactionReceipt, EngineError> {
		let session = self.session().await?;
		let receipt = self
			.commands
			.submit_bid(&session, tender_id, amount, bid_date)
			.await?;
		self.confirmed(CommandKind::SubmitBid, Some(tender_id), &receipt);
		Ok(receipt)
	}

	#[instrument(skip_all, fields(tender_id = %tender_id))]
	pub async fn approve_tender(
		&self,
		tender_id: TenderId,
		vendor: Address,
	) -> Result<TransactionReceipt, EngineError> {
		let session = self.session().await?;
		let receipt = self
			.commands
			.approve_tender(&session, tender_id, vendor)
			.await?;
		self.confirmed(CommandKind::ApproveTender, Some(tender_id), &receipt);
		Ok(receipt)
	}

	fn confirmed(&self, kind: CommandKind, tender_id: Option<TenderId>, receipt: &TransactionReceipt) {
		self.event_bus.publish(EngineEvent::TransactionConfirmed {
			kind,
			tender_id,
			hash: receipt.hash,
		});
	}

	#[instrument(skip_all)]
	pub async fn list_tenders(&self) -> Result<Vec<Tender>, EngineError> {
		let session = self.session().await?;
		Ok(self.queries.list_tenders(&session).await?)
	}

	/// `BidSubmitted` events in `range`.
	#[instrument(skip_all, fields(range = %range))]
	pub async fn bids_submitted(&self, range: BlockRange) -> Result<Vec<Bid>, EngineError> {
		let session = self.session().await?;
		self.bids_in(&session, range).await
	}

	/// `TenderApproved` events in `range`.
	#[instrument(skip_all, fields(range = %range))]
	pub async fn tenders_approved(
		&self,
		range: BlockRange,
	) -> Result<Vec<ApprovalRecord>, EngineError> {
		let session = self.session().await?;
		self.approvals_in(&session, range).await
	}

	/// Bids for one tender sorted by amount. `range` defaults to the full log.
	pub async fn bids_for_tender(
		&self,
		tender_id: TenderId,
		order: SortOrder,
		range: Option<BlockRange>,
	) -> Result<Vec<Bid>, EngineError> {
		let bids = self.bids_submitted(range.unwrap_or_default()).await?;
		Ok(derived::bids_for_tender(&bids, tender_id, order))
	}

	/// The approval currently in force for a tender, if any.
	pub async fn approval_for_tender(
		&self,
		tender_id: TenderId,
	) -> Result<Option<ApprovalRecord>, EngineError> {
		let approvals = self.tenders_approved(BlockRange::full()).await?;
		Ok(derived::approval_for_tender(&approvals, tender_id))
	}

	/// Snapshot, bids and approval of one tender. The three reads run
	/// concurrently.
	#[instrument(skip_all, fields(tender_id = %tender_id))]
	pub async fn tender_detail(
		&self,
		tender_id: TenderId,
		order: SortOrder,
	) -> Result<TenderDetail, EngineError> {
		let session = self.session().await?;
		let (tenders, bids, approvals) = self.read_all(&session).await?;

		let tender = tenders
			.into_iter()
			.find(|t| t.tender_id == tender_id)
			.ok_or(QueryError::TenderNotFound(tender_id))?;

		Ok(derived::tender_detail(tender, &bids, &approvals, order))
	}

	/// Authority view: every tender with its bids and approval.
	#[instrument(skip_all)]
	pub async fn dashboard(
		&self,
		order: SortOrder,
	) -> Result<Vec<TenderDetail>, EngineError> {
		let session = self.session().await?;
		self.roles.require(&session, Role::Authority).await?;

		let (tenders, bids, approvals) = self.read_all(&session).await?;
		Ok(tenders
			.into_iter()
			.map(|tender| derived::tender_detail(tender, &bids, &approvals, order))
			.collect())
	}

	async fn read_all(
		&self,
		session: &Session,
	) -> Result<(Vec<Tender>, Vec<Bid>, Vec<ApprovalRecord>), EngineError> {
		let tenders = async {
			self.queries
				.list_tenders(session)
				.await
				.map_err(EngineError::from)
		};
		tokio::try_join!(
			tenders,
			self.bids_in(session, BlockRange::full()),
			self.approvals_in(session, BlockRange::full()),
		)
	}

	async fn bids_in(&self, session: &Session, range: BlockRange) -> Result<Vec<Bid>, EngineError> {
		if self.replayer.has_checkpoints() && range == BlockRange::full() {
			let events = self.replayer.sync(session, EventKind::BidSubmitted).await?;
			return Ok(bids_of(events));
		}
		Ok(self.replayer.bids_submitted(session, range).await?)
	}

	async fn approvals_in(
		&self,
		session: &Session,
		range: BlockRange,
	) -> Result<Vec<ApprovalRecord>, EngineError> {
		if self.replayer.has_checkpoints() && range == BlockRange::full() {
			let events = self
				.replayer
				.sync(session, EventKind::TenderApproved)
				.await?;
			return Ok(approvals_of(events));
		}
		Ok(self.replayer.tenders_approved(session, range).await?)
	}
}

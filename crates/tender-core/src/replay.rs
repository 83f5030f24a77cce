//! Event log replay.
//!
//! Bids and approvals only exist as contract events, so every view over them
//! starts by scanning the log. A replay reads the latest block once, then
//! walks the requested range in windows of at most `max_block_range` blocks
//! and decodes each log into a [`LedgerEvent`]. Any failure fails the whole
//! replay; a partial list is never returned.
//!
//! With a [`CheckpointStore`] configured, [`EventReplayer::sync`] keeps the
//! events already seen per (chain, contract, kind) and only scans blocks
//! after the stored cursor.

use crate::error::ReplayError;
use crate::session::Session;
use alloy_primitives::{Address, B256};
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tender_ledger::LogQuery;
use tender_storage::{StorageError, StorageKey, StorageService};
use tender_types::{
	ApprovalRecord, Bid, BlockRange, ContractDecodeError, EventKind, EventProvenance,
	ITenderManagement,
};

/// Default upper bound on blocks per `eth_getLogs` request.
pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 10_000;

/// A decoded contract event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
	BidSubmitted(Bid),
	TenderApproved(ApprovalRecord),
}

impl LedgerEvent {
	pub fn provenance(&self) -> &EventProvenance {
		match self {
			LedgerEvent::BidSubmitted(bid) => &bid.provenance,
			LedgerEvent::TenderApproved(record) => &record.provenance,
		}
	}

	pub fn kind(&self) -> EventKind {
		match self {
			LedgerEvent::BidSubmitted(_) => EventKind::BidSubmitted,
			LedgerEvent::TenderApproved(_) => EventKind::TenderApproved,
		}
	}
}

fn signature_hash(kind: EventKind) -> B256 {
	match kind {
		EventKind::BidSubmitted => ITenderManagement::BidSubmitted::SIGNATURE_HASH,
		EventKind::TenderApproved => ITenderManagement::TenderApproved::SIGNATURE_HASH,
	}
}

/// Identifies one replay cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckpointKey {
	pub chain_id: u64,
	pub contract: Address,
	pub kind: EventKind,
}

impl CheckpointKey {
	pub fn for_session(session: &Session, kind: EventKind) -> Self {
		Self {
			chain_id: session.chain_id(),
			contract: session.contract().address,
			kind,
		}
	}

	/// Storage id, `"{chain_id}_{contract}_{kind}"`.
	pub fn storage_id(&self) -> String {
		format!("{}_{:#x}_{}", self.chain_id, self.contract, self.kind)
	}
}

/// Events materialized so far and the first block not yet scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayCheckpoint {
	pub next_block: u64,
	pub events: Vec<LedgerEvent>,
}

/// Persistence for replay cursors.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CheckpointStore: Send + Sync {
	async fn load(&self, key: &CheckpointKey) -> Result<Option<ReplayCheckpoint>, StorageError>;

	async fn save(
		&self,
		key: &CheckpointKey,
		checkpoint: &ReplayCheckpoint,
	) -> Result<(), StorageError>;
}

/// [`CheckpointStore`] backed by the engine's storage service.
pub struct StorageCheckpointStore {
	storage: Arc<StorageService>,
}

impl StorageCheckpointStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}
}

#[async_trait]
impl CheckpointStore for StorageCheckpointStore {
	async fn load(&self, key: &CheckpointKey) -> Result<Option<ReplayCheckpoint>, StorageError> {
		self.storage
			.retrieve_optional(StorageKey::ReplayCursor, &key.storage_id())
			.await
	}

	async fn save(
		&self,
		key: &CheckpointKey,
		checkpoint: &ReplayCheckpoint,
	) -> Result<(), StorageError> {
		self.storage
			.store(StorageKey::ReplayCursor, &key.storage_id(), checkpoint)
			.await
	}
}

/// Scans and decodes contract events.
#[derive(Clone)]
pub struct EventReplayer {
	max_block_range: u64,
	checkpoints: Option<Arc<dyn CheckpointStore>>,
}

impl Default for EventReplayer {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_BLOCK_RANGE)
	}
}

impl EventReplayer {
	/// `max_block_range` of 0 is treated as 1.
	pub fn new(max_block_range: u64) -> Self {
		Self {
			max_block_range: max_block_range.max(1),
			checkpoints: None,
		}
	}

	pub fn with_checkpoints(mut self, store: Arc<dyn CheckpointStore>) -> Self {
		self.checkpoints = Some(store);
		self
	}

	/// Whether [`sync`](Self::sync) resumes from persisted checkpoints.
	pub fn has_checkpoints(&self) -> bool {
		self.checkpoints.is_some()
	}

	/// Replays every event of `kind` in `range`, in ledger order.
	///
	/// The lower bound is raised to the contract's deployment block and the
	/// upper bound is capped at the latest block.
	#[tracing::instrument(skip_all, fields(kind = %kind, range = %range))]
	pub async fn replay(
		&self,
		session: &Session,
		kind: EventKind,
		range: BlockRange,
	) -> Result<Vec<LedgerEvent>, ReplayError> {
		let latest = session
			.ledger()
			.block_number()
			.await
			.map_err(ReplayError::Ledger)?;

		let from = range.from.max(session.contract().deployment_block);
		let to = range.to.map_or(latest, |to| to.min(latest));

		self.scan(session, kind, from, to).await
	}

	/// All `BidSubmitted` events in `range`.
	pub async fn bids_submitted(
		&self,
		session: &Session,
		range: BlockRange,
	) -> Result<Vec<Bid>, ReplayError> {
		let events = self.replay(session, EventKind::BidSubmitted, range).await?;
		Ok(bids_of(events))
	}

	/// All `TenderApproved` events in `range`.
	pub async fn tenders_approved(
		&self,
		session: &Session,
		range: BlockRange,
	) -> Result<Vec<ApprovalRecord>, ReplayError> {
		let events = self
			.replay(session, EventKind::TenderApproved, range)
			.await?;
		Ok(approvals_of(events))
	}

	/// Brings the stored cursor for `kind` up to the latest block and returns
	/// every event seen so far.
	///
	/// Without a checkpoint store this is a full replay. Reorgs below the
	/// cursor are not detected.
	#[tracing::instrument(skip_all, fields(kind = %kind))]
	pub async fn sync(
		&self,
		session: &Session,
		kind: EventKind,
	) -> Result<Vec<LedgerEvent>, ReplayError> {
		let Some(store) = &self.checkpoints else {
			return self.replay(session, kind, BlockRange::full()).await;
		};

		let key = CheckpointKey::for_session(session, kind);
		let mut checkpoint = store
			.load(&key)
			.await
			.map_err(ReplayError::Checkpoint)?
			.unwrap_or_else(|| ReplayCheckpoint {
				next_block: session.contract().deployment_block,
				events: Vec::new(),
			});

		let latest = session
			.ledger()
			.block_number()
			.await
			.map_err(ReplayError::Ledger)?;

		if checkpoint.next_block > latest {
			tracing::debug!(cursor = checkpoint.next_block, latest, "Cursor up to date");
			return Ok(checkpoint.events);
		}

		let fresh = self
			.scan(session, kind, checkpoint.next_block, latest)
			.await?;
		tracing::debug!(
			from_block = checkpoint.next_block,
			to_block = latest,
			new_events = fresh.len(),
			"Advanced replay cursor"
		);

		checkpoint.events.extend(fresh);
		checkpoint.next_block = latest + 1;
		store
			.save(&key, &checkpoint)
			.await
			.map_err(ReplayError::Checkpoint)?;

		Ok(checkpoint.events)
	}

	/// Scans `[from, to]` in windows and decodes every log.
	async fn scan(
		&self,
		session: &Session,
		kind: EventKind,
		from: u64,
		to: u64,
	) -> Result<Vec<LedgerEvent>, ReplayError> {
		let mut events = Vec::new();
		if from > to {
			return Ok(events);
		}

		let mut start = from;
		loop {
			let end = start.saturating_add(self.max_block_range - 1).min(to);
			let query = LogQuery {
				address: session.contract().address,
				event_signature: signature_hash(kind),
				from_block: start,
				to_block: end,
			};

			let logs = session
				.ledger()
				.get_logs(&query)
				.await
				.map_err(ReplayError::Ledger)?;

			for log in &logs {
				if log.removed {
					tracing::debug!(tx_hash = ?log.transaction_hash, "Skipping removed log");
					continue;
				}
				events.push(decode_log(kind, log)?);
			}

			if end == to {
				break;
			}
			start = end + 1;
		}

		events.sort_by_key(|event| *event.provenance());
		tracing::debug!(from_block = from, to_block = to, count = events.len(), "Replayed events");
		Ok(events)
	}
}

fn provenance_of(log: &Log) -> Result<EventProvenance, ContractDecodeError> {
	Ok(EventProvenance {
		transaction_hash: log
			.transaction_hash
			.ok_or(ContractDecodeError::MissingLogField("transaction hash"))?,
		block_number: log
			.block_number
			.ok_or(ContractDecodeError::MissingLogField("block number"))?,
		log_index: log
			.log_index
			.ok_or(ContractDecodeError::MissingLogField("log index"))?,
	})
}

fn decode_log(kind: EventKind, log: &Log) -> Result<LedgerEvent, ContractDecodeError> {
	let provenance = provenance_of(log)?;
	let abi_error = |e: alloy_sol_types::Error| ContractDecodeError::Abi(e.to_string());

	match kind {
		EventKind::BidSubmitted => {
			let event = ITenderManagement::BidSubmitted::decode_log_data(log.data())
				.map_err(abi_error)?;
			Ok(LedgerEvent::BidSubmitted(Bid::from_event(event, provenance)))
		},
		EventKind::TenderApproved => {
			let event = ITenderManagement::TenderApproved::decode_log_data(log.data())
				.map_err(abi_error)?;
			Ok(LedgerEvent::TenderApproved(ApprovalRecord::from_event(
				event, provenance,
			)))
		},
	}
}

/// Extracts the bids from replayed events.
pub fn bids_of(events: Vec<LedgerEvent>) -> Vec<Bid> {
	events
		.into_iter()
		.filter_map(|event| match event {
			LedgerEvent::BidSubmitted(bid) => Some(bid),
			LedgerEvent::TenderApproved(_) => None,
		})
		.collect()
}

/// Extracts the approvals from replayed events.
pub fn approvals_of(events: Vec<LedgerEvent>) -> Vec<ApprovalRecord> {
	events
		.into_iter()
		.filter_map(|event| match event {
			LedgerEvent::TenderApproved(record) => Some(record),
			LedgerEvent::BidSubmitted(_) => None,
		})
		.collect()
}

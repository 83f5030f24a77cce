//! Event bus for engine lifecycle notifications.
//!
//! Sessions are invalidated by provider notifications that arrive outside any
//! call chain. Dependents that cache per-session state subscribe here to
//! learn when to drop it.

use alloy_primitives::{Address, B256};
use tender_types::TenderId;
use tokio::sync::broadcast;

/// Why a session was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationReason {
	AccountsChanged,
	ChainChanged { chain_id: u64 },
	Disconnected,
}

/// Kind of state-changing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
	CreateTender,
	SubmitBid,
	ApproveTender,
}

/// Events published by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
	SessionEstablished {
		chain_id: u64,
		account: Address,
	},
	SessionInvalidated {
		reason: InvalidationReason,
	},
	TransactionConfirmed {
		kind: CommandKind,
		tender_id: Option<TenderId>,
		hash: B256,
	},
}

/// Broadcast channel for [`EngineEvent`]s.
pub struct EventBus {
	sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
	/// Creates a new EventBus with the specified channel capacity.
	///
	/// Slow subscribers lose the oldest events once `capacity` is exceeded.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Having no subscribers is normal; the event is then dropped.
	pub fn publish(&self, event: EngineEvent) {
		if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
			tracing::trace!(?event, "No subscribers for engine event");
		}
	}
}

impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

//! Records materialized from the contract's event log.
//!
//! The contract exposes no query for bids or approvals, so both are rebuilt
//! by scanning `BidSubmitted` and `TenderApproved` logs. Each record keeps the
//! position of the log that produced it so later derivations can order them.

use crate::{TenderId, ValidationError};
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Where an event was emitted on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventProvenance {
	pub transaction_hash: B256,
	pub block_number: u64,
	pub log_index: u64,
}

impl EventProvenance {
	/// Ledger order key: block first, then position within the block.
	pub fn position(&self) -> (u64, u64) {
		(self.block_number, self.log_index)
	}
}

impl PartialOrd for EventProvenance {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for EventProvenance {
	fn cmp(&self, other: &Self) -> Ordering {
		self.position()
			.cmp(&other.position())
			.then_with(|| self.transaction_hash.cmp(&other.transaction_hash))
	}
}

/// A vendor's bid, as recorded by a `BidSubmitted` event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
	pub tender_id: TenderId,
	pub bidder: Address,
	pub amount: U256,
	/// Unix seconds, as supplied by the bidder. The contract accepts any
	/// `uint256`, so it is kept at full width.
	pub bid_date: U256,
	pub provenance: EventProvenance,
}

/// A vendor approval, as recorded by a `TenderApproved` event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalRecord {
	pub tender_id: TenderId,
	pub approved_vendor: Address,
	pub approved: bool,
	pub is_open: bool,
	pub provenance: EventProvenance,
}

/// Event kinds the engine replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
	BidSubmitted,
	TenderApproved,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventKind::BidSubmitted => "bid_submitted",
			EventKind::TenderApproved => "tender_approved",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Inclusive block range for a replay. `to = None` means the latest block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockRange {
	pub from: u64,
	pub to: Option<u64>,
}

impl BlockRange {
	/// Genesis to latest.
	pub fn full() -> Self {
		Self::default()
	}

	pub fn new(from: u64, to: Option<u64>) -> Result<Self, ValidationError> {
		if let Some(to) = to {
			if from > to {
				return Err(ValidationError::InvalidBlockRange { from, to });
			}
		}
		Ok(Self { from, to })
	}
}

impl fmt::Display for BlockRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.to {
			Some(to) => write!(f, "{}..={}", self.from, to),
			None => write!(f, "{}..=latest", self.from),
		}
	}
}

/// Sort direction for bid amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	#[default]
	Ascending,
	Descending,
}

impl FromStr for SortOrder {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"asc" | "ascending" => Ok(SortOrder::Ascending),
			"desc" | "descending" => Ok(SortOrder::Descending),
			_ => Err(ValidationError::InvalidSortOrder(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn provenance(block: u64, index: u64) -> EventProvenance {
		EventProvenance {
			transaction_hash: B256::ZERO,
			block_number: block,
			log_index: index,
		}
	}

	#[test]
	fn test_provenance_orders_by_block_then_log_index() {
		assert!(provenance(10, 5) < provenance(11, 0));
		assert!(provenance(10, 1) < provenance(10, 2));
		assert_eq!(provenance(3, 3).cmp(&provenance(3, 3)), Ordering::Equal);
	}

	#[test]
	fn test_block_range_validation() {
		assert!(BlockRange::new(10, Some(5)).is_err());
		assert_eq!(
			BlockRange::new(5, Some(10)).unwrap(),
			BlockRange {
				from: 5,
				to: Some(10)
			}
		);
		assert_eq!(BlockRange::full().to_string(), "0..=latest");
	}

	#[test]
	fn test_sort_order_parsing() {
		assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
		assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
		assert!("sideways".parse::<SortOrder>().is_err());
	}
}

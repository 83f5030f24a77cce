//! Builders for event-derived records.

use crate::{ApprovalRecord, Bid, EventProvenance, TenderId};
use alloy_primitives::{Address, B256, U256};

fn provenance_at(block_number: u64, log_index: u64) -> EventProvenance {
	let mut hash = [0u8; 32];
	hash[..8].copy_from_slice(&block_number.to_be_bytes());
	hash[8..16].copy_from_slice(&log_index.to_be_bytes());
	EventProvenance {
		transaction_hash: B256::from(hash),
		block_number,
		log_index,
	}
}

/// Builder for Bid records.
#[derive(Debug, Clone)]
pub struct BidBuilder {
	bid: Bid,
}

impl Default for BidBuilder {
	fn default() -> Self {
		Self {
			bid: Bid {
				tender_id: TenderId::from(1),
				bidder: Address::repeat_byte(0x22),
				amount: U256::from(100u64),
				bid_date: U256::from(1_800_000_000u64),
				provenance: provenance_at(100, 0),
			},
		}
	}
}

impl BidBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_tender(mut self, id: u64) -> Self {
		self.bid.tender_id = TenderId::from(id);
		self
	}

	pub fn with_bidder(mut self, bidder: Address) -> Self {
		self.bid.bidder = bidder;
		self
	}

	pub fn with_amount(mut self, amount: u64) -> Self {
		self.bid.amount = U256::from(amount);
		self
	}

	pub fn with_amount_u256(mut self, amount: U256) -> Self {
		self.bid.amount = amount;
		self
	}

	/// Places the bid's event at (`block_number`, `log_index`).
	pub fn at(mut self, block_number: u64, log_index: u64) -> Self {
		self.bid.provenance = provenance_at(block_number, log_index);
		self
	}

	pub fn build(self) -> Bid {
		self.bid
	}
}

/// Builder for ApprovalRecord records.
#[derive(Debug, Clone)]
pub struct ApprovalRecordBuilder {
	record: ApprovalRecord,
}

impl Default for ApprovalRecordBuilder {
	fn default() -> Self {
		Self {
			record: ApprovalRecord {
				tender_id: TenderId::from(1),
				approved_vendor: Address::repeat_byte(0x33),
				approved: true,
				is_open: false,
				provenance: provenance_at(200, 0),
			},
		}
	}
}

impl ApprovalRecordBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_tender(mut self, id: u64) -> Self {
		self.record.tender_id = TenderId::from(id);
		self
	}

	pub fn with_vendor(mut self, vendor: Address) -> Self {
		self.record.approved_vendor = vendor;
		self
	}

	/// Places the approval's event at (`block_number`, `log_index`).
	pub fn at(mut self, block_number: u64, log_index: u64) -> Self {
		self.record.provenance = provenance_at(block_number, log_index);
		self
	}

	pub fn build(self) -> ApprovalRecord {
		self.record
	}
}

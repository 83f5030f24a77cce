//! Tender records and the parameters used to issue new ones.
//!
//! A [`Tender`] is always a snapshot of what the contract last reported.
//! The client never mutates one and writes it back; state changes go through
//! the command operations and are observed on the next read.

use crate::validation::{MIN_TENDER_DETAILS_LEN, MIN_TENDER_NAME_LEN};
use crate::{ApprovalRecord, Bid, ValidationError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a tender as assigned by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderId(pub U256);

impl TenderId {
	pub fn as_u256(&self) -> U256 {
		self.0
	}
}

impl From<u64> for TenderId {
	fn from(value: u64) -> Self {
		Self(U256::from(value))
	}
}

impl From<U256> for TenderId {
	fn from(value: U256) -> Self {
		Self(value)
	}
}

impl fmt::Display for TenderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for TenderId {
	type Err = ValidationError;

	/// Accepts decimal or `0x`-prefixed hexadecimal.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		U256::from_str(s.trim())
			.map(Self)
			.map_err(|_| ValidationError::InvalidTenderId(s.to_string()))
	}
}

/// Procurement category of a tender.
///
/// The contract stores the category as a free-form string; only the values
/// below are issued by this engine and accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderType {
	Construction,
	Services,
	Supplies,
	Consulting,
	Other,
}

impl TenderType {
	pub fn as_str(&self) -> &'static str {
		match self {
			TenderType::Construction => "construction",
			TenderType::Services => "services",
			TenderType::Supplies => "supplies",
			TenderType::Consulting => "consulting",
			TenderType::Other => "other",
		}
	}

	pub fn all() -> [TenderType; 5] {
		[
			TenderType::Construction,
			TenderType::Services,
			TenderType::Supplies,
			TenderType::Consulting,
			TenderType::Other,
		]
	}
}

impl fmt::Display for TenderType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TenderType {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();
		TenderType::all()
			.into_iter()
			.find(|t| t.as_str() == normalized)
			.ok_or_else(|| ValidationError::UnknownTenderType(s.to_string()))
	}
}

/// Lifecycle phase of a tender as observed through its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenderPhase {
	/// Accepting bids.
	Open,
	/// No longer accepting bids, no vendor approved yet.
	ClosedForBidding,
	/// A vendor has been approved.
	Approved,
}

impl fmt::Display for TenderPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TenderPhase::Open => f.write_str("open"),
			TenderPhase::ClosedForBidding => f.write_str("closed-for-bidding"),
			TenderPhase::Approved => f.write_str("approved"),
		}
	}
}

/// A tender as last read from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
	pub tender_id: TenderId,
	pub tender_name: String,
	pub tender_type: TenderType,
	/// Unix seconds.
	pub bid_submission_deadline: u64,
	/// Unix seconds.
	pub contract_sign_deadline: u64,
	pub estimated_cost: U256,
	pub tender_details: String,
	pub is_open: bool,
	pub approved: bool,
}

impl Tender {
	/// Derives the lifecycle phase. `approved` dominates `is_open`.
	pub fn phase(&self) -> TenderPhase {
		if self.approved {
			TenderPhase::Approved
		} else if self.is_open {
			TenderPhase::Open
		} else {
			TenderPhase::ClosedForBidding
		}
	}
}

/// Parameters for issuing a new tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTender {
	pub tender_name: String,
	pub tender_type: TenderType,
	pub bid_submission_deadline: u64,
	pub contract_sign_deadline: u64,
	pub estimated_cost: U256,
	pub tender_details: String,
}

impl NewTender {
	/// Checks the parameters against `now` (Unix seconds).
	///
	/// The bid deadline is deliberately not compared with the sign deadline;
	/// the contract is the authority on that relationship.
	pub fn validate(&self, now: u64) -> Result<(), ValidationError> {
		if self.estimated_cost.is_zero() {
			return Err(ValidationError::NonPositiveCost);
		}
		if self.contract_sign_deadline <= now {
			return Err(ValidationError::SignDeadlineNotInFuture {
				deadline: self.contract_sign_deadline,
				now,
			});
		}
		if self.tender_name.trim().chars().count() < MIN_TENDER_NAME_LEN {
			return Err(ValidationError::NameTooShort {
				min: MIN_TENDER_NAME_LEN,
			});
		}
		if self.tender_details.trim().chars().count() < MIN_TENDER_DETAILS_LEN {
			return Err(ValidationError::DetailsTooShort {
				min: MIN_TENDER_DETAILS_LEN,
			});
		}
		Ok(())
	}
}

/// Everything the engine knows about one tender: the snapshot, its bids in
/// the requested order and the authoritative approval, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderDetail {
	pub tender: Tender,
	pub phase: TenderPhase,
	pub bids: Vec<Bid>,
	pub approval: Option<ApprovalRecord>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::builders::{NewTenderBuilder, TenderBuilder};

	#[test]
	fn test_tender_id_parsing() {
		assert_eq!("42".parse::<TenderId>().unwrap(), TenderId::from(42));
		assert_eq!("0x2a".parse::<TenderId>().unwrap(), TenderId::from(42));
		assert!(matches!(
			"forty-two".parse::<TenderId>(),
			Err(ValidationError::InvalidTenderId(_))
		));
		assert_eq!(TenderId::from(7).to_string(), "7");
	}

	#[test]
	fn test_tender_type_round_trip_and_case() {
		for t in TenderType::all() {
			assert_eq!(t.as_str().parse::<TenderType>().unwrap(), t);
		}
		assert_eq!(
			" Construction ".parse::<TenderType>().unwrap(),
			TenderType::Construction
		);
		assert!("demolition".parse::<TenderType>().is_err());
	}

	#[test]
	fn test_phase_derivation() {
		let open = TenderBuilder::new().with_flags(true, false).build();
		let closed = TenderBuilder::new().with_flags(false, false).build();
		let approved = TenderBuilder::new().with_flags(false, true).build();
		let approved_still_open = TenderBuilder::new().with_flags(true, true).build();

		assert_eq!(open.phase(), TenderPhase::Open);
		assert_eq!(closed.phase(), TenderPhase::ClosedForBidding);
		assert_eq!(approved.phase(), TenderPhase::Approved);
		assert_eq!(approved_still_open.phase(), TenderPhase::Approved);
	}

	#[test]
	fn test_new_tender_rejects_zero_cost() {
		let params = NewTenderBuilder::new().with_cost(U256::ZERO).build();
		assert_eq!(params.validate(1_000), Err(ValidationError::NonPositiveCost));
	}

	#[test]
	fn test_new_tender_rejects_past_sign_deadline() {
		let params = NewTenderBuilder::new()
			.with_deadlines(500, 1_000)
			.build();
		assert_eq!(
			params.validate(1_000),
			Err(ValidationError::SignDeadlineNotInFuture {
				deadline: 1_000,
				now: 1_000
			})
		);
	}

	#[test]
	fn test_new_tender_allows_bid_deadline_after_sign_deadline() {
		let params = NewTenderBuilder::new()
			.with_deadlines(5_000, 2_000)
			.build();
		assert!(params.validate(1_000).is_ok());
	}

	#[test]
	fn test_new_tender_text_lengths() {
		let short_name = NewTenderBuilder::new().with_name("ab").build();
		assert_eq!(
			short_name.validate(0),
			Err(ValidationError::NameTooShort { min: 3 })
		);

		let short_details = NewTenderBuilder::new().with_details("too short").build();
		assert_eq!(
			short_details.validate(0),
			Err(ValidationError::DetailsTooShort { min: 10 })
		);
	}
}

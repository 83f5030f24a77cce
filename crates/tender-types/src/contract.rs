//! ABI bindings for the tender management contract.
//!
//! The contract surface is fixed: five methods and two events. Conversions
//! from the raw ABI values into domain records live here. Tender deadlines
//! are narrowed to `u64`; event payloads are carried at their ABI width.
//! Categories this engine does not issue are read as [`TenderType::Other`].

use crate::{
	ApprovalRecord, Bid, EventProvenance, NewTender, Tender, TenderId, TenderType,
};
use alloy_primitives::U256;
use alloy_sol_types::sol;
use thiserror::Error;

sol! {
	/// Tender as returned by `getAllTenderDetails`.
	#[sol(all_derives)]
	#[derive(Debug, PartialEq, Eq, Hash)]
	struct TenderRecord {
		uint256 tenderId;
		string tenderName;
		string tenderType;
		uint256 bidSubmissionDeadline;
		uint256 contractSignDeadline;
		uint256 estimatedCost;
		string tenderDetails;
		bool isOpen;
		bool approved;
	}

	#[sol(all_derives)]
	interface ITenderManagement {
		function isAdmin(address account) external view returns (bool);

		function createTender(
			string tenderName,
			string tenderType,
			uint256 bidSubmissionDeadline,
			uint256 contractSignDeadline,
			uint256 estimatedCost,
			string tenderDetails
		) external;

		function submitBid(uint256 tenderId, uint256 amount, uint256 bidDate, address bidder) external;

		function approveTender(uint256 tenderId, address vendorId) external;

		function getAllTenderDetails() external view returns (TenderRecord[] memory);

		event BidSubmitted(uint256 tenderId, address bidder, uint256 amount, uint256 bidDate);

		event TenderApproved(uint256 tenderId, address vendorId, bool approved, bool isOpen);
	}
}

/// Errors converting contract values into domain records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractDecodeError {
	#[error("ABI decode failed: {0}")]
	Abi(String),
	#[error("Field '{field}' out of range: {value}")]
	OutOfRange { field: &'static str, value: U256 },
	#[error("Log is missing {0}")]
	MissingLogField(&'static str),
}

fn to_timestamp(field: &'static str, value: U256) -> Result<u64, ContractDecodeError> {
	u64::try_from(value).map_err(|_| ContractDecodeError::OutOfRange { field, value })
}

impl TryFrom<TenderRecord> for Tender {
	type Error = ContractDecodeError;

	fn try_from(record: TenderRecord) -> Result<Self, Self::Error> {
		let tender_type = record.tenderType.parse::<TenderType>().unwrap_or_else(|_| {
			tracing::warn!(
				tender_id = %record.tenderId,
				tender_type = %record.tenderType,
				"Unrecognized tender type, reading as other"
			);
			TenderType::Other
		});

		Ok(Tender {
			tender_id: TenderId(record.tenderId),
			tender_name: record.tenderName,
			tender_type,
			bid_submission_deadline: to_timestamp(
				"bidSubmissionDeadline",
				record.bidSubmissionDeadline,
			)?,
			contract_sign_deadline: to_timestamp(
				"contractSignDeadline",
				record.contractSignDeadline,
			)?,
			estimated_cost: record.estimatedCost,
			tender_details: record.tenderDetails,
			is_open: record.isOpen,
			approved: record.approved,
		})
	}
}

impl From<&NewTender> for ITenderManagement::createTenderCall {
	fn from(params: &NewTender) -> Self {
		Self {
			tenderName: params.tender_name.clone(),
			tenderType: params.tender_type.as_str().to_string(),
			bidSubmissionDeadline: U256::from(params.bid_submission_deadline),
			contractSignDeadline: U256::from(params.contract_sign_deadline),
			estimatedCost: params.estimated_cost,
			tenderDetails: params.tender_details.clone(),
		}
	}
}

impl Bid {
	pub fn from_event(event: ITenderManagement::BidSubmitted, provenance: EventProvenance) -> Self {
		Bid {
			tender_id: TenderId(event.tenderId),
			bidder: event.bidder,
			amount: event.amount,
			bid_date: event.bidDate,
			provenance,
		}
	}
}

impl ApprovalRecord {
	pub fn from_event(
		event: ITenderManagement::TenderApproved,
		provenance: EventProvenance,
	) -> Self {
		ApprovalRecord {
			tender_id: TenderId(event.tenderId),
			approved_vendor: event.vendorId,
			approved: event.approved,
			is_open: event.isOpen,
			provenance,
		}
	}
}

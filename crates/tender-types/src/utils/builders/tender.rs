//! Builders for tenders and tender creation parameters.

use crate::{NewTender, Tender, TenderId, TenderType};
use alloy_primitives::U256;

/// Builder for Tender snapshots.
#[derive(Debug, Clone)]
pub struct TenderBuilder {
	tender: Tender,
}

impl Default for TenderBuilder {
	fn default() -> Self {
		Self {
			tender: Tender {
				tender_id: TenderId::from(1),
				tender_name: "Municipal bridge repair".to_string(),
				tender_type: TenderType::Construction,
				bid_submission_deadline: 1_900_000_000,
				contract_sign_deadline: 2_000_000_000,
				estimated_cost: U256::from(1_000_000u64),
				tender_details: "Structural repair of the east span".to_string(),
				is_open: true,
				approved: false,
			},
		}
	}
}

impl TenderBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_id(mut self, id: u64) -> Self {
		self.tender.tender_id = TenderId::from(id);
		self
	}

	pub fn with_name(mut self, name: &str) -> Self {
		self.tender.tender_name = name.to_string();
		self
	}

	pub fn with_type(mut self, tender_type: TenderType) -> Self {
		self.tender.tender_type = tender_type;
		self
	}

	/// Sets `is_open` and `approved`.
	pub fn with_flags(mut self, is_open: bool, approved: bool) -> Self {
		self.tender.is_open = is_open;
		self.tender.approved = approved;
		self
	}

	pub fn build(self) -> Tender {
		self.tender
	}
}

/// Builder for NewTender parameters. Defaults pass validation for any
/// `now` before 2033.
#[derive(Debug, Clone)]
pub struct NewTenderBuilder {
	params: NewTender,
}

impl Default for NewTenderBuilder {
	fn default() -> Self {
		Self {
			params: NewTender {
				tender_name: "Office supplies 2026".to_string(),
				tender_type: TenderType::Supplies,
				bid_submission_deadline: 1_900_000_000,
				contract_sign_deadline: 2_000_000_000,
				estimated_cost: U256::from(50_000u64),
				tender_details: "Paper, toner and stationery for all offices".to_string(),
			},
		}
	}
}

impl NewTenderBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_name(mut self, name: &str) -> Self {
		self.params.tender_name = name.to_string();
		self
	}

	pub fn with_details(mut self, details: &str) -> Self {
		self.params.tender_details = details.to_string();
		self
	}

	pub fn with_cost(mut self, cost: U256) -> Self {
		self.params.estimated_cost = cost;
		self
	}

	/// Sets the bid submission and contract sign deadlines.
	pub fn with_deadlines(mut self, bid_deadline: u64, sign_deadline: u64) -> Self {
		self.params.bid_submission_deadline = bid_deadline;
		self.params.contract_sign_deadline = sign_deadline;
		self
	}

	pub fn build(self) -> NewTender {
		self.params
	}
}

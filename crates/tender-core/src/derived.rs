//! Views derived from replayed events.
//!
//! Pure functions: no ledger access, no state. Callers replay first and pass
//! the events in ledger order.

use tender_types::{ApprovalRecord, Bid, SortOrder, Tender, TenderDetail, TenderId};

/// Bids for `tender_id`, sorted by amount.
///
/// The sort is stable, so bids with equal amounts keep their ledger order in
/// both directions.
pub fn bids_for_tender(bids: &[Bid], tender_id: TenderId, order: SortOrder) -> Vec<Bid> {
	let mut matching: Vec<Bid> = bids
		.iter()
		.filter(|bid| bid.tender_id == tender_id)
		.cloned()
		.collect();

	match order {
		SortOrder::Ascending => matching.sort_by(|a, b| a.amount.cmp(&b.amount)),
		SortOrder::Descending => matching.sort_by(|a, b| b.amount.cmp(&a.amount)),
	}
	matching
}

/// The approval that currently holds for `tender_id`: the latest one in
/// ledger order. Records sharing a position resolve to the later one in
/// `approvals`.
pub fn approval_for_tender(
	approvals: &[ApprovalRecord],
	tender_id: TenderId,
) -> Option<ApprovalRecord> {
	approvals
		.iter()
		.enumerate()
		.filter(|(_, record)| record.tender_id == tender_id)
		.max_by_key(|(index, record)| (record.provenance.position(), *index))
		.map(|(_, record)| record.clone())
}

/// Combines a tender snapshot with its bids and approval.
pub fn tender_detail(
	tender: Tender,
	bids: &[Bid],
	approvals: &[ApprovalRecord],
	order: SortOrder,
) -> TenderDetail {
	let tender_id = tender.tender_id;
	TenderDetail {
		phase: tender.phase(),
		bids: bids_for_tender(bids, tender_id, order),
		approval: approval_for_tender(approvals, tender_id),
		tender,
	}
}

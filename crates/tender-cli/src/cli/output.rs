//! Terminal output.
//!
//! Human-readable output goes through [`Display`]; with `--json` every result
//! is printed as pretty JSON instead.

use super::parse::{format_bid_date, format_timestamp};
use colored::Colorize;
use serde::Serialize;
use tender_types::{
	format_address, short_hash, ApprovalRecord, Bid, Tender, TenderDetail, TenderPhase,
	TransactionReceipt,
};

/// Terminal display helpers.
pub struct Display;

impl Display {
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Writes to stderr.
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	pub fn kv(key: &str, value: &str) {
		println!("  {:<22} {}", format!("{key}:").dimmed(), value);
	}
}

/// Chooses between JSON and formatted output.
#[derive(Debug, Clone, Copy)]
pub struct Output {
	json: bool,
}

impl Output {
	pub fn new(json: bool) -> Self {
		Self { json }
	}

	/// Prints `value` as JSON when in JSON mode. Returns whether it did.
	fn emit_json<T: Serialize>(&self, value: &T) -> anyhow::Result<bool> {
		if self.json {
			println!("{}", serde_json::to_string_pretty(value)?);
		}
		Ok(self.json)
	}

	pub fn receipt(&self, action: &str, receipt: &TransactionReceipt) -> anyhow::Result<()> {
		if self.emit_json(receipt)? {
			return Ok(());
		}
		Display::success(action);
		Display::kv("Transaction", &receipt.hash.to_string());
		Display::kv("Block", &receipt.block_number.to_string());
		Display::kv("Gas used", &receipt.gas_used.to_string());
		Ok(())
	}

	pub fn tenders(&self, tenders: &[Tender]) -> anyhow::Result<()> {
		if self.emit_json(&tenders)? {
			return Ok(());
		}
		if tenders.is_empty() {
			Display::info("No tenders on this contract");
			return Ok(());
		}

		Display::header(&format!("Tenders ({})", tenders.len()));
		println!(
			"  {:<6} {:<28} {:<12} {:<20} {:>16}  {}",
			"ID".bold(),
			"Name".bold(),
			"Type".bold(),
			"Bid deadline".bold(),
			"Est. cost".bold(),
			"Phase".bold()
		);
		for tender in tenders {
			println!(
				"  {:<6} {:<28} {:<12} {:<20} {:>16}  {}",
				tender.tender_id.to_string(),
				truncate_name(&tender.tender_name, 28),
				tender.tender_type.as_str(),
				format_timestamp(tender.bid_submission_deadline),
				tender.estimated_cost.to_string(),
				phase_label(tender.phase())
			);
		}
		Ok(())
	}

	pub fn bids(&self, bids: &[Bid]) -> anyhow::Result<()> {
		if self.emit_json(&bids)? {
			return Ok(());
		}
		if bids.is_empty() {
			Display::info("No bids");
			return Ok(());
		}
		print_bids(bids);
		Ok(())
	}

	pub fn approval(&self, approval: Option<&ApprovalRecord>) -> anyhow::Result<()> {
		if self.emit_json(&approval)? {
			return Ok(());
		}
		match approval {
			Some(record) => print_approval(record),
			None => Display::info("No vendor approved"),
		}
		Ok(())
	}

	pub fn detail(&self, detail: &TenderDetail) -> anyhow::Result<()> {
		if self.emit_json(detail)? {
			return Ok(());
		}
		print_detail(detail);
		Ok(())
	}

	pub fn dashboard(&self, details: &[TenderDetail]) -> anyhow::Result<()> {
		if self.emit_json(&details)? {
			return Ok(());
		}
		if details.is_empty() {
			Display::info("No tenders on this contract");
			return Ok(());
		}
		for detail in details {
			print_detail(detail);
		}
		Ok(())
	}

	/// Key/value summary, e.g. for `connect`.
	pub fn summary<T: Serialize>(&self, title: &str, value: &T, rows: &[(&str, String)]) -> anyhow::Result<()> {
		if self.emit_json(value)? {
			return Ok(());
		}
		Display::header(title);
		for (key, value) in rows {
			Display::kv(key, value);
		}
		Ok(())
	}
}

fn phase_label(phase: TenderPhase) -> String {
	match phase {
		TenderPhase::Open => phase.to_string().green().to_string(),
		TenderPhase::ClosedForBidding => phase.to_string().yellow().to_string(),
		TenderPhase::Approved => phase.to_string().blue().to_string(),
	}
}

fn truncate_name(name: &str, width: usize) -> String {
	if name.chars().count() <= width {
		name.to_string()
	} else {
		let kept: String = name.chars().take(width - 2).collect();
		format!("{kept}..")
	}
}

fn print_bids(bids: &[Bid]) {
	println!(
		"  {:<16} {:>20}  {:<20}  {}",
		"Bidder".bold(),
		"Amount".bold(),
		"Bid date".bold(),
		"Block".bold()
	);
	for bid in bids {
		println!(
			"  {:<16} {:>20}  {:<20}  {} ({})",
			format_address(&bid.bidder),
			bid.amount.to_string(),
			format_bid_date(bid.bid_date),
			bid.provenance.block_number,
			short_hash(&bid.provenance.transaction_hash)
		);
	}
}

fn print_approval(record: &ApprovalRecord) {
	Display::kv("Approved vendor", &record.approved_vendor.to_string());
	Display::kv("Approved", &record.approved.to_string());
	Display::kv("Open", &record.is_open.to_string());
	Display::kv(
		"Recorded in",
		&format!(
			"block {} ({})",
			record.provenance.block_number,
			short_hash(&record.provenance.transaction_hash)
		),
	);
}

fn print_detail(detail: &TenderDetail) {
	let tender = &detail.tender;
	Display::header(&format!("Tender {}: {}", tender.tender_id, tender.tender_name));
	Display::kv("Type", tender.tender_type.as_str());
	Display::kv("Phase", &phase_label(detail.phase));
	Display::kv("Estimated cost", &tender.estimated_cost.to_string());
	Display::kv("Bid deadline", &format_timestamp(tender.bid_submission_deadline));
	Display::kv("Contract sign deadline", &format_timestamp(tender.contract_sign_deadline));
	Display::kv("Details", &tender.tender_details);

	println!();
	if detail.bids.is_empty() {
		Display::info("No bids");
	} else {
		print_bids(&detail.bids);
	}

	println!();
	match &detail.approval {
		Some(record) => print_approval(record),
		None if tender.approved => {
			Display::warning("Tender is approved but no approval event was found in the replayed range")
		},
		None => Display::info("No vendor approved"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_name() {
		assert_eq!(truncate_name("Short", 28), "Short");
		assert_eq!(truncate_name("Municipal bridge repair", 10), "Municipa..");
		assert_eq!(truncate_name("ÅÅÅÅÅÅ", 4), "ÅÅ..");
	}
}

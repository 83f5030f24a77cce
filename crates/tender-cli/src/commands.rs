//! Command handlers.

use crate::cli::output::{Display, Output};
use crate::cli::{Commands, CreateArgs};
use anyhow::Result;
use serde::Serialize;
use tender_core::TenderEngine;
use tender_types::{current_timestamp, BlockRange, NewTender, Role};

#[derive(Serialize)]
struct ConnectionSummary {
	account: String,
	chain_id: u64,
	contract: String,
	role: Role,
}

/// Connects and runs `command`.
pub async fn run(engine: &TenderEngine, command: Commands, output: Output) -> Result<()> {
	if let Some(hint) = engine.account_hint().await {
		tracing::debug!(account = %hint.account, chain_id = hint.chain_id, "Last connected account");
	}
	engine.connect().await?;

	match command {
		Commands::Connect => connect(engine, output).await,
		Commands::Role => {
			let role = engine.resolve_role().await?;
			output.summary("Role", &role, &[("Role", role.to_string())])
		},
		Commands::Tenders => output.tenders(&engine.list_tenders().await?),
		Commands::Create(args) => create(engine, args, output).await,
		Commands::Bid {
			tender,
			amount,
			timestamp,
		} => {
			let bid_date = timestamp.unwrap_or_else(current_timestamp);
			let receipt = engine.submit_bid(tender, amount, bid_date).await?;
			output.receipt(&format!("Bid of {amount} submitted on tender {tender}"), &receipt)
		},
		Commands::Approve { tender, vendor } => {
			let receipt = engine.approve_tender(tender, vendor).await?;
			output.receipt(&format!("Vendor {vendor} approved for tender {tender}"), &receipt)
		},
		Commands::Bids {
			tender,
			order,
			from_block,
			to_block,
		} => {
			let range = BlockRange::new(from_block.unwrap_or_default(), to_block)?;
			let bids = engine.bids_for_tender(tender, order, Some(range)).await?;
			output.bids(&bids)
		},
		Commands::Approval { tender } => {
			let approval = engine.approval_for_tender(tender).await?;
			output.approval(approval.as_ref())
		},
		Commands::Show { tender, order } => output.detail(&engine.tender_detail(tender, order).await?),
		Commands::Dashboard { order } => output.dashboard(&engine.dashboard(order).await?),
	}
}

async fn connect(engine: &TenderEngine, output: Output) -> Result<()> {
	let session = engine.connect().await?;
	let role = engine.resolve_role().await?;

	let summary = ConnectionSummary {
		account: session.account().to_string(),
		chain_id: session.chain_id(),
		contract: session.contract().address.to_string(),
		role,
	};
	output.summary(
		"Connected",
		&summary,
		&[
			("Account", summary.account.clone()),
			("Network", summary.chain_id.to_string()),
			("Contract", summary.contract.clone()),
			("Role", summary.role.to_string()),
		],
	)
}

async fn create(engine: &TenderEngine, args: CreateArgs, output: Output) -> Result<()> {
	let params = NewTender {
		tender_name: args.name,
		tender_type: args.tender_type,
		bid_submission_deadline: args.bid_deadline,
		contract_sign_deadline: args.sign_deadline,
		estimated_cost: args.cost,
		tender_details: args.details,
	};

	if params.bid_submission_deadline >= params.contract_sign_deadline {
		Display::warning("Bid deadline is not before the contract sign deadline");
	}

	let receipt = engine.create_tender(&params).await?;
	output.receipt(&format!("Tender '{}' created", params.tender_name), &receipt)
}

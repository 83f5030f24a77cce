//! Command-line interface definitions.

pub mod output;
pub mod parse;

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use tender_types::{SortOrder, TenderId, TenderType};

/// Ledger-backed tender lifecycle client.
#[derive(Parser, Debug)]
#[command(name = "tender")]
#[command(about = "Issue tenders, submit bids and approve vendors on a tender contract")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Configuration file
	#[arg(global = true, long, env = "TENDER_CONFIG", default_value = "config/tender.toml")]
	pub config: String,

	/// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
	#[arg(global = true, long, default_value = "warn")]
	pub log_level: String,

	/// Print results as JSON
	#[arg(global = true, long)]
	pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Connect and print account, network and role
	Connect,

	/// Print the role of the configured account
	Role,

	/// List every tender on the contract
	Tenders,

	/// Issue a new tender (authority only)
	Create(CreateArgs),

	/// Submit a bid on a tender
	Bid {
		#[arg(long)]
		tender: TenderId,

		/// Bid amount as a decimal integer
		#[arg(long, value_parser = parse::parse_amount)]
		amount: U256,

		/// Bid date, Unix seconds or RFC 3339. Defaults to now.
		#[arg(long, value_parser = parse::parse_timestamp)]
		timestamp: Option<u64>,
	},

	/// Approve a vendor for a tender (authority only)
	Approve {
		#[arg(long)]
		tender: TenderId,

		#[arg(long)]
		vendor: Address,
	},

	/// List the bids on a tender, sorted by amount
	Bids {
		#[arg(long)]
		tender: TenderId,

		/// asc or desc
		#[arg(long, default_value = "asc")]
		order: SortOrder,

		#[arg(long)]
		from_block: Option<u64>,

		#[arg(long)]
		to_block: Option<u64>,
	},

	/// Show the approved vendor of a tender
	Approval {
		#[arg(long)]
		tender: TenderId,
	},

	/// Show a tender with its bids and approval
	Show {
		#[arg(long)]
		tender: TenderId,

		#[arg(long, default_value = "asc")]
		order: SortOrder,
	},

	/// Every tender with its bids and approval (authority only)
	Dashboard {
		#[arg(long, default_value = "desc")]
		order: SortOrder,
	},
}

#[derive(Args, Debug)]
pub struct CreateArgs {
	#[arg(long)]
	pub name: String,

	/// construction, services, supplies, consulting or other
	#[arg(long = "type")]
	pub tender_type: TenderType,

	/// Unix seconds or RFC 3339
	#[arg(long, value_parser = parse::parse_timestamp)]
	pub bid_deadline: u64,

	/// Unix seconds or RFC 3339
	#[arg(long, value_parser = parse::parse_timestamp)]
	pub sign_deadline: u64,

	/// Estimated cost as a decimal integer
	#[arg(long, value_parser = parse::parse_amount)]
	pub cost: U256,

	#[arg(long)]
	pub details: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parse_create() {
		let cli = Cli::try_parse_from([
			"tender",
			"create",
			"--name",
			"Road resurfacing",
			"--type",
			"Construction",
			"--bid-deadline",
			"2027-01-15T08:00:00Z",
			"--sign-deadline",
			"1900000000",
			"--cost",
			"250_000",
			"--details",
			"Resurfacing of route 9",
		])
		.unwrap();

		match cli.command {
			Commands::Create(args) => {
				assert_eq!(args.tender_type, TenderType::Construction);
				assert_eq!(args.bid_deadline, 1_800_000_000);
				assert_eq!(args.sign_deadline, 1_900_000_000);
				assert_eq!(args.cost, U256::from(250_000u64));
			},
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_parse_bids_with_range_and_order() {
		let cli = Cli::try_parse_from([
			"tender",
			"--config",
			"local.toml",
			"bids",
			"--tender",
			"0x2a",
			"--order",
			"desc",
			"--from-block",
			"100",
		])
		.unwrap();

		assert_eq!(cli.config, "local.toml");
		match cli.command {
			Commands::Bids {
				tender,
				order,
				from_block,
				to_block,
			} => {
				assert_eq!(tender, TenderId::from(42));
				assert_eq!(order, SortOrder::Descending);
				assert_eq!(from_block, Some(100));
				assert_eq!(to_block, None);
			},
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_invalid_arguments_rejected() {
		assert!(Cli::try_parse_from(["tender", "bid", "--tender", "1", "--amount", "-3"]).is_err());
		assert!(Cli::try_parse_from([
			"tender", "approve", "--tender", "1", "--vendor", "not-an-address"
		])
		.is_err());
		assert!(Cli::try_parse_from(["tender", "show", "--tender", "1", "--order", "up"]).is_err());
	}
}

//! State-changing contract operations.
//!
//! Every command follows the same issue-and-confirm path: validate locally,
//! encode the call, send it from the session account and wait for the
//! receipt. Nothing is retried. A failure reports the stage it happened at,
//! and once a transaction was broadcast the error carries its hash so the
//! caller can look it up before deciding to resend.

use crate::error::{CommandError, SubmissionError, SubmissionStage};
use crate::session::Session;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use tender_types::{
	current_timestamp, ITenderManagement, NewTender, TenderId, Transaction, TransactionReceipt,
	ValidationError,
};

const BPS_DENOMINATOR: u64 = 10_000;

/// Issues `createTender`, `submitBid` and `approveTender`.
#[derive(Debug, Clone)]
pub struct CommandIssuer {
	/// Extra gas on top of the estimate for bids, in basis points.
	gas_buffer_bps: u32,
	now: fn() -> u64,
}

impl Default for CommandIssuer {
	fn default() -> Self {
		Self::new(0)
	}
}

impl CommandIssuer {
	pub fn new(gas_buffer_bps: u32) -> Self {
		Self {
			gas_buffer_bps,
			now: current_timestamp,
		}
	}

	/// Replaces the clock used for deadline validation.
	pub fn with_clock(mut self, now: fn() -> u64) -> Self {
		self.now = now;
		self
	}

	/// Validates and submits a new tender.
	#[tracing::instrument(skip_all, fields(name = %params.tender_name, tender_type = %params.tender_type))]
	pub async fn create_tender(
		&self,
		session: &Session,
		params: &NewTender,
	) -> Result<TransactionReceipt, CommandError> {
		params.validate((self.now)())?;

		let call = ITenderManagement::createTenderCall::from(params);
		let tx = session.contract_call(call.abi_encode());
		let receipt = self.submit(session, tx).await?;

		tracing::info!(tx_hash = %receipt.hash, "Tender created");
		Ok(receipt)
	}

	/// Submits a bid from the session account.
	///
	/// Gas is estimated first and the estimate, plus the configured buffer, is
	/// sent as the explicit gas limit. If estimation fails nothing is sent.
	#[tracing::instrument(skip_all, fields(tender_id = %tender_id, amount = %amount))]
	pub async fn submit_bid(
		&self,
		session: &Session,
		tender_id: TenderId,
		amount: U256,
		bid_date: u64,
	) -> Result<TransactionReceipt, CommandError> {
		if amount.is_zero() {
			return Err(ValidationError::NonPositiveAmount.into());
		}

		let call = ITenderManagement::submitBidCall {
			tenderId: tender_id.as_u256(),
			amount,
			bidDate: U256::from(bid_date),
			bidder: session.account(),
		};
		let tx = session.contract_call(call.abi_encode());

		let estimate = session
			.ledger()
			.estimate_gas(&tx, session.account())
			.await
			.map_err(|e| {
				tracing::warn!(error = %e, "Gas estimation failed, bid not submitted");
				SubmissionError::from_ledger(SubmissionStage::GasEstimation, e)
			})?;

		let gas_limit = self.apply_buffer(estimate);
		tracing::debug!(estimate, gas_limit, "Gas budget for bid");

		let receipt = self.submit(session, tx.with_gas_limit(gas_limit)).await?;
		tracing::info!(tx_hash = %receipt.hash, "Bid submitted");
		Ok(receipt)
	}

	/// Approves `vendor` for a tender.
	///
	/// Only the contract decides whether the caller may approve; a rejection
	/// comes back as a [`SubmissionError`] with the node's detail attached.
	#[tracing::instrument(skip_all, fields(tender_id = %tender_id, vendor = %vendor))]
	pub async fn approve_tender(
		&self,
		session: &Session,
		tender_id: TenderId,
		vendor: Address,
	) -> Result<TransactionReceipt, CommandError> {
		let call = ITenderManagement::approveTenderCall {
			tenderId: tender_id.as_u256(),
			vendorId: vendor,
		};
		let tx = session.contract_call(call.abi_encode());
		let receipt = self.submit(session, tx).await?;

		tracing::info!(tx_hash = %receipt.hash, "Tender approved");
		Ok(receipt)
	}

	fn apply_buffer(&self, estimate: u64) -> u64 {
		let buffer = estimate.saturating_mul(u64::from(self.gas_buffer_bps)) / BPS_DENOMINATOR;
		estimate.saturating_add(buffer)
	}

	async fn submit(
		&self,
		session: &Session,
		tx: Transaction,
	) -> Result<TransactionReceipt, SubmissionError> {
		let ledger = session.ledger();

		let hash = ledger
			.send_transaction(tx, session.account())
			.await
			.map_err(|e| SubmissionError::from_ledger(SubmissionStage::Broadcast, e))?;

		let receipt = ledger.wait_for_receipt(hash).await.map_err(|e| {
			tracing::warn!(tx_hash = %hash, error = %e, "No receipt for transaction");
			SubmissionError::from_ledger(SubmissionStage::Confirmation, e).with_hash(hash)
		})?;

		if !receipt.success {
			tracing::warn!(tx_hash = %hash, block = receipt.block_number, "Transaction reverted");
			return Err(SubmissionError::reverted(hash));
		}

		Ok(receipt)
	}
}

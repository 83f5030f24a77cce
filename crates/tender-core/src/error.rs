//! Error taxonomy of the engine.
//!
//! Each component returns its own error type. [`EngineError`] groups them by
//! how a caller should react: connectivity errors end the session,
//! authorization and validation errors are final, submission errors carry the
//! stage that failed, and query or replay errors are safe to retry.

use alloy_primitives::B256;
use std::fmt;
use tender_account::AccountError;
use tender_ledger::LedgerError;
use tender_storage::StorageError;
use tender_types::{ContractDecodeError, Role, TenderId, ValidationError};
use thiserror::Error;

/// Errors establishing or using a session.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The ledger endpoint could not be reached.
	#[error("No ledger provider available: {0}")]
	NoProvider(String),
	/// The endpoint is on the wrong chain, or the chain has no contract deployment.
	#[error("Network mismatch on chain {chain_id}: {reason}")]
	NetworkMismatch { chain_id: u64, reason: String },
	/// The account source could not supply an account.
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// An operation needed a session and none is established.
	#[error("Not connected")]
	NotConnected,
}

/// A role check failed because the caller holds a different role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Requires {required} role, caller is {actual}")]
pub struct AuthorizationError {
	pub required: Role,
	pub actual: Role,
}

/// Errors resolving or checking the caller's role.
#[derive(Debug, Error)]
pub enum RoleError {
	/// The role query failed; the role is unknown.
	#[error("Role query failed: {0}")]
	Query(#[source] LedgerError),
	/// The role query returned data that could not be decoded; the role is unknown.
	#[error("Role query returned undecodable data: {0}")]
	Decode(String),
	/// The role is known and insufficient.
	#[error(transparent)]
	Unauthorized(#[from] AuthorizationError),
}

/// Stage of a state-changing operation at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
	GasEstimation,
	Broadcast,
	Confirmation,
	Reverted,
}

impl fmt::Display for SubmissionStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubmissionStage::GasEstimation => f.write_str("gas estimation"),
			SubmissionStage::Broadcast => f.write_str("broadcast"),
			SubmissionStage::Confirmation => f.write_str("confirmation"),
			SubmissionStage::Reverted => f.write_str("execution"),
		}
	}
}

/// A transaction was rejected, could not be sent, or reverted.
#[derive(Debug, Clone, Error)]
#[error("Submission failed during {stage}: {cause}{}", .remote_detail.as_ref().map(|d| format!(" [{d}]")).unwrap_or_default())]
pub struct SubmissionError {
	pub stage: SubmissionStage,
	pub cause: String,
	/// Error detail returned by the node, e.g. a revert reason.
	pub remote_detail: Option<String>,
	/// Set once the transaction was broadcast.
	pub transaction_hash: Option<B256>,
}

impl SubmissionError {
	pub fn from_ledger(stage: SubmissionStage, err: LedgerError) -> Self {
		Self {
			stage,
			remote_detail: err.remote_detail(),
			cause: err.to_string(),
			transaction_hash: None,
		}
	}

	pub fn reverted(hash: B256) -> Self {
		Self {
			stage: SubmissionStage::Reverted,
			cause: format!("transaction {hash} reverted"),
			remote_detail: None,
			transaction_hash: Some(hash),
		}
	}

	pub fn with_hash(mut self, hash: B256) -> Self {
		self.transaction_hash = Some(hash);
		self
	}
}

/// Errors from state-changing commands.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error("Validation failed: {0}")]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Submission(#[from] SubmissionError),
}

/// Errors reading current contract state.
#[derive(Debug, Error)]
pub enum QueryError {
	#[error("Query failed: {0}")]
	Ledger(#[source] LedgerError),
	#[error("Query returned undecodable data: {0}")]
	Decode(#[from] ContractDecodeError),
	#[error("Tender {0} not found")]
	TenderNotFound(TenderId),
}

/// Errors replaying the event log.
#[derive(Debug, Error)]
pub enum ReplayError {
	#[error("Log query failed: {0}")]
	Ledger(#[source] LedgerError),
	#[error("Undecodable log: {0}")]
	Decode(#[from] ContractDecodeError),
	#[error("Replay checkpoint error: {0}")]
	Checkpoint(#[source] StorageError),
}

/// Top-level error returned by [`TenderEngine`](crate::TenderEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Connectivity error: {0}")]
	Connectivity(#[from] SessionError),
	#[error("Authorization error: {0}")]
	Authorization(#[from] AuthorizationError),
	#[error("Role unknown: {0}")]
	RoleQuery(RoleError),
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Submission(#[from] SubmissionError),
	#[error(transparent)]
	Query(#[from] QueryError),
	#[error(transparent)]
	Replay(#[from] ReplayError),
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl EngineError {
	/// Whether the caller may safely repeat the operation.
	///
	/// Reads are idempotent. Commands are not: a failed submission may still
	/// have reached the ledger, so the caller decides.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			EngineError::Query(_) | EngineError::Replay(_) | EngineError::RoleQuery(_)
		)
	}
}

impl From<RoleError> for EngineError {
	fn from(err: RoleError) -> Self {
		match err {
			RoleError::Unauthorized(e) => EngineError::Authorization(e),
			other => EngineError::RoleQuery(other),
		}
	}
}

impl From<CommandError> for EngineError {
	fn from(err: CommandError) -> Self {
		match err {
			CommandError::Validation(e) => EngineError::Validation(e),
			CommandError::Submission(e) => EngineError::Submission(e),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_error_conversion() {
		let unauthorized = RoleError::Unauthorized(AuthorizationError {
			required: Role::Authority,
			actual: Role::Vendor,
		});
		assert!(matches!(
			EngineError::from(unauthorized),
			EngineError::Authorization(_)
		));

		let unknown = RoleError::Decode("short".into());
		let err = EngineError::from(unknown);
		assert!(matches!(err, EngineError::RoleQuery(_)));
		assert!(err.is_retryable());
	}

	#[test]
	fn test_submission_error_display() {
		let err = SubmissionError::from_ledger(
			SubmissionStage::GasEstimation,
			LedgerError::Rpc {
				code: 3,
				message: "execution reverted: Tender closed".into(),
				data: None,
			},
		);
		assert_eq!(
			err.to_string(),
			"Submission failed during gas estimation: RPC error 3: execution reverted: Tender closed [execution reverted: Tender closed]"
		);
		assert!(!EngineError::from(err).is_retryable());
	}

	#[test]
	fn test_authorization_error_display() {
		let err = AuthorizationError {
			required: Role::Authority,
			actual: Role::Vendor,
		};
		assert_eq!(err.to_string(), "Requires authority role, caller is vendor");
	}
}

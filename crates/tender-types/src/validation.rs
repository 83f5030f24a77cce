//! Local validation errors.
//!
//! Every variant here is raised before a transaction or call leaves the
//! process, so a caller seeing one knows nothing was sent to the ledger.

use thiserror::Error;

/// Minimum tender name length in characters.
pub const MIN_TENDER_NAME_LEN: usize = 3;
/// Minimum tender details length in characters.
pub const MIN_TENDER_DETAILS_LEN: usize = 10;

/// Errors raised by local validation of command parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("Estimated cost must be greater than zero")]
	NonPositiveCost,
	#[error("Contract sign deadline {deadline} must be after current time {now}")]
	SignDeadlineNotInFuture { deadline: u64, now: u64 },
	#[error("Tender name must be at least {min} characters")]
	NameTooShort { min: usize },
	#[error("Tender details must be at least {min} characters")]
	DetailsTooShort { min: usize },
	#[error("Bid amount must be greater than zero")]
	NonPositiveAmount,
	#[error("Unknown tender type: {0}")]
	UnknownTenderType(String),
	#[error("Invalid tender id: {0}")]
	InvalidTenderId(String),
	#[error("Invalid sort order: {0}")]
	InvalidSortOrder(String),
	#[error("Invalid block range: from {from} is after to {to}")]
	InvalidBlockRange { from: u64, to: u64 },
}

//! Common types module for the tender lifecycle engine.
//!
//! This module defines the domain records, identifiers and contract bindings
//! shared by every crate in the workspace. Records here are snapshots of
//! ledger state; nothing in this crate talks to the ledger itself.

/// ABI bindings for the tender management contract and conversions into domain types.
pub mod contract;
/// Event-derived records: bids, approvals and their provenance.
pub mod events;
/// Transaction and receipt types for ledger interactions.
pub mod ledger;
/// Network configuration types.
pub mod networks;
/// Caller roles as reported by the contract.
pub mod role;
/// Secure string type for handling sensitive data.
pub mod secret_string;
/// Tender records, categories and creation parameters.
pub mod tender;
/// Utility functions and builders.
pub mod utils;
/// Local validation errors raised before any remote call.
pub mod validation;

pub use contract::{ContractDecodeError, ITenderManagement, TenderRecord};
pub use events::{ApprovalRecord, Bid, BlockRange, EventKind, EventProvenance, SortOrder};
pub use ledger::{Transaction, TransactionReceipt};
pub use networks::{NetworkConfig, NetworksConfig, RpcEndpoint};
pub use role::Role;
pub use secret_string::SecretString;
pub use tender::{NewTender, Tender, TenderDetail, TenderId, TenderPhase, TenderType};
pub use utils::{current_timestamp, format_address, short_hash};
pub use validation::ValidationError;

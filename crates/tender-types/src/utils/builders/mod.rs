//! Builder utilities for creating test and production instances of domain types.

pub mod events;
pub mod tender;
pub mod transaction_receipt;

pub use events::{ApprovalRecordBuilder, BidBuilder};
pub use tender::{NewTenderBuilder, TenderBuilder};
pub use transaction_receipt::TransactionReceiptBuilder;

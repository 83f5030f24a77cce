//! Utility functions for formatting and time, plus builders for domain types.

pub mod builders;
pub mod formatting;
pub mod helpers;

pub use formatting::{format_address, short_hash};
pub use helpers::current_timestamp;

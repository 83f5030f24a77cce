//! Display helpers for ledger identifiers.

use alloy_primitives::{Address, B256};

/// Keeps `head` leading and `tail` trailing characters of `full`.
fn elide(full: &str, head: usize, tail: usize) -> String {
	if full.len() <= head + tail + 2 {
		return full.to_string();
	}
	format!("{}..{}", &full[..head], &full[full.len() - tail..])
}

/// Short checksummed address, e.g. `0x709979..79C8`.
pub fn format_address(address: &Address) -> String {
	elide(&address.to_checksum(None), 8, 4)
}

/// Short transaction or block hash, e.g. `0x1d2c3b..9f0e`.
pub fn short_hash(hash: &B256) -> String {
	elide(&hash.to_string(), 8, 4)
}

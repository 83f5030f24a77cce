//! Argument parsers and formatters shared by the commands.

use alloy_primitives::U256;
use chrono::{DateTime, SecondsFormat, Utc};

/// Parses a deadline or bid date given as Unix seconds or an RFC 3339
/// timestamp.
pub fn parse_timestamp(input: &str) -> Result<u64, String> {
	let input = input.trim();
	if let Ok(secs) = input.parse::<u64>() {
		return Ok(secs);
	}

	let parsed = DateTime::parse_from_rfc3339(input).map_err(|e| {
		format!("'{input}' is neither Unix seconds nor an RFC 3339 timestamp ({e})")
	})?;
	u64::try_from(parsed.timestamp()).map_err(|_| format!("'{input}' is before 1970-01-01"))
}

/// Parses a non-negative decimal integer of up to 256 bits. Underscores may
/// be used as digit separators.
pub fn parse_amount(input: &str) -> Result<U256, String> {
	let digits: String = input.trim().chars().filter(|c| *c != '_').collect();
	if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
		return Err(format!("'{input}' is not a non-negative integer"));
	}
	U256::from_str_radix(&digits, 10).map_err(|e| format!("'{input}': {e}"))
}

/// Renders Unix seconds as an RFC 3339 UTC timestamp, or the raw number when
/// it is out of chrono's range.
pub fn format_timestamp(secs: u64) -> String {
	i64::try_from(secs)
		.ok()
		.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
		.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
		.unwrap_or_else(|| secs.to_string())
}

/// Like [`format_timestamp`] for bidder-supplied `uint256` dates, which may
/// not fit in `u64`.
pub fn format_bid_date(date: U256) -> String {
	u64::try_from(date)
		.map(format_timestamp)
		.unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_timestamp_unix() {
		assert_eq!(parse_timestamp("1800000000").unwrap(), 1_800_000_000);
		assert_eq!(parse_timestamp(" 0 ").unwrap(), 0);
	}

	#[test]
	fn test_parse_timestamp_rfc3339() {
		assert_eq!(
			parse_timestamp("2027-01-15T12:00:00Z").unwrap(),
			1_800_000_000 + 14_400
		);
		assert_eq!(
			parse_timestamp("2027-01-15T14:00:00+02:00").unwrap(),
			1_800_014_400
		);
	}

	#[test]
	fn test_parse_timestamp_rejects_garbage() {
		assert!(parse_timestamp("next tuesday").is_err());
		assert!(parse_timestamp("1969-12-31T23:59:59Z").is_err());
		assert!(parse_timestamp("-5").is_err());
	}

	#[test]
	fn test_parse_amount() {
		assert_eq!(parse_amount("1_000_000").unwrap(), U256::from(1_000_000u64));
		assert_eq!(
			parse_amount("115792089237316195423570985008687907853269984665640564039457584007913129639935")
				.unwrap(),
			U256::MAX
		);
		assert!(parse_amount("-1").is_err());
		assert!(parse_amount("1.5").is_err());
		assert!(parse_amount("").is_err());
		assert!(parse_amount(
			"115792089237316195423570985008687907853269984665640564039457584007913129639936"
		)
		.is_err());
	}

	#[test]
	fn test_format_timestamp() {
		assert_eq!(format_timestamp(1_800_000_000), "2027-01-15T08:00:00Z");
		assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
	}

	#[test]
	fn test_format_bid_date() {
		assert_eq!(
			format_bid_date(U256::from(1_800_000_000u64)),
			"2027-01-15T08:00:00Z"
		);
		assert_eq!(
			format_bid_date(U256::from(u64::MAX) + U256::from(1u64)),
			"18446744073709551616"
		);
	}
}

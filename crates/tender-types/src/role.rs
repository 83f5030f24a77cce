//! Caller roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the connected account, as reported by the contract's `isAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Issuing authority: creates tenders and approves winners.
	Authority,
	/// Any other account.
	Vendor,
}

impl Role {
	pub fn from_is_admin(is_admin: bool) -> Self {
		if is_admin {
			Role::Authority
		} else {
			Role::Vendor
		}
	}

	pub fn is_authority(&self) -> bool {
		matches!(self, Role::Authority)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Authority => f.write_str("authority"),
			Role::Vendor => f.write_str("vendor"),
		}
	}
}

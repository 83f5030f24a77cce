//! Role resolution.
//!
//! The contract is the only authority on who the issuing authority is. The
//! role is queried on every call and never cached, so an account change on
//! the contract side takes effect on the next check.

use crate::error::{AuthorizationError, RoleError};
use crate::session::Session;
use alloy_sol_types::SolCall;
use tender_types::{ITenderManagement, Role};

/// Resolves the caller's role through the session's contract handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleResolver;

impl RoleResolver {
	pub fn new() -> Self {
		Self
	}

	/// Asks the contract whether the session's account is the authority.
	///
	/// A failed or undecodable query is an error, never a silent `Vendor`.
	#[tracing::instrument(skip_all, fields(account = %session.account()))]
	pub async fn resolve(&self, session: &Session) -> Result<Role, RoleError> {
		let call = ITenderManagement::isAdminCall {
			account: session.account(),
		};
		let tx = session.contract_call(call.abi_encode());

		let data = session
			.ledger()
			.call(&tx, session.account())
			.await
			.map_err(RoleError::Query)?;

		let is_admin = ITenderManagement::isAdminCall::abi_decode_returns(&data)
			.map_err(|e| RoleError::Decode(e.to_string()))?;

		let role = Role::from_is_admin(is_admin);
		tracing::debug!(%role, "Resolved role");
		Ok(role)
	}

	/// Resolves the role and checks it against `required`.
	///
	/// Only [`Role::Authority`] gates anything; requiring [`Role::Vendor`]
	/// admits every known role.
	pub async fn require(&self, session: &Session, required: Role) -> Result<Role, RoleError> {
		let actual = self.resolve(session).await?;
		if required.is_authority() && !actual.is_authority() {
			tracing::warn!(account = %session.account(), "Authority-only access denied");
			return Err(AuthorizationError { required, actual }.into());
		}
		Ok(actual)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{session_with, AUTHORITY, VENDOR};
	use alloy_primitives::Bytes;
	use alloy_sol_types::SolValue;
	use tender_ledger::{LedgerError, MockLedgerInterface};

	fn ledger_answering(is_admin: bool) -> MockLedgerInterface {
		let mut ledger = MockLedgerInterface::new();
		ledger.expect_call().times(1).returning(move |tx, from| {
			let decoded = ITenderManagement::isAdminCall::abi_decode(&tx.data).unwrap();
			assert_eq!(decoded.account, from);
			let encoded = Bytes::from(is_admin.abi_encode());
			Box::pin(async move { Ok(encoded) })
		});
		ledger
	}

	#[tokio::test]
	async fn test_admin_resolves_to_authority() {
		let session = session_with(ledger_answering(true), AUTHORITY);
		let role = RoleResolver::new().resolve(&session).await.unwrap();
		assert_eq!(role, Role::Authority);
	}

	#[tokio::test]
	async fn test_non_admin_resolves_to_vendor() {
		let session = session_with(ledger_answering(false), VENDOR);
		let role = RoleResolver::new().resolve(&session).await.unwrap();
		assert_eq!(role, Role::Vendor);
	}

	#[tokio::test]
	async fn test_vendor_blocked_from_authority_view() {
		let session = session_with(ledger_answering(false), VENDOR);
		let err = RoleResolver::new()
			.require(&session, Role::Authority)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			RoleError::Unauthorized(AuthorizationError {
				required: Role::Authority,
				actual: Role::Vendor
			})
		));
	}

	#[tokio::test]
	async fn test_authority_passes_gate() {
		let session = session_with(ledger_answering(true), AUTHORITY);
		let role = RoleResolver::new()
			.require(&session, Role::Authority)
			.await
			.unwrap();
		assert_eq!(role, Role::Authority);
	}

	#[tokio::test]
	async fn test_query_failure_leaves_role_unknown() {
		let mut ledger = MockLedgerInterface::new();
		ledger.expect_call().returning(|_, _| {
			Box::pin(async { Err(LedgerError::Unreachable("timeout".into())) })
		});
		let session = session_with(ledger, VENDOR);

		let err = RoleResolver::new()
			.require(&session, Role::Authority)
			.await
			.unwrap_err();
		assert!(matches!(err, RoleError::Query(_)));
	}

	#[tokio::test]
	async fn test_empty_return_data_is_decode_error() {
		let mut ledger = MockLedgerInterface::new();
		ledger
			.expect_call()
			.returning(|_, _| Box::pin(async { Ok(Bytes::new()) }));
		let session = session_with(ledger, VENDOR);

		let err = RoleResolver::new().resolve(&session).await.unwrap_err();
		assert!(matches!(err, RoleError::Decode(_)));
	}
}

//! Read-only tender queries.

use crate::error::QueryError;
use crate::session::Session;
use alloy_sol_types::SolCall;
use tender_types::{ContractDecodeError, ITenderManagement, Tender, TenderId};

/// Reads the current tender snapshot from the contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryService;

impl QueryService {
	pub fn new() -> Self {
		Self
	}

	/// Every tender the contract holds, in the order the contract returns them.
	///
	/// One undecodable record fails the whole read.
	#[tracing::instrument(skip_all, fields(chain_id = session.chain_id()))]
	pub async fn list_tenders(&self, session: &Session) -> Result<Vec<Tender>, QueryError> {
		let tx = session.contract_call(ITenderManagement::getAllTenderDetailsCall {}.abi_encode());

		let data = session
			.ledger()
			.call(&tx, session.account())
			.await
			.map_err(QueryError::Ledger)?;

		let records = ITenderManagement::getAllTenderDetailsCall::abi_decode_returns(&data)
			.map_err(|e| ContractDecodeError::Abi(e.to_string()))?;

		let tenders = records
			.into_iter()
			.map(Tender::try_from)
			.collect::<Result<Vec<_>, _>>()?;

		tracing::debug!(count = tenders.len(), "Listed tenders");
		Ok(tenders)
	}

	/// Looks up one tender by id.
	pub async fn tender(
		&self,
		session: &Session,
		tender_id: TenderId,
	) -> Result<Option<Tender>, QueryError> {
		let tenders = self.list_tenders(session).await?;
		Ok(tenders.into_iter().find(|t| t.tender_id == tender_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{session_with, VENDOR};
	use alloy_primitives::{Bytes, U256};
	use alloy_sol_types::SolValue;
	use tender_ledger::{LedgerError, MockLedgerInterface};
	use tender_types::{TenderPhase, TenderRecord, TenderType};

	fn record(id: u64, tender_type: &str, is_open: bool, approved: bool) -> TenderRecord {
		TenderRecord {
			tenderId: U256::from(id),
			tenderName: format!("Tender {id}"),
			tenderType: tender_type.to_string(),
			bidSubmissionDeadline: U256::from(1_900_000_000u64),
			contractSignDeadline: U256::from(2_000_000_000u64),
			estimatedCost: U256::from(10_000u64 * id),
			tenderDetails: "Detailed description".to_string(),
			isOpen: is_open,
			approved,
		}
	}

	fn ledger_returning(records: Vec<TenderRecord>) -> MockLedgerInterface {
		let encoded = Bytes::from((records,).abi_encode_params());
		let mut ledger = MockLedgerInterface::new();
		ledger.expect_call().returning(move |tx, _| {
			assert!(ITenderManagement::getAllTenderDetailsCall::abi_decode(&tx.data).is_ok());
			let encoded = encoded.clone();
			Box::pin(async move { Ok(encoded) })
		});
		ledger
	}

	#[tokio::test]
	async fn test_list_preserves_contract_order() {
		let ledger = ledger_returning(vec![
			record(3, "services", true, false),
			record(1, "construction", false, false),
			record(2, "Consulting", false, true),
		]);
		let session = session_with(ledger, VENDOR);

		let tenders = QueryService::new().list_tenders(&session).await.unwrap();
		let ids: Vec<_> = tenders.iter().map(|t| t.tender_id).collect();
		assert_eq!(ids, vec![TenderId::from(3), TenderId::from(1), TenderId::from(2)]);

		assert_eq!(tenders[0].phase(), TenderPhase::Open);
		assert_eq!(tenders[1].phase(), TenderPhase::ClosedForBidding);
		assert_eq!(tenders[2].phase(), TenderPhase::Approved);
		assert_eq!(tenders[2].tender_type, TenderType::Consulting);
	}

	#[tokio::test]
	async fn test_empty_list() {
		let session = session_with(ledger_returning(vec![]), VENDOR);
		let tenders = QueryService::new().list_tenders(&session).await.unwrap();
		assert!(tenders.is_empty());
	}

	#[tokio::test]
	async fn test_unknown_category_does_not_hide_other_tenders() {
		let ledger = ledger_returning(vec![
			record(1, "construction", true, false),
			record(2, "catering", true, false),
			record(3, "services", true, false),
		]);
		let session = session_with(ledger, VENDOR);

		let tenders = QueryService::new().list_tenders(&session).await.unwrap();
		let types: Vec<_> = tenders.iter().map(|t| t.tender_type).collect();
		assert_eq!(
			types,
			vec![TenderType::Construction, TenderType::Other, TenderType::Services]
		);
	}

	#[tokio::test]
	async fn test_garbage_return_data_is_decode_error() {
		let mut ledger = MockLedgerInterface::new();
		ledger
			.expect_call()
			.returning(|_, _| Box::pin(async { Ok(Bytes::from_static(&[0x01, 0x02])) }));
		let session = session_with(ledger, VENDOR);

		let err = QueryService::new().list_tenders(&session).await.unwrap_err();
		assert!(matches!(err, QueryError::Decode(ContractDecodeError::Abi(_))));
	}

	#[tokio::test]
	async fn test_ledger_failure_is_reported() {
		let mut ledger = MockLedgerInterface::new();
		ledger.expect_call().returning(|_, _| {
			Box::pin(async { Err(LedgerError::Unreachable("connection reset".into())) })
		});
		let session = session_with(ledger, VENDOR);

		let err = QueryService::new().list_tenders(&session).await.unwrap_err();
		assert!(matches!(err, QueryError::Ledger(LedgerError::Unreachable(_))));
	}

	#[tokio::test]
	async fn test_single_tender_lookup() {
		let ledger = ledger_returning(vec![
			record(1, "supplies", true, false),
			record(2, "other", true, false),
		]);
		let session = session_with(ledger, VENDOR);
		let service = QueryService::new();

		let found = service.tender(&session, TenderId::from(2)).await.unwrap();
		assert_eq!(found.unwrap().tender_type, TenderType::Other);
		assert!(service
			.tender(&session, TenderId::from(9))
			.await
			.unwrap()
			.is_none());
	}
}

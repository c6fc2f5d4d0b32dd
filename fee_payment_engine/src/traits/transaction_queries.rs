use crate::{
    db_types::CustomOrderId,
    fpe_api::transaction_objects::{TransactionDetail, TransactionFilter, TransactionQuery, TransactionSummary},
    traits::PaymentsDbError,
};

/// Read-only reporting over the left join of orders and their status records.
///
/// Orders without a status record are still reported, with the status fields empty.
#[allow(async_fn_in_trait)]
pub trait TransactionQueries {
    /// Fetches one page of transactions, filtered and sorted according to `query`.
    async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<Vec<TransactionSummary>, PaymentsDbError>;

    /// Counts every transaction matching `filter`, ignoring paging.
    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<i64, PaymentsDbError>;

    async fn fetch_transaction_detail(
        &self,
        custom_order_id: &CustomOrderId,
    ) -> Result<Option<TransactionDetail>, PaymentsDbError>;
}

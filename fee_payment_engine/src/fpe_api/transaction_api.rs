use std::{fmt::Debug, str::FromStr};

use log::*;

use crate::{
    db_types::CustomOrderId,
    fpe_api::{
        errors::TransactionQueryError,
        transaction_objects::{
            PaginationInfo,
            Paging,
            SortField,
            SortOrder,
            TransactionDetail,
            TransactionFilter,
            TransactionListParams,
            TransactionPage,
            TransactionQuery,
        },
    },
    helpers::total_pages,
    traits::TransactionQueries,
};

/// `TransactionApi` is the read-only reporting API over orders and their payment status.
pub struct TransactionApi<B> {
    db: B,
}

impl<B> Debug for TransactionApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionApi")
    }
}

impl<B> TransactionApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> TransactionApi<B>
where B: TransactionQueries
{
    /// Lists all transactions, one page at a time.
    ///
    /// Sorting defaults to `payment_time`, newest first. Unknown sort fields fall back to the default. An optional
    /// `status` narrows the list to one payment status.
    pub async fn list_transactions(
        &self,
        params: &TransactionListParams,
    ) -> Result<TransactionPage, TransactionQueryError> {
        let filter = TransactionFilter::default().with_status_param(params.status.as_deref())?;
        let sort = match params.sort.as_deref().map(SortField::from_str) {
            Some(Ok(field)) => field,
            Some(Err(e)) => {
                debug!("🔄️📊️ {e}. Sorting by payment_time instead.");
                SortField::default()
            },
            None => SortField::default(),
        };
        let order = SortOrder::from_param(params.order.as_deref());
        let query = TransactionQuery::new(filter, params.paging()).sorted_by(sort, order);
        self.fetch_page(query).await
    }

    /// Lists the transactions of one school, newest payment first.
    pub async fn list_school_transactions(
        &self,
        school_id: &str,
        paging: Paging,
    ) -> Result<TransactionPage, TransactionQueryError> {
        let filter = TransactionFilter::default().with_school_id(school_id);
        let query = TransactionQuery::new(filter, paging);
        self.fetch_page(query).await
    }

    /// Fetches the full detail of the transaction with the given external reference.
    pub async fn transaction_status(
        &self,
        custom_order_id: &CustomOrderId,
    ) -> Result<TransactionDetail, TransactionQueryError> {
        let detail = self.db.fetch_transaction_detail(custom_order_id).await?;
        detail.ok_or_else(|| {
            debug!("🔄️📊️ No transaction found for [{custom_order_id}]");
            TransactionQueryError::NotFound
        })
    }

    async fn fetch_page(&self, query: TransactionQuery) -> Result<TransactionPage, TransactionQueryError> {
        trace!("🔄️📊️ Fetching transactions. {} page {} (limit {})", query.filter, query.paging.page, query.paging.limit);
        let transactions = self.db.fetch_transactions(&query).await?;
        let total_records = self.db.count_transactions(&query.filter).await?;
        let pagination = PaginationInfo {
            current_page: query.paging.page,
            total_pages: total_pages(total_records, query.paging.limit),
            total_records,
            limit: query.paging.limit,
        };
        debug!(
            "🔄️📊️ Returning {} of {total_records} transactions (page {} of {})",
            transactions.len(),
            pagination.current_page,
            pagination.total_pages
        );
        Ok(TransactionPage { transactions, pagination })
    }
}

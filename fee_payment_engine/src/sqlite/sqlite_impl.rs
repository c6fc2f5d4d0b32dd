//! `SqliteDatabase` is a concrete implementation of a fee payment engine backend.
//!
//! It uses SQLite as the backend and implements all the traits defined in the [`traits`](crate::traits) module.
use std::fmt::Debug;

use fpg_common::FeeAmount;
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, order_statuses, orders, transactions, webhook_logs};
use crate::{
    db_types::{CustomOrderId, NewOrder, NewWebhookLog, Order, OrderStatus, OrderStatusUpdate, StatusChange, WebhookLog},
    fpe_api::transaction_objects::{TransactionDetail, TransactionFilter, TransactionQuery, TransactionSummary},
    traits::{OrderManagement, PaymentsDatabase, PaymentsDbError, TransactionQueries, WebhookManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl PaymentsDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), PaymentsDbError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    /// Takes a new order, and in a single atomic transaction,
    /// * stores the order under a freshly generated `custom_order_id`,
    /// * creates its `pending` status record, with both amounts set to `amount`.
    async fn insert_order_with_pending_status(
        &self,
        order: NewOrder,
        amount: FeeAmount,
    ) -> Result<(Order, OrderStatus), PaymentsDbError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(&order, &mut tx).await?;
        let status = order_statuses::insert_pending_status(order.id, amount, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved with a pending status of {amount}", order.custom_order_id);
        Ok((order, status))
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_custom_order_id(
        &self,
        custom_order_id: &CustomOrderId,
    ) -> Result<Option<Order>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_custom_order_id(custom_order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_status(&self, order_id: i64) -> Result<Option<OrderStatus>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let status = order_statuses::fetch_status_for_order(order_id, &mut conn).await?;
        Ok(status)
    }

    async fn mark_order_failed(&self, order_id: i64, reason: &str) -> Result<OrderStatus, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let status = order_statuses::mark_failed(order_id, reason, &mut conn).await?;
        debug!("🗃️ Order #{order_id} marked as failed");
        Ok(status)
    }

    async fn repair_orphaned_orders(&self) -> Result<u64, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let repaired = order_statuses::insert_missing_statuses(&mut conn).await?;
        if repaired > 0 {
            warn!("🗃️ {repaired} orders had no status record. A pending status has been created for each of them.");
        }
        Ok(repaired)
    }
}

impl WebhookManagement for SqliteDatabase {
    async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<WebhookLog, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        webhook_logs::insert_webhook_log(&log, &mut conn).await
    }

    async fn fetch_order_by_reference(&self, reference: &str) -> Result<Option<Order>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_reference(reference, &mut conn).await?;
        Ok(order)
    }

    /// Takes a reconciled callback, and in a single atomic transaction,
    /// * reads the status the order had before the callback,
    /// * upserts the status record with the reported fields,
    /// * flags the webhook log as processed.
    async fn apply_webhook_update(
        &self,
        order_id: i64,
        webhook_log_id: i64,
        update: OrderStatusUpdate,
    ) -> Result<StatusChange, PaymentsDbError> {
        let mut tx = self.pool.begin().await?;
        let previous = order_statuses::fetch_current_status(order_id, &mut tx).await?;
        let current = order_statuses::upsert_status(order_id, &update, &mut tx).await?;
        webhook_logs::mark_processed(webhook_log_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Webhook #{webhook_log_id} applied to order #{order_id}. Status is now {}", current.status);
        Ok(StatusChange { previous, current })
    }

    async fn fetch_webhook_log(&self, id: i64) -> Result<Option<WebhookLog>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let log = webhook_logs::fetch_webhook_log(id, &mut conn).await?;
        Ok(log)
    }
}

impl TransactionQueries for SqliteDatabase {
    async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<Vec<TransactionSummary>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let transactions = transactions::fetch_transactions(query, &mut conn).await?;
        Ok(transactions)
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<i64, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let count = transactions::count_transactions(filter, &mut conn).await?;
        Ok(count)
    }

    async fn fetch_transaction_detail(
        &self,
        custom_order_id: &CustomOrderId,
    ) -> Result<Option<TransactionDetail>, PaymentsDbError> {
        let mut conn = self.pool.acquire().await?;
        let detail = transactions::fetch_transaction_detail(custom_order_id, &mut conn).await?;
        Ok(detail)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `FPG_DATABASE_URL`
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date by running the embedded migrations.
    pub async fn migrate(&self) -> Result<(), PaymentsDbError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

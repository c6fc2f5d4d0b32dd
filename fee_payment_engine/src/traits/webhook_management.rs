use crate::{
    db_types::{NewWebhookLog, Order, OrderStatusUpdate, StatusChange, WebhookLog},
    traits::PaymentsDbError,
};

/// The webhook audit log, and the reconciliation of gateway callbacks against order status records.
#[allow(async_fn_in_trait)]
pub trait WebhookManagement {
    /// Appends a callback to the audit log with `processed = false`. A fresh `webhook_id` is generated.
    async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<WebhookLog, PaymentsDbError>;

    /// Resolves the order reference a gateway reports in a callback.
    ///
    /// Numeric references are matched against the internal order id first. Any reference that does not resolve
    /// that way is matched against `custom_order_id`.
    async fn fetch_order_by_reference(&self, reference: &str) -> Result<Option<Order>, PaymentsDbError>;

    /// In a single atomic transaction:
    /// * upserts the status record of `order_id` with the supplied fields (missing fields keep their stored value),
    /// * flags the webhook log `webhook_log_id` as processed.
    async fn apply_webhook_update(
        &self,
        order_id: i64,
        webhook_log_id: i64,
        update: OrderStatusUpdate,
    ) -> Result<StatusChange, PaymentsDbError>;

    async fn fetch_webhook_log(&self, id: i64) -> Result<Option<WebhookLog>, PaymentsDbError>;
}

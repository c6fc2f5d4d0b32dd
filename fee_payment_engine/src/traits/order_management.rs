use fpg_common::FeeAmount;

use crate::{
    db_types::{CustomOrderId, NewOrder, Order, OrderStatus},
    traits::PaymentsDbError,
};

/// Creating orders, and reading them back together with their status record.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a new order and its `pending` status record in a single atomic transaction.
    ///
    /// A fresh `custom_order_id` is generated for the order before it is written. Both the order and the transaction
    /// amount of the status record are set to `amount`.
    async fn insert_order_with_pending_status(
        &self,
        order: NewOrder,
        amount: FeeAmount,
    ) -> Result<(Order, OrderStatus), PaymentsDbError>;

    /// Fetches the order with the given internal id.
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentsDbError>;

    /// Fetches the order with the given external reference.
    async fn fetch_order_by_custom_order_id(
        &self,
        custom_order_id: &CustomOrderId,
    ) -> Result<Option<Order>, PaymentsDbError>;

    /// Fetches the status record for the order with internal id `order_id`.
    async fn fetch_order_status(&self, order_id: i64) -> Result<Option<OrderStatus>, PaymentsDbError>;

    /// Moves the order's status to `failed`, recording `reason` as the error message.
    ///
    /// Used when the gateway could not be reached after the order was stored.
    async fn mark_order_failed(&self, order_id: i64, reason: &str) -> Result<OrderStatus, PaymentsDbError>;

    /// Inserts a `pending` status record for every order that lacks one. Returns the number of orders repaired.
    async fn repair_orphaned_orders(&self) -> Result<u64, PaymentsDbError>;
}

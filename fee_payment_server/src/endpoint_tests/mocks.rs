use fee_payment_engine::{
    db_types::{CustomOrderId, NewOrder, NewWebhookLog, Order, OrderStatus, OrderStatusUpdate, StatusChange, WebhookLog},
    traits::{
        CollectRequest,
        CollectResponse,
        GatewayError,
        OrderManagement,
        PaymentGateway,
        PaymentsDbError,
        TransactionQueries,
        WebhookManagement,
    },
    transaction_objects::{TransactionDetail, TransactionFilter, TransactionQuery, TransactionSummary},
};
use fpg_common::FeeAmount;
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn insert_order_with_pending_status(&self, order: NewOrder, amount: FeeAmount) -> Result<(Order, OrderStatus), PaymentsDbError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentsDbError>;
        async fn fetch_order_by_custom_order_id(&self, custom_order_id: &CustomOrderId) -> Result<Option<Order>, PaymentsDbError>;
        async fn fetch_order_status(&self, order_id: i64) -> Result<Option<OrderStatus>, PaymentsDbError>;
        async fn mark_order_failed(&self, order_id: i64, reason: &str) -> Result<OrderStatus, PaymentsDbError>;
        async fn repair_orphaned_orders(&self) -> Result<u64, PaymentsDbError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_collect_request(&self, request: CollectRequest) -> Result<CollectResponse, GatewayError>;
    }
}

mock! {
    pub WebhookManager {}
    impl WebhookManagement for WebhookManager {
        async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<WebhookLog, PaymentsDbError>;
        async fn fetch_order_by_reference(&self, reference: &str) -> Result<Option<Order>, PaymentsDbError>;
        async fn apply_webhook_update(&self, order_id: i64, webhook_log_id: i64, update: OrderStatusUpdate) -> Result<StatusChange, PaymentsDbError>;
        async fn fetch_webhook_log(&self, id: i64) -> Result<Option<WebhookLog>, PaymentsDbError>;
    }
}

mock! {
    pub TransactionQuerier {}
    impl TransactionQueries for TransactionQuerier {
        async fn fetch_transactions(&self, query: &TransactionQuery) -> Result<Vec<TransactionSummary>, PaymentsDbError>;
        async fn count_transactions(&self, filter: &TransactionFilter) -> Result<i64, PaymentsDbError>;
        async fn fetch_transaction_detail(&self, custom_order_id: &CustomOrderId) -> Result<Option<TransactionDetail>, PaymentsDbError>;
    }
}

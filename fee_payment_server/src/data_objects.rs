use std::fmt::Display;

use fee_payment_engine::{
    db_types::CustomOrderId,
    payment_objects::PaymentRequestResult,
    transaction_objects::{Paging, TransactionDetail, TransactionPage},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}

/// The reply to a successful `create-payment` call.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestResponse {
    pub message: String,
    pub order_id: i64,
    pub custom_order_id: CustomOrderId,
    /// The gateway's response, as received.
    pub payment_data: Value,
    pub redirect_url: Option<String>,
}

impl From<PaymentRequestResult> for PaymentRequestResponse {
    fn from(result: PaymentRequestResult) -> Self {
        Self {
            message: "Payment request created successfully".to_string(),
            order_id: result.order.id,
            custom_order_id: result.custom_order_id,
            payment_data: result.payment_data,
            redirect_url: result.redirect_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolTransactionsResponse {
    pub school_id: String,
    #[serde(flatten)]
    pub page: TransactionPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionStatusResponse {
    pub message: String,
    pub transaction: TransactionDetail,
}

impl From<TransactionDetail> for TransactionStatusResponse {
    fn from(transaction: TransactionDetail) -> Self {
        Self { message: "Transaction status retrieved successfully".to_string(), transaction }
    }
}

/// Query parameters for the per-school transaction list. Sorting is fixed, so only paging is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolPagingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SchoolPagingParams {
    pub fn paging(&self) -> Paging {
        Paging::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

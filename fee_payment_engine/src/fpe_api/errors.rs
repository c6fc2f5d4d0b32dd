use thiserror::Error;

use crate::traits::{GatewayError, PaymentsDbError};

#[derive(Debug, Clone, Error)]
pub enum PaymentRequestError {
    /// The request was rejected before anything was stored. Carries the first violation found.
    #[error("{0}")]
    ValidationError(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] PaymentsDbError),
    #[error("Failed to create payment request. {0}")]
    GatewayError(#[from] GatewayError),
}

#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error("Could not record the webhook. {0}")]
    LogWriteFailed(PaymentsDbError),
}

#[derive(Debug, Clone, Error)]
pub enum TransactionQueryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] PaymentsDbError),
    #[error("User error constructing query: {0}")]
    QueryError(String),
    #[error("Transaction not found")]
    NotFound,
}

use thiserror::Error;

use crate::traits::{OrderManagement, TransactionQueries, WebhookManagement};

/// The highest level of behaviour for backends supporting the fee payment engine.
///
/// A backend must be cheap to clone, since a copy is handed to every API instance on every server worker.
#[allow(async_fn_in_trait)]
pub trait PaymentsDatabase: Clone + OrderManagement + WebhookManagement + TransactionQueries {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the database connection(s). Pending operations are allowed to finish.
    async fn close(&mut self) -> Result<(), PaymentsDbError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentsDbError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Could not generate a unique {0} after {1} attempts")]
    IdentifierExhausted(&'static str, usize),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("Could not serialize stored data. {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for PaymentsDbError {
    fn from(e: sqlx::Error) -> Self {
        PaymentsDbError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for PaymentsDbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        PaymentsDbError::DatabaseError(format!("Migration failed. {e}"))
    }
}

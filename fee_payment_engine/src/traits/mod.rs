//! # Storage and gateway contracts
//!
//! This module defines the behaviour that a storage backend must expose to act as a backend for the fee payment
//! engine, and the behaviour expected of the outbound payment gateway.
//!
//! ## Orders and statuses
//! Every order is created together with exactly one status record. The [`OrderManagement`] trait covers creating
//! that pair atomically and reading it back.
//!
//! ## Webhooks
//! [`WebhookManagement`] stores the audit log of gateway callbacks and applies the reported outcome to an order's
//! status record.
//!
//! ## Reporting
//! [`TransactionQueries`] provides the read-only, paginated join of orders and statuses.
//!
//! ## Traits
//! * [`PaymentsDatabase`] ties the three storage traits together and is what the server is generic over.
//! * [`PaymentGateway`] is the outbound call that turns an order into a hosted payment page.
mod order_management;
mod payment_gateway;
mod payments_database;
mod transaction_queries;
mod webhook_management;

pub use order_management::OrderManagement;
pub use payment_gateway::{CollectRequest, CollectResponse, GatewayError, PaymentGateway};
pub use payments_database::{PaymentsDatabase, PaymentsDbError};
pub use transaction_queries::TransactionQueries;
pub use webhook_management::WebhookManagement;

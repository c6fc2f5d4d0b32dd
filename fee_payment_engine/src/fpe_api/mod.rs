//! # Fee payment engine public API
//!
//! The `fpe_api` module exposes the programmatic API of the fee payment engine. The API is modular, so that clients
//! can pick the functionality they need.
//!
//! * [`payment_request_api`] validates payment requests, records the order and its pending status, and calls the
//!   payment gateway.
//! * [`webhook_api`] records gateway callbacks and reconciles them against order status records.
//! * [`transaction_api`] provides paginated, sorted and filtered reporting over orders and their status.
//!
//! The other submodules hold the request and result types used by these APIs.
//!
//! # API usage
//!
//! Every API is created by supplying a backend that implements the storage traits it needs.
//!
//! ```rust,ignore
//! use fee_payment_engine::{SqliteDatabase, TransactionApi};
//! let db = SqliteDatabase::new_with_url("sqlite://data/fee_payments.db", 5).await?;
//! // SqliteDatabase implements TransactionQueries
//! let api = TransactionApi::new(db);
//! let detail = api.transaction_status(&"ORD_0f6c...".into()).await?;
//! ```
pub mod errors;
pub mod payment_objects;
pub mod payment_request_api;
pub mod transaction_api;
pub mod transaction_objects;
pub mod webhook_api;
pub mod webhook_objects;

//! Fee Payment Engine
//!
//! The fee payment engine lets a school collect student fees through a third-party payment gateway. This library
//! contains the core logic: it is independent of the HTTP layer and of the particular gateway.
//!
//! The library is divided into these main sections:
//! 1. Storage ([`mod@traits`] and, with the `sqlite` feature, [`mod@sqlite`]). Orders, their payment status records
//!    and the webhook audit log live here. You should not need to access the database directly; use the APIs
//!    instead. The record types are defined in [`mod@db_types`] and are public.
//! 2. The public API ([`mod@fpe_api`]):
//!    * issuing payment requests (order + pending status, then the gateway call),
//!    * reconciling gateway webhooks against order status records,
//!    * paginated transaction reporting.
//!
//! The outbound gateway is abstracted by the [`PaymentGateway`] trait, so the engine never talks HTTP itself.
pub mod db_types;
pub mod fpe_api;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use fpe_api::{
    errors::{PaymentRequestError, TransactionQueryError, WebhookError},
    payment_objects,
    payment_request_api::PaymentRequestApi,
    transaction_api::TransactionApi,
    transaction_objects,
    webhook_api::WebhookApi,
    webhook_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    OrderManagement,
    PaymentGateway,
    PaymentsDatabase,
    PaymentsDbError,
    TransactionQueries,
    WebhookManagement,
};

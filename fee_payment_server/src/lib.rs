//! # Fee payment server
//! This crate hosts the HTTP server for the school fee payment gateway. It is responsible for:
//! * Issuing payment requests on behalf of authenticated trustees, and handing back the gateway's payment page.
//! * Receiving payment gateway callbacks and reconciling them against stored orders.
//! * Serving paginated transaction reports.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/create-payment`: Issue a payment request (bearer token required).
//! * `/api/webhook`: The payment gateway callback. Optionally HMAC-checked.
//! * `/api/transactions`, `/api/transactions/school/{school_id}`, `/api/transaction-status/{custom_order_id}`:
//!   transaction reporting (bearer token required).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;

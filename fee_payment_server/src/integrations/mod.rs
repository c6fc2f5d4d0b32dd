//! Glue between the fee payment engine and the third-party services it relies on.
mod gateway;

pub use gateway::GatewayClient;

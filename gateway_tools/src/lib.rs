mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::GatewayApi;
pub use config::GatewayConfig;
pub use data_objects::{CollectRequestClaims, CollectRequestPayload, CollectRequestResponse, SignedCollectRequest};
pub use error::GatewayApiError;
pub use helpers::{extract_redirect_url, sign_payload};

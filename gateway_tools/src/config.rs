use fpg_common::Secret;
use log::*;

pub const DEFAULT_GATEWAY_URL: &str = "https://dev-vanilla.edviron.com/erp";

#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// The base URL of the gateway API, without a trailing slash.
    pub base_url: String,
    /// Sent as a bearer token on every request.
    pub api_key: Secret<String>,
    /// The key that signs collect requests.
    pub pg_key: Secret<String>,
}

impl GatewayConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("FPG_GATEWAY_URL").unwrap_or_else(|_| {
            error!("🪛️ FPG_GATEWAY_URL not set, using {DEFAULT_GATEWAY_URL}. Payment requests will probably fail.");
            DEFAULT_GATEWAY_URL.to_string()
        });
        let api_key = Secret::new(std::env::var("FPG_GATEWAY_API_KEY").unwrap_or_else(|_| {
            error!("🪛️ FPG_GATEWAY_API_KEY not set. The gateway will reject payment requests.");
            String::default()
        }));
        let pg_key = Secret::new(std::env::var("FPG_GATEWAY_PG_KEY").unwrap_or_else(|_| {
            error!("🪛️ FPG_GATEWAY_PG_KEY not set. The gateway will reject payment request signatures.");
            String::default()
        }));
        Self { base_url: base_url.trim_end_matches('/').to_string(), api_key, pg_key }
    }
}

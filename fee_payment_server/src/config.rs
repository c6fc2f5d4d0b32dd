use std::{env, io::Write};

use fee_payment_engine::payment_objects::{IssuerConfig, DEFAULT_CALLBACK_URL, DEFAULT_GATEWAY_NAME};
use fpg_common::{helpers::env_flag, Secret};
use gateway_tools::GatewayConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_FPG_HOST: &str = "127.0.0.1";
const DEFAULT_FPG_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/fee_payments.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
    /// The fixed parameters stamped onto every payment request.
    pub issuer: IssuerConfig,
    /// How to reach the payment gateway.
    pub gateway: GatewayConfig,
    pub webhook: WebhookConfig,
    pub cors: CorsConfig,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FPG_HOST.to_string(),
            port: DEFAULT_FPG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            auth: AuthConfig::default(),
            issuer: IssuerConfig::default(),
            gateway: GatewayConfig::default(),
            webhook: WebhookConfig::default(),
            cors: CorsConfig::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FPG_HOST").ok().unwrap_or_else(|| DEFAULT_FPG_HOST.into());
        let port = env::var("FPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FPG_PORT. {e} Using the default, {DEFAULT_FPG_PORT}, instead."
                    );
                    DEFAULT_FPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FPG_PORT);
        let database_url = env::var("FPG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FPG_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let db_max_connections = env::var("FPG_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .or_else(|| {
                        warn!("🪛️ Invalid configuration value for FPG_DB_MAX_CONNECTIONS: {s}");
                        None
                    })
            })
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let issuer = issuer_config_from_env();
        let gateway = GatewayConfig::new_from_env_or_default();
        let webhook = WebhookConfig::from_env_or_default();
        let cors = CorsConfig::from_env_or_default();
        let use_x_forwarded_for = env_flag("FPG_USE_X_FORWARDED_FOR", false);
        let use_forwarded = env_flag("FPG_USE_FORWARDED", false);
        Self {
            host,
            port,
            database_url,
            db_max_connections,
            auth,
            issuer,
            gateway,
            webhook,
            cors,
            use_x_forwarded_for,
            use_forwarded,
        }
    }
}

fn issuer_config_from_env() -> IssuerConfig {
    let school_id = env::var("FPG_SCHOOL_ID").ok().unwrap_or_else(|| {
        error!("🪛️ FPG_SCHOOL_ID is not set. Please set it to the school id issued by the payment gateway.");
        String::default()
    });
    let gateway_name = env::var("FPG_GATEWAY_NAME").ok().unwrap_or_else(|| {
        info!("🪛️ FPG_GATEWAY_NAME is not set. Using '{DEFAULT_GATEWAY_NAME}'.");
        DEFAULT_GATEWAY_NAME.to_string()
    });
    let default_callback_url = env::var("FPG_DEFAULT_CALLBACK_URL").ok().unwrap_or_else(|| {
        info!("🪛️ FPG_DEFAULT_CALLBACK_URL is not set. Using {DEFAULT_CALLBACK_URL}.");
        DEFAULT_CALLBACK_URL.to_string()
    });
    IssuerConfig { school_id, gateway_name, default_callback_url }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 key that client bearer tokens are signed with.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this since no previously issued token will be accepted. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                         you are doing it wrong! Set the FPG_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret. ");
            },
        }
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self { jwt_secret: Secret::new(jwt_secret.to_string()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("FPG_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [FPG_JWT_SECRET]")))?;
        let jwt_secret = Secret::new(secret);
        if jwt_secret.is_blank() {
            return Err(ServerError::ConfigurationError("FPG_JWT_SECRET is empty".to_string()));
        }
        Ok(Self { jwt_secret })
    }
}

//-------------------------------------------------  WebhookConfig  ----------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    /// When true, callbacks must carry a valid `X-Webhook-Signature` header.
    pub hmac_checks: bool,
    pub hmac_secret: Secret<String>,
}

impl WebhookConfig {
    pub fn from_env_or_default() -> Self {
        let hmac_checks = env_flag("FPG_WEBHOOK_HMAC_CHECKS", false);
        let hmac_secret = Secret::new(env::var("FPG_WEBHOOK_HMAC_SECRET").ok().unwrap_or_default());
        match (hmac_checks, hmac_secret.is_blank()) {
            (true, true) => error!(
                "🪛️ FPG_WEBHOOK_HMAC_CHECKS is on, but FPG_WEBHOOK_HMAC_SECRET is not set. Every gateway callback will \
                 be rejected."
            ),
            (true, false) => info!("🪛️ Webhook HMAC checks are enabled."),
            (false, _) => info!("🪛️ Webhook HMAC checks are disabled. Gateway callbacks will not be authenticated."),
        }
        Self { hmac_checks, hmac_secret }
    }
}

//-------------------------------------------------  CorsConfig  -------------------------------------------------------
/// The browser origins that may call the API, e.g. the trustee dashboard. An entry of `*` allows any origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list(DEFAULT_CORS_ORIGINS)
    }
}

impl CorsConfig {
    /// Reads a comma-separated list of origins. Entries that are not `*` or an http(s) origin are skipped.
    pub fn from_list(origins: &str) -> Self {
        let allowed_origins = origins
            .split(',')
            .map(|o| o.trim().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .filter(|o| {
                let valid = *o == "*" || o.starts_with("http://") || o.starts_with("https://");
                if !valid {
                    warn!("🪛️ '{o}' is not a valid CORS origin. It will be ignored.");
                }
                valid
            })
            .map(String::from)
            .collect();
        Self { allowed_origins }
    }

    pub fn from_env_or_default() -> Self {
        match env::var("FPG_CORS_ORIGINS") {
            Ok(origins) => {
                let config = Self::from_list(&origins);
                if config.allowed_origins.is_empty() {
                    warn!("🪛️ FPG_CORS_ORIGINS lists no valid origins. Browsers will not be able to call the API.");
                }
                config
            },
            Err(_) => {
                info!("🪛️ FPG_CORS_ORIGINS is not set. Using {DEFAULT_CORS_ORIGINS}.");
                Self::default()
            },
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

//-------------------------------------------------  ProxyConfig  ------------------------------------------------------
/// A subset of the server configuration that controls how the remote address of a caller is determined. It carries
/// no secrets, so it can be handed to route handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ProxyConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}

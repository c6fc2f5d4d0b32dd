use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    http::{header, KeepAlive},
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use fee_payment_engine::{
    traits::OrderManagement,
    PaymentRequestApi,
    SqliteDatabase,
    TransactionApi,
    WebhookApi,
};
use log::*;

use crate::{
    auth::TokenVerifier,
    config::{CorsConfig, ProxyConfig, ServerConfig},
    errors::ServerError,
    integrations::GatewayClient,
    middleware::HmacMiddlewareFactory,
    routes::{
        health,
        CreatePaymentRoute,
        SchoolTransactionsRoute,
        TransactionStatusRoute,
        TransactionsRoute,
        WebhookRoute,
    },
};

/// The header that carries the signature of a gateway callback when HMAC checks are enabled.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Webhook-Signature";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    match db.repair_orphaned_orders().await {
        Ok(0) => trace!("💻️ Every order has a status record"),
        Ok(n) => info!("💻️ Created pending status records for {n} orders that had none"),
        Err(e) => return Err(ServerError::InitializeError(e.to_string())),
    }
    let gateway = GatewayClient::new(config.gateway.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: GatewayClient,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let proxy = ProxyConfig::from_config(&config);
    let srv = HttpServer::new(move || {
        let payments_api = PaymentRequestApi::new(db.clone(), gateway.clone(), config.issuer.clone());
        let webhook_api = WebhookApi::new(db.clone());
        let transactions_api = TransactionApi::new(db.clone());
        let verifier = TokenVerifier::new(&config.auth);
        let webhook_scope = web::scope("/api/webhook")
            .wrap(HmacMiddlewareFactory::new(
                WEBHOOK_SIGNATURE_HEADER,
                config.webhook.hmac_secret.clone(),
                config.webhook.hmac_checks,
            ))
            .service(WebhookRoute::<SqliteDatabase>::new());
        let api_scope = web::scope("/api")
            .service(CreatePaymentRoute::<SqliteDatabase, GatewayClient>::new())
            .service(TransactionsRoute::<SqliteDatabase>::new())
            .service(SchoolTransactionsRoute::<SqliteDatabase>::new())
            .service(TransactionStatusRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(cors_policy(&config.cors))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fpg::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(webhook_api))
            .app_data(web::Data::new(transactions_api))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(proxy))
            .service(health)
            .service(webhook_scope)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// The cross-origin policy for browser clients. Credentials and the `Authorization` header are allowed, so that the
/// dashboard can send bearer tokens.
pub fn cors_policy(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600);
    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

/// JSON bodies are read whatever their content type, and unreadable bodies are reported in the usual error format.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}

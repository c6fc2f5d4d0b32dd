use std::sync::Arc;

use chrono::Utc;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::GatewayConfig,
    data_objects::{CollectRequestPayload, CollectRequestResponse, SignedCollectRequest},
    helpers::sign_payload,
    GatewayApiError,
};

#[derive(Clone)]
pub struct GatewayApi {
    config: GatewayConfig,
    client: Arc<Client>,
}

impl GatewayApi {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, GatewayApiError> {
        let url = self.url(path);
        trace!("🌐️ Sending POST request: {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🌐️ POST request successful. {}", response.status());
            response.json::<Value>().await.map_err(|e| GatewayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| GatewayApiError::RestResponseError(e.to_string()))?;
            Err(GatewayApiError::QueryError { status, message })
        }
    }

    /// Asks the gateway to open a collection for a payment. The request body carries the payload in the clear,
    /// together with an HS256 signature over it made with the PG key.
    pub async fn create_collect_request(
        &self,
        payload: CollectRequestPayload,
    ) -> Result<CollectRequestResponse, GatewayApiError> {
        let sign = sign_payload(&payload, self.config.pg_key.reveal(), Utc::now().timestamp())?;
        let school_id = payload.school_id.clone();
        let request = SignedCollectRequest { payload, sign };
        debug!("🌐️ Creating collect request for school {school_id}, amount {}", request.payload.amount);
        let result = self.post("/create-collect-request", &request).await?;
        let response = CollectRequestResponse::from(result);
        info!("🌐️ Collect request created. Redirect: {}", response.redirect_url.as_deref().unwrap_or("none"));
        Ok(response)
    }
}

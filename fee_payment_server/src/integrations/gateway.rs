use fee_payment_engine::traits::{CollectRequest, CollectResponse, GatewayError, PaymentGateway};
use gateway_tools::{CollectRequestPayload, GatewayApi, GatewayApiError, GatewayConfig};
use log::*;

/// Exposes the gateway client to the engine as a [`PaymentGateway`].
#[derive(Clone)]
pub struct GatewayClient {
    api: GatewayApi,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayApiError> {
        let api = GatewayApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for GatewayClient {
    async fn create_collect_request(&self, request: CollectRequest) -> Result<CollectResponse, GatewayError> {
        let CollectRequest { school_id, amount, callback_url } = request;
        let payload = CollectRequestPayload { school_id, amount, callback_url };
        let response = self.api.create_collect_request(payload).await.map_err(|e| {
            warn!("🌐️ Collect request failed. {e}");
            to_gateway_error(e)
        })?;
        Ok(CollectResponse { payload: response.payload, redirect_url: response.redirect_url })
    }
}

fn to_gateway_error(e: GatewayApiError) -> GatewayError {
    match e {
        GatewayApiError::SigningError(s) => GatewayError::SigningError(s),
        GatewayApiError::QueryError { status, message } => GatewayError::Rejected { status, message },
        GatewayApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        GatewayApiError::RestResponseError(s) | GatewayApiError::Initialization(s) => GatewayError::TransportError(s),
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The payment parameters sent to the gateway. The amount is the decimal string in major units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectRequest {
    pub school_id: String,
    pub amount: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectResponse {
    /// The gateway's response body, verbatim.
    pub payload: Value,
    /// Where the payer should be sent to complete the payment, if the gateway supplied it.
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not sign the gateway request. {0}")]
    SigningError(String),
    #[error("Could not reach the payment gateway. {0}")]
    TransportError(String),
    #[error("The payment gateway rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("The payment gateway sent an unreadable response. {0}")]
    InvalidResponse(String),
}

/// The outbound payment gateway.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Asks the gateway to open a collection for the given payment. The response carries the hosted payment page.
    async fn create_collect_request(&self, request: CollectRequest) -> Result<CollectResponse, GatewayError>;
}

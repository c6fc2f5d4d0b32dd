use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helpers::extract_redirect_url;

/// The payment parameters of a collect request. The amount is a decimal string in major currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectRequestPayload {
    pub school_id: String,
    pub amount: String,
    pub callback_url: String,
}

/// The claims signed into the `sign` field of a collect request: the payload plus the time of signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectRequestClaims {
    #[serde(flatten)]
    pub payload: CollectRequestPayload,
    pub iat: i64,
}

/// The body posted to `create-collect-request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCollectRequest {
    #[serde(flatten)]
    pub payload: CollectRequestPayload,
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectRequestResponse {
    /// The response body, verbatim.
    pub payload: Value,
    pub redirect_url: Option<String>,
}

impl From<Value> for CollectRequestResponse {
    fn from(payload: Value) -> Self {
        let redirect_url = extract_redirect_url(&payload);
        Self { payload, redirect_url }
    }
}

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use crate::{CollectRequestClaims, CollectRequestPayload, GatewayApiError};

/// Signs a collect request payload as an HS256 JWT, the way the gateway expects to find it in the `sign` field.
pub fn sign_payload(payload: &CollectRequestPayload, key: &str, iat: i64) -> Result<String, GatewayApiError> {
    let claims = CollectRequestClaims { payload: payload.clone(), iat };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(key.as_bytes()))
        .map_err(|e| GatewayApiError::SigningError(e.to_string()))
}

/// The hosted payment page in a collect request response. The gateway has used both capitalisations of the key.
pub fn extract_redirect_url(response: &Value) -> Option<String> {
    ["Collect_request_url", "collect_request_url"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_str))
        .filter(|url| !url.is_empty())
        .map(String::from)
}

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use fpg_common::FeeAmount;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db_types::{GatewayResultCode, OrderStatusUpdate, PaymentStatus, WebhookLog};

//--------------------------------------   WebhookPayload    ---------------------------------------------------------
/// The envelope of a gateway callback: a result code and, usually, an `order_info` object.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    /// The result code, if one could be read. Codes sent as numeric strings are read too.
    pub status: Option<GatewayResultCode>,
    pub order_info: Option<Value>,
    pub raw: Value,
}

impl WebhookPayload {
    /// Reads the envelope of a callback body. Any JSON value is accepted, so that every callback can be logged.
    pub fn from_json(raw: Value) -> Self {
        let status = raw.get("status").and_then(result_code);
        let order_info = raw.get("order_info").filter(|v| !v.is_null()).cloned();
        Self { status, order_info, raw }
    }

    /// Whether the callback should be applied to an order: a numeric 200 result code and some order information.
    /// A code sent as a string is logged, but never applied.
    pub fn is_reconcilable(&self) -> bool {
        let numeric = matches!(self.raw.get("status"), Some(Value::Number(_)));
        numeric && self.status.is_some_and(|code| code.is_success()) && self.order_info.is_some()
    }
}

fn result_code(value: &Value) -> Option<GatewayResultCode> {
    let integral = |f: f64| (f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64);
    let code = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(integral),
        _ => None,
    };
    code.map(GatewayResultCode)
}

//--------------------------------------  WebhookOrderInfo   ---------------------------------------------------------
/// The order fields reported by the gateway in a callback. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookOrderInfo {
    pub order_id: Option<String>,
    pub order_amount: Option<FeeAmount>,
    pub transaction_amount: Option<FeeAmount>,
    pub gateway: Option<String>,
    pub bank_reference: Option<String>,
    pub status: Option<PaymentStatus>,
    pub payment_mode: Option<String>,
    pub payment_details: Option<String>,
    pub payment_message: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

// The gateway has shipped misspelt keys (`payemnt_details`, `Payment_message`). Both spellings are read, and the
// misspelt one wins when it carries a value.
#[derive(Debug, Default, Deserialize)]
struct RawOrderInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    order_id: Option<String>,
    #[serde(default)]
    order_amount: Option<FeeAmount>,
    #[serde(default)]
    transaction_amount: Option<FeeAmount>,
    #[serde(default, deserialize_with = "lenient_text")]
    gateway: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    bank_reference: Option<String>,
    #[serde(default)]
    status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "lenient_text")]
    payment_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    payment_details: Option<String>,
    #[serde(default, rename = "payemnt_details", deserialize_with = "lenient_text")]
    payment_details_misspelt: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    payment_message: Option<String>,
    #[serde(default, rename = "Payment_message", deserialize_with = "lenient_text")]
    payment_message_capitalised: Option<String>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    payment_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_text")]
    error_message: Option<String>,
}

impl From<RawOrderInfo> for WebhookOrderInfo {
    fn from(raw: RawOrderInfo) -> Self {
        let prefer = |a: Option<String>, b: Option<String>| a.filter(|s| !s.is_empty()).or(b);
        Self {
            order_id: raw.order_id,
            order_amount: raw.order_amount,
            transaction_amount: raw.transaction_amount,
            gateway: raw.gateway,
            bank_reference: raw.bank_reference,
            status: raw.status,
            payment_mode: raw.payment_mode,
            payment_details: prefer(raw.payment_details_misspelt, raw.payment_details),
            payment_message: prefer(raw.payment_message_capitalised, raw.payment_message),
            payment_time: raw.payment_time,
            error_message: raw.error_message,
        }
    }
}

impl WebhookOrderInfo {
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let raw = serde_json::from_value::<RawOrderInfo>(value.clone()).map_err(|e| e.to_string())?;
        Ok(raw.into())
    }

    /// The status fields to apply to the order. Fields the gateway left out are not touched.
    pub fn status_update(&self) -> OrderStatusUpdate {
        OrderStatusUpdate {
            order_amount: self.order_amount,
            transaction_amount: self.transaction_amount,
            payment_mode: self.payment_mode.clone(),
            payment_details: self.payment_details.clone(),
            bank_reference: self.bank_reference.clone(),
            payment_message: self.payment_message.clone(),
            status: self.status,
            error_message: self.error_message.clone(),
            payment_time: self.payment_time,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        v => Err(de::Error::custom(format!("expected text, but got {v}"))),
    }
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => parse_timestamp(&s).map(Some).map_err(de::Error::custom),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("{n} is not a valid epoch timestamp"))),
        v => Err(de::Error::custom(format!("expected a timestamp, but got {v}"))),
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("'{s}' is not a valid timestamp"))
}

//--------------------------------------   WebhookOutcome    ---------------------------------------------------------
/// What happened to a logged callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The order's status record was updated and the log flagged as processed.
    Reconciled { order_id: i64, status: PaymentStatus },
    /// The callback did not carry a numeric success code and order information, so it was only logged.
    NotApplicable(Option<GatewayResultCode>),
    /// No order matches the reported reference.
    OrderNotFound(String),
    /// The `order_info` object could not be read.
    InvalidOrderInfo(String),
    /// The update could not be stored. The log stays unprocessed.
    ReconciliationFailed(String),
}

impl Display for WebhookOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookOutcome::Reconciled { order_id, status } => write!(f, "order #{order_id} is now {status}"),
            WebhookOutcome::NotApplicable(Some(code)) => write!(f, "not applied to any order (result code {code})"),
            WebhookOutcome::NotApplicable(None) => write!(f, "not applied to any order (no result code)"),
            WebhookOutcome::OrderNotFound(reference) => write!(f, "no order matches '{reference}'"),
            WebhookOutcome::InvalidOrderInfo(e) => write!(f, "order info is unreadable. {e}"),
            WebhookOutcome::ReconciliationFailed(e) => write!(f, "reconciliation failed. {e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookReport {
    pub log: WebhookLog,
    pub outcome: WebhookOutcome,
}

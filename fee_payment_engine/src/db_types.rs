//! Records stored by the payment engine, and the inputs used to create them.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fpg_common::FeeAmount;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   CustomOrderId     ---------------------------------------------------------
/// The external-facing reference of an order. Assigned once, before the order is first stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct CustomOrderId(pub String);

impl CustomOrderId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CustomOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for CustomOrderId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------    StudentInfo      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StudentInfo {
    #[sqlx(rename = "student_name")]
    pub name: String,
    #[sqlx(rename = "student_id")]
    pub id: String,
    #[sqlx(rename = "student_email")]
    pub email: String,
}

//--------------------------------------       Order         ---------------------------------------------------------
/// A payment request initiated by a trustee on behalf of a student. Orders are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub custom_order_id: CustomOrderId,
    pub school_id: String,
    pub trustee_id: String,
    #[sqlx(flatten)]
    pub student_info: StudentInfo,
    pub gateway_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub school_id: String,
    pub trustee_id: String,
    pub student_info: StudentInfo,
    pub gateway_name: String,
}

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The payment request has been issued, and the gateway has not reported an outcome yet.
    #[default]
    Pending,
    Success,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Success => write!(f, "success"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid payment status: {0}")]
pub struct PaymentStatusParseError(pub String);

impl FromStr for PaymentStatus {
    type Err = PaymentStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(PaymentStatusParseError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PaymentStatus::from_str(&s).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------    OrderStatus      ---------------------------------------------------------
/// The mutable financial outcome of exactly one order, keyed by `collect_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OrderStatus {
    pub id: i64,
    pub collect_id: i64,
    pub order_amount: FeeAmount,
    pub transaction_amount: FeeAmount,
    pub payment_mode: String,
    pub payment_details: String,
    pub bank_reference: String,
    pub payment_message: String,
    pub status: PaymentStatus,
    pub error_message: String,
    pub payment_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A partial update to an [`OrderStatus`]. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub order_amount: Option<FeeAmount>,
    pub transaction_amount: Option<FeeAmount>,
    pub payment_mode: Option<String>,
    pub payment_details: Option<String>,
    pub bank_reference: Option<String>,
    pub payment_message: Option<String>,
    pub status: Option<PaymentStatus>,
    pub error_message: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
}

/// The result of applying an [`OrderStatusUpdate`]: the status before the update (if a status row existed), and the
/// stored record afterwards.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: Option<PaymentStatus>,
    pub current: OrderStatus,
}

//-------------------------------------- GatewayResultCode   ---------------------------------------------------------
/// The numeric result code a gateway attaches to a callback. This is a transport-level code (200 means the gateway
/// is reporting an outcome), and is unrelated to [`PaymentStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct GatewayResultCode(pub i64);

impl GatewayResultCode {
    pub const OK: GatewayResultCode = GatewayResultCode(200);

    pub fn is_success(&self) -> bool {
        *self == Self::OK
    }
}

impl Display for GatewayResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------    WebhookLog       ---------------------------------------------------------
/// Audit record of one inbound gateway callback.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct WebhookLog {
    pub id: i64,
    pub webhook_id: String,
    /// `None` when the callback carried no readable result code.
    pub status: Option<GatewayResultCode>,
    /// JSON snapshot of the order fields reported by the gateway, if they could be read.
    pub order_info: Option<String>,
    pub processed: bool,
    /// The callback body, verbatim.
    pub raw_payload: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebhookLog {
    pub status: Option<GatewayResultCode>,
    pub order_info: Option<String>,
    pub raw_payload: String,
}

use fpg_common::FeeAmount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    db_types::{CustomOrderId, Order, OrderStatus, StudentInfo},
    helpers::{is_valid_email, is_valid_uri},
};

pub const DEFAULT_GATEWAY_NAME: &str = "Edviron Payment Gateway";
pub const DEFAULT_CALLBACK_URL: &str = "https://google.com";

/// Fixed parameters stamped onto every payment request issued by this server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerConfig {
    pub school_id: String,
    pub gateway_name: String,
    /// Used when the client does not supply a callback URL.
    pub default_callback_url: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            school_id: String::default(),
            gateway_name: DEFAULT_GATEWAY_NAME.to_string(),
            default_callback_url: DEFAULT_CALLBACK_URL.to_string(),
        }
    }
}

/// A payment request that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequestInput {
    pub amount: FeeAmount,
    pub student_info: StudentInfo,
    /// `None` when the client did not ask for a specific callback.
    pub callback_url: Option<String>,
}

impl PaymentRequestInput {
    /// Validates a raw `create-payment` body.
    ///
    /// Fields are checked in the order `amount`, `student_info` (`name`, `id`, `email`), `callback_url`, then any
    /// unexpected keys. Validation stops at the first violation, whose message is returned.
    pub fn from_json(body: &Value) -> Result<Self, String> {
        let body = body.as_object().ok_or_else(|| r#""value" must be of type object"#.to_string())?;
        let amount = validate_amount(body.get("amount"))?;
        let student_info = validate_student_info(body.get("student_info"))?;
        let callback_url = match body.get("callback_url") {
            None => None,
            Some(v) => {
                let url = required_string("callback_url", Some(v))?;
                if !is_valid_uri(&url) {
                    return Err(r#""callback_url" must be a valid uri"#.to_string());
                }
                Some(url)
            },
        };
        reject_unknown_keys("", body, &["amount", "student_info", "callback_url"])?;
        Ok(Self { amount, student_info, callback_url })
    }
}

fn validate_amount(value: Option<&Value>) -> Result<FeeAmount, String> {
    let not_a_number = || r#""amount" must be a number"#.to_string();
    let major = match value {
        None => return Err(r#""amount" is required"#.to_string()),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(not_a_number)?,
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().parse::<f64>().map_err(|_| not_a_number())?,
        Some(_) => return Err(not_a_number()),
    };
    if !major.is_finite() {
        return Err(not_a_number());
    }
    if major <= 0.0 {
        return Err(r#""amount" must be a positive number"#.to_string());
    }
    let amount = FeeAmount::try_from_major_f64(major).map_err(|_| r#""amount" must be a safe number"#.to_string())?;
    if !amount.is_positive() {
        // Positive, but smaller than the smallest currency unit
        return Err(r#""amount" must be a positive number"#.to_string());
    }
    Ok(amount)
}

fn validate_student_info(value: Option<&Value>) -> Result<StudentInfo, String> {
    let info = match value {
        None => return Err(r#""student_info" is required"#.to_string()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(r#""student_info" must be of type object"#.to_string()),
    };
    let name = required_string("student_info.name", info.get("name"))?;
    let id = required_string("student_info.id", info.get("id"))?;
    let email = required_string("student_info.email", info.get("email"))?;
    if !is_valid_email(&email) {
        return Err(r#""student_info.email" must be a valid email"#.to_string());
    }
    reject_unknown_keys("student_info.", info, &["name", "id", "email"])?;
    Ok(StudentInfo { name, id, email })
}

fn required_string(label: &str, value: Option<&Value>) -> Result<String, String> {
    match value {
        None => Err(format!(r#""{label}" is required"#)),
        Some(Value::String(s)) if s.is_empty() => Err(format!(r#""{label}" is not allowed to be empty"#)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!(r#""{label}" must be a string"#)),
    }
}

fn reject_unknown_keys(prefix: &str, map: &Map<String, Value>, allowed: &[&str]) -> Result<(), String> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(format!(r#""{prefix}{key}" is not allowed"#)),
        None => Ok(()),
    }
}

/// The outcome of a successfully issued payment request.
#[derive(Debug, Clone)]
pub struct PaymentRequestResult {
    pub order: Order,
    pub status: OrderStatus,
    pub custom_order_id: CustomOrderId,
    /// The gateway's response, verbatim.
    pub payment_data: Value,
    pub redirect_url: Option<String>,
}

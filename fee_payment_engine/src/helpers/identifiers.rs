use uuid::Uuid;

use crate::db_types::CustomOrderId;

pub const CUSTOM_ORDER_ID_PREFIX: &str = "ORD_";
pub const WEBHOOK_ID_PREFIX: &str = "WH_";

/// Generates a fresh external order reference, e.g. `ORD_3f2c...`.
///
/// Uniqueness is enforced by the database. Callers retry with a new id if an insert collides.
pub fn new_custom_order_id() -> CustomOrderId {
    CustomOrderId(format!("{CUSTOM_ORDER_ID_PREFIX}{}", Uuid::new_v4().simple()))
}

pub fn new_webhook_id() -> String {
    format!("{WEBHOOK_ID_PREFIX}{}", Uuid::new_v4().simple())
}

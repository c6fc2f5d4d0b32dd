use chrono::Utc;
use log::{debug, trace, warn};
use sqlx::SqliteConnection;

use super::{is_unique_violation, MAX_ID_ATTEMPTS};
use crate::{
    db_types::{CustomOrderId, NewOrder, Order},
    helpers::new_custom_order_id,
    traits::PaymentsDbError,
};

/// Inserts a new order under a freshly generated `custom_order_id`. If the id is already taken, a new one is drawn
/// and the insert retried.
///
/// This is not atomic on its own. Embed the call inside a transaction, passing `&mut tx` as the connection argument,
/// if the order must be written together with other records.
pub async fn insert_order(order: &NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentsDbError> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let custom_order_id = new_custom_order_id();
        match insert_order_with_id(order, &custom_order_id, &mut *conn).await {
            Ok(order) => {
                debug!("📝️ Order [{}] inserted with id {}", order.custom_order_id, order.id);
                return Ok(order);
            },
            Err(e) if is_unique_violation(&e) => {
                warn!("📝️ Order reference {custom_order_id} is already taken (attempt {attempt}). Trying another.");
            },
            Err(e) => return Err(e.into()),
        }
    }
    Err(PaymentsDbError::IdentifierExhausted("custom_order_id", MAX_ID_ATTEMPTS))
}

async fn insert_order_with_id(
    order: &NewOrder,
    custom_order_id: &CustomOrderId,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as(
        r#"
            INSERT INTO orders (
                custom_order_id,
                school_id,
                trustee_id,
                student_name,
                student_id,
                student_email,
                gateway_name,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *;
        "#,
    )
    .bind(custom_order_id.as_str())
    .bind(&order.school_id)
    .bind(&order.trustee_id)
    .bind(&order.student_info.name)
    .bind(&order.student_info.id)
    .bind(&order.student_info.email)
    .bind(&order.gateway_name)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_custom_order_id(
    custom_order_id: &CustomOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE custom_order_id = $1")
        .bind(custom_order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Resolves a gateway-supplied order reference. A numeric reference is tried as the internal id first, then every
/// reference is tried as a `custom_order_id`.
pub async fn fetch_order_by_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    if let Ok(id) = reference.parse::<i64>() {
        if let Some(order) = fetch_order_by_id(id, &mut *conn).await? {
            trace!("📝️ Order reference '{reference}' matched internal id {id}");
            return Ok(Some(order));
        }
    }
    fetch_order_by_custom_order_id(&CustomOrderId::from(reference), conn).await
}

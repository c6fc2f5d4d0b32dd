use chrono::Utc;
use fpg_common::FeeAmount;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{OrderStatus, OrderStatusUpdate, PaymentStatus},
    traits::PaymentsDbError,
};

/// Inserts the initial `pending` status record for an order. Both amounts are set to `amount`.
pub async fn insert_pending_status(
    order_id: i64,
    amount: FeeAmount,
    conn: &mut SqliteConnection,
) -> Result<OrderStatus, sqlx::Error> {
    let now = Utc::now();
    let status = sqlx::query_as(
        r#"
            INSERT INTO order_statuses (
                collect_id,
                order_amount,
                transaction_amount,
                status,
                payment_time,
                created_at,
                updated_at
            ) VALUES ($1, $2, $2, $3, $4, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(amount)
    .bind(PaymentStatus::Pending)
    .bind(now)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Pending status created for order #{order_id}");
    Ok(status)
}

pub async fn fetch_status_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderStatus>, sqlx::Error> {
    let status = sqlx::query_as("SELECT * FROM order_statuses WHERE collect_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(status)
}

pub async fn fetch_current_status(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentStatus>, sqlx::Error> {
    sqlx::query_scalar("SELECT status FROM order_statuses WHERE collect_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await
}

/// Sets the status of an order to `failed`, with `reason` as the error message.
pub async fn mark_failed(
    order_id: i64,
    reason: &str,
    conn: &mut SqliteConnection,
) -> Result<OrderStatus, PaymentsDbError> {
    let result: Option<OrderStatus> = sqlx::query_as(
        "UPDATE order_statuses SET status = $1, error_message = $2, updated_at = $3 WHERE collect_id = $4 RETURNING *",
    )
    .bind(PaymentStatus::Failed)
    .bind(reason)
    .bind(Utc::now())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(PaymentsDbError::OrderIdNotFound(order_id))
}

/// Writes the gateway-reported fields to an order's status record, creating the record if it is missing.
/// Fields that are `None` in `update` keep their stored value.
pub async fn upsert_status(
    order_id: i64,
    update: &OrderStatusUpdate,
    conn: &mut SqliteConnection,
) -> Result<OrderStatus, sqlx::Error> {
    let now = Utc::now();
    let status = sqlx::query_as(
        r#"
            INSERT INTO order_statuses (
                collect_id,
                order_amount,
                transaction_amount,
                payment_mode,
                payment_details,
                bank_reference,
                payment_message,
                status,
                error_message,
                payment_time,
                created_at,
                updated_at
            ) VALUES (
                $1,
                COALESCE($2, 0),
                COALESCE($3, 0),
                COALESCE($4, ''),
                COALESCE($5, ''),
                COALESCE($6, ''),
                COALESCE($7, ''),
                COALESCE($8, 'pending'),
                COALESCE($9, ''),
                COALESCE($10, $11),
                $11,
                $11
            )
            ON CONFLICT (collect_id) DO UPDATE SET
                order_amount = COALESCE($2, order_statuses.order_amount),
                transaction_amount = COALESCE($3, order_statuses.transaction_amount),
                payment_mode = COALESCE($4, order_statuses.payment_mode),
                payment_details = COALESCE($5, order_statuses.payment_details),
                bank_reference = COALESCE($6, order_statuses.bank_reference),
                payment_message = COALESCE($7, order_statuses.payment_message),
                status = COALESCE($8, order_statuses.status),
                error_message = COALESCE($9, order_statuses.error_message),
                payment_time = COALESCE($10, order_statuses.payment_time),
                updated_at = $11
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(update.order_amount)
    .bind(update.transaction_amount)
    .bind(update.payment_mode.as_deref())
    .bind(update.payment_details.as_deref())
    .bind(update.bank_reference.as_deref())
    .bind(update.payment_message.as_deref())
    .bind(update.status)
    .bind(update.error_message.as_deref())
    .bind(update.payment_time)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Status of order #{order_id} updated");
    Ok(status)
}

/// Gives every order without a status record a `pending` one. Returns the number of records created.
pub async fn insert_missing_statuses(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
            INSERT INTO order_statuses (collect_id, order_amount, transaction_amount, status, payment_time, created_at, updated_at)
            SELECT o.id, 0, 0, 'pending', $1, $1, $1
            FROM orders o LEFT JOIN order_statuses s ON s.collect_id = o.id
            WHERE s.id IS NULL;
        "#,
    )
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

use chrono::Utc;
use log::{trace, warn};
use sqlx::SqliteConnection;

use super::{is_unique_violation, MAX_ID_ATTEMPTS};
use crate::{
    db_types::{NewWebhookLog, WebhookLog},
    helpers::new_webhook_id,
    traits::PaymentsDbError,
};

/// Appends a callback to the webhook log under a freshly generated `webhook_id`, retrying on collisions.
pub async fn insert_webhook_log(
    log: &NewWebhookLog,
    conn: &mut SqliteConnection,
) -> Result<WebhookLog, PaymentsDbError> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let webhook_id = new_webhook_id();
        let now = Utc::now();
        let result = sqlx::query_as(
            r#"
                INSERT INTO webhook_logs (webhook_id, status, order_info, processed, raw_payload, created_at, updated_at)
                VALUES ($1, $2, $3, FALSE, $4, $5, $5)
                RETURNING *;
            "#,
        )
        .bind(&webhook_id)
        .bind(log.status)
        .bind(log.order_info.as_deref())
        .bind(&log.raw_payload)
        .bind(now)
        .fetch_one(&mut *conn)
        .await;
        match result {
            Ok(entry) => {
                trace!("📝️ Webhook log {webhook_id} inserted");
                return Ok(entry);
            },
            Err(e) if is_unique_violation(&e) => {
                warn!("📝️ Webhook id {webhook_id} is already taken (attempt {attempt}). Trying another.");
            },
            Err(e) => return Err(e.into()),
        }
    }
    Err(PaymentsDbError::IdentifierExhausted("webhook_id", MAX_ID_ATTEMPTS))
}

pub async fn mark_processed(id: i64, conn: &mut SqliteConnection) -> Result<(), PaymentsDbError> {
    let result = sqlx::query("UPDATE webhook_logs SET processed = TRUE, updated_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(PaymentsDbError::DatabaseError(format!("Webhook log #{id} does not exist")));
    }
    Ok(())
}

pub async fn fetch_webhook_log(id: i64, conn: &mut SqliteConnection) -> Result<Option<WebhookLog>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM webhook_logs WHERE id = $1").bind(id).fetch_optional(conn).await
}

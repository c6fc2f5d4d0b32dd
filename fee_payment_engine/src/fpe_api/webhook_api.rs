use std::fmt::Debug;

use log::*;
use serde_json::Value;

use crate::{
    db_types::{NewWebhookLog, WebhookLog},
    fpe_api::{
        errors::WebhookError,
        webhook_objects::{WebhookOrderInfo, WebhookOutcome, WebhookPayload, WebhookReport},
    },
    traits::WebhookManagement,
};

/// `WebhookApi` records gateway callbacks and reconciles them against order status records.
pub struct WebhookApi<B> {
    db: B,
}

impl<B> Debug for WebhookApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookApi")
    }
}

impl<B> WebhookApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> WebhookApi<B>
where B: WebhookManagement
{
    /// Handles one gateway callback.
    ///
    /// The callback is always written to the webhook log first, even when its result code cannot be read. Only then,
    /// and only for a numeric success result code with order information, is the matching order's status updated. Once the log is written, every later problem
    /// (unknown order, unreadable order info, a failed update) is reported in the returned [`WebhookOutcome`] rather
    /// than as an error, and leaves the log unprocessed.
    ///
    /// Calling this twice with the same payload writes two log entries. Applying the same update twice leaves the
    /// status record unchanged.
    pub async fn process_webhook(&self, body: Value) -> Result<WebhookReport, WebhookError> {
        let payload = WebhookPayload::from_json(body);
        let order_info = payload.order_info.as_ref().map(WebhookOrderInfo::from_json);
        let snapshot = match &order_info {
            Some(Ok(info)) => serde_json::to_string(info).ok(),
            _ => None,
        };
        let raw_payload = payload.raw.to_string();
        let log = self
            .db
            .insert_webhook_log(NewWebhookLog { status: payload.status, order_info: snapshot, raw_payload })
            .await
            .map_err(|e| {
                error!("🔄️🪝️ Could not write webhook log. {e}");
                WebhookError::LogWriteFailed(e)
            })?;
        match log.status {
            Some(code) => debug!("🔄️🪝️ Webhook {} logged with result code {code}", log.webhook_id),
            None => warn!("🔄️🪝️ Webhook {} logged without a readable result code", log.webhook_id),
        }
        let reconcilable = payload.is_reconcilable();
        let outcome = match order_info {
            Some(info) if reconcilable => match info {
                Ok(info) => self.reconcile(&log, info).await,
                Err(e) => WebhookOutcome::InvalidOrderInfo(e),
            },
            _ => WebhookOutcome::NotApplicable(payload.status),
        };
        match &outcome {
            WebhookOutcome::Reconciled { .. } => info!("🔄️🪝️ Webhook {}: {outcome}", log.webhook_id),
            WebhookOutcome::NotApplicable(_) => debug!("🔄️🪝️ Webhook {}: {outcome}", log.webhook_id),
            WebhookOutcome::ReconciliationFailed(_) => error!("🔄️🪝️ Webhook {}: {outcome}", log.webhook_id),
            _ => warn!("🔄️🪝️ Webhook {}: {outcome}", log.webhook_id),
        }
        Ok(WebhookReport { log, outcome })
    }

    async fn reconcile(&self, log: &WebhookLog, info: WebhookOrderInfo) -> WebhookOutcome {
        let reference = match info.order_id.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => r.to_string(),
            None => return WebhookOutcome::OrderNotFound(String::default()),
        };
        let order = match self.db.fetch_order_by_reference(&reference).await {
            Ok(Some(order)) => order,
            Ok(None) => return WebhookOutcome::OrderNotFound(reference),
            Err(e) => return WebhookOutcome::ReconciliationFailed(e.to_string()),
        };
        let update = info.status_update();
        match self.db.apply_webhook_update(order.id, log.id, update).await {
            Ok(change) => {
                let current = change.current.status;
                if let Some(previous) = change.previous.filter(|p| p.is_terminal() && *p != current) {
                    warn!(
                        "🔄️🪝️ Order [{}] was already {previous}. The gateway has now reported it as {current}.",
                        order.custom_order_id
                    );
                }
                WebhookOutcome::Reconciled { order_id: order.id, status: current }
            },
            Err(e) => WebhookOutcome::ReconciliationFailed(e.to_string()),
        }
    }
}

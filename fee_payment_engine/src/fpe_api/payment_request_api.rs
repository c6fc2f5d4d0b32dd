use std::fmt::Debug;

use log::*;
use serde_json::Value;

use crate::{
    db_types::NewOrder,
    fpe_api::{
        errors::PaymentRequestError,
        payment_objects::{IssuerConfig, PaymentRequestInput, PaymentRequestResult},
    },
    traits::{CollectRequest, OrderManagement, PaymentGateway},
};

/// `PaymentRequestApi` issues payment requests: it records the order and its pending status, then asks the gateway
/// for a hosted payment page.
pub struct PaymentRequestApi<B, G> {
    db: B,
    gateway: G,
    config: IssuerConfig,
}

impl<B, G> Debug for PaymentRequestApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentRequestApi ({})", self.config.gateway_name)
    }
}

impl<B, G> PaymentRequestApi<B, G> {
    pub fn new(db: B, gateway: G, config: IssuerConfig) -> Self {
        Self { db, gateway, config }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }
}

impl<B, G> PaymentRequestApi<B, G>
where
    B: OrderManagement,
    G: PaymentGateway,
{
    /// Validates and issues a payment request on behalf of `trustee_id`.
    ///
    /// Invalid input is rejected before anything is stored. Otherwise, the order and its `pending` status are stored
    /// atomically, and the gateway is called. Repeated calls create distinct orders.
    ///
    /// If the gateway call fails, the order is kept and its status is moved to `failed`, with the gateway error as
    /// the error message.
    pub async fn create_payment_request(
        &self,
        trustee_id: &str,
        body: &Value,
    ) -> Result<PaymentRequestResult, PaymentRequestError> {
        let input = PaymentRequestInput::from_json(body).map_err(|e| {
            debug!("🔄️🧾️ Payment request from trustee {trustee_id} rejected. {e}");
            PaymentRequestError::ValidationError(e)
        })?;
        let amount = input.amount;
        let callback_url = input.callback_url.unwrap_or_else(|| self.config.default_callback_url.clone());
        let new_order = NewOrder {
            school_id: self.config.school_id.clone(),
            trustee_id: trustee_id.to_string(),
            student_info: input.student_info,
            gateway_name: self.config.gateway_name.clone(),
        };
        let (order, status) = self.db.insert_order_with_pending_status(new_order, amount).await?;
        debug!(
            "🔄️🧾️ Order #{} [{}] stored for {amount}, paid by trustee {trustee_id}",
            order.id, order.custom_order_id
        );
        let request =
            CollectRequest { school_id: self.config.school_id.clone(), amount: amount.to_gateway_string(), callback_url };
        let response = match self.gateway.create_collect_request(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("🔄️🧾️ Gateway call for order [{}] failed. {e}", order.custom_order_id);
                if let Err(db_err) = self.db.mark_order_failed(order.id, &e.to_string()).await {
                    error!(
                        "🔄️🧾️ Could not mark order [{}] as failed after the gateway error. {db_err}",
                        order.custom_order_id
                    );
                }
                return Err(e.into());
            },
        };
        if response.redirect_url.is_none() {
            warn!("🔄️🧾️ The gateway did not return a payment page for order [{}]", order.custom_order_id);
        }
        info!("🔄️🧾️ Payment request for order [{}] issued", order.custom_order_id);
        let custom_order_id = order.custom_order_id.clone();
        Ok(PaymentRequestResult {
            order,
            status,
            custom_order_id,
            payment_data: response.payload,
            redirect_url: response.redirect_url,
        })
    }
}

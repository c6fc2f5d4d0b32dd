//! Signature checks for gateway callbacks.
//!
//! When enabled, a callback must carry the base64-encoded HMAC-SHA256 of its raw body, keyed with
//! `FPG_WEBHOOK_HMAC_SECRET`, in the configured header (`X-Webhook-Signature`). Callbacks that fail the check get a
//! `403 Forbidden` before the handler runs, so they never reach the webhook log.
//!
//! The check is off by default, in which case requests pass straight through and the body is left unread.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    http::header::HeaderValue,
    web,
    Error,
};
use fpg_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::helpers::verify_hmac;

/// Everything the middleware needs to judge a request. Shared between workers' service instances.
struct SignatureRules {
    header: String,
    secret: Secret<String>,
    enabled: bool,
}

impl SignatureRules {
    fn check(&self, signature: Option<&HeaderValue>, body: &[u8]) -> Result<(), Error> {
        let signature = signature.ok_or_else(|| ErrorForbidden("No HMAC signature found."))?;
        if self.secret.is_blank() {
            warn!("🔐️ No HMAC secret is configured, so no signature can be valid.");
            return Err(ErrorForbidden("Invalid HMAC signature."));
        }
        let signature = signature.to_str().map_err(|_| ErrorForbidden("Invalid HMAC signature."))?;
        if verify_hmac(self.secret.reveal(), body, signature) {
            Ok(())
        } else {
            Err(ErrorForbidden("Invalid HMAC signature."))
        }
    }
}

pub struct HmacMiddlewareFactory {
    rules: Rc<SignatureRules>,
}

impl HmacMiddlewareFactory {
    pub fn new(header: &str, secret: Secret<String>, enabled: bool) -> Self {
        let rules = SignatureRules { header: header.to_string(), secret, enabled };
        Self { rules: Rc::new(rules) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService { rules: Rc::clone(&self.rules), service: Rc::new(service) }))
    }
}

pub struct HmacMiddlewareService<S> {
    rules: Rc<SignatureRules>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let rules = Rc::clone(&self.rules);
        Box::pin(async move {
            if !rules.enabled {
                return service.call(req).await;
            }
            let body = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Could not read the body of a request to {}. {e}", req.path());
                ErrorBadRequest("Failed to extract request data.")
            })?;
            if let Err(e) = rules.check(req.headers().get(&rules.header), body.as_ref()) {
                warn!("🔐️ Denying request to {}. {e}", req.path());
                return Err(e);
            }
            trace!("🔐️ Signature of request to {} is valid", req.path());
            // The body was consumed by the check, so hand the handler a fresh copy
            req.set_payload(replay(body));
            service.call(req).await
        })
    }
}

fn replay(body: web::Bytes) -> Payload {
    let (_, mut payload) = h1::Payload::create(true);
    payload.unread_data(body);
    Payload::from(payload)
}

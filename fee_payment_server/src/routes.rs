//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (database calls, the gateway
//! request) is therefore awaited, never blocked on.
//!
//! Every `/api` route apart from the gateway callback takes a [`JwtClaims`] argument. It is listed first, so that
//! unauthenticated calls are turned away before the body is read or the database is touched.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use fee_payment_engine::{
    db_types::CustomOrderId,
    transaction_objects::TransactionListParams,
    traits::{OrderManagement, PaymentGateway, TransactionQueries, WebhookManagement},
    PaymentRequestApi,
    TransactionApi,
    WebhookApi,
};
use log::*;
use serde_json::Value;

use crate::{
    auth::JwtClaims,
    config::ProxyConfig,
    data_objects::{
        MessageResponse,
        PaymentRequestResponse,
        SchoolPagingParams,
        SchoolTransactionsResponse,
        TransactionStatusResponse,
    },
    errors::ServerError,
    helpers::get_remote_ip,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(create_payment => Post "/create-payment" impl OrderManagement, PaymentGateway);
/// Route handler for issuing a payment request.
///
/// The body carries `amount`, `student_info` (`name`, `id`, `email`) and an optional `callback_url`. The order is
/// stored against the authenticated trustee, and the gateway's payment page is returned in `redirect_url`.
pub async fn create_payment<B, G>(
    claims: JwtClaims,
    body: web::Json<Value>,
    api: web::Data<PaymentRequestApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    G: PaymentGateway,
{
    debug!("💻️ POST create-payment for trustee {}", claims.sub);
    let result = api.create_payment_request(&claims.sub, &body).await?;
    Ok(HttpResponse::Ok().json(PaymentRequestResponse::from(result)))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(webhook => Post "" impl WebhookManagement);
/// Route handler for gateway callbacks.
///
/// This route is not authenticated with a bearer token. The gateway is told that the callback was handled as soon as
/// it has been logged, whether or not an order was updated.
pub async fn webhook<B: WebhookManagement>(
    req: HttpRequest,
    body: web::Json<Value>,
    proxy: web::Data<ProxyConfig>,
    api: web::Data<WebhookApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let peer = get_remote_ip(&req, proxy.use_x_forwarded_for, proxy.use_forwarded)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "an unknown address".to_string());
    info!("💻️ Received webhook from {peer}");
    let report = api.process_webhook(body.into_inner()).await?;
    trace!("💻️ Webhook {} handled: {}", report.log.webhook_id, report.outcome);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Webhook processed successfully")))
}

//----------------------------------------------   Transactions  ----------------------------------------------------
route!(transactions => Get "/transactions" impl TransactionQueries);
pub async fn transactions<B: TransactionQueries>(
    claims: JwtClaims,
    params: web::Query<TransactionListParams>,
    api: web::Data<TransactionApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET transactions for {}. {:?}", claims.sub, params);
    let page = api.list_transactions(&params).await?;
    Ok(HttpResponse::Ok().json(page))
}

route!(school_transactions => Get "/transactions/school/{school_id}" impl TransactionQueries);
pub async fn school_transactions<B: TransactionQueries>(
    claims: JwtClaims,
    path: web::Path<String>,
    params: web::Query<SchoolPagingParams>,
    api: web::Data<TransactionApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let school_id = path.into_inner();
    debug!("💻️ GET transactions of school {school_id} for {}", claims.sub);
    let page = api.list_school_transactions(&school_id, params.paging()).await?;
    Ok(HttpResponse::Ok().json(SchoolTransactionsResponse { school_id, page }))
}

route!(transaction_status => Get "/transaction-status/{custom_order_id}" impl TransactionQueries);
pub async fn transaction_status<B: TransactionQueries>(
    claims: JwtClaims,
    path: web::Path<CustomOrderId>,
    api: web::Data<TransactionApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let custom_order_id = path.into_inner();
    debug!("💻️ GET transaction status of [{custom_order_id}] for {}", claims.sub);
    let detail = api.transaction_status(&custom_order_id).await?;
    Ok(HttpResponse::Ok().json(TransactionStatusResponse::from(detail)))
}

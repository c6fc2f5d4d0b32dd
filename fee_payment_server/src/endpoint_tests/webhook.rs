use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use fee_payment_engine::{
    db_types::{PaymentStatus, StatusChange},
    PaymentsDbError,
    WebhookApi,
};
use fpg_common::{FeeAmount, Secret};

use super::{
    helpers::{is_success_code, order, order_status, post_request, send, webhook_log},
    mocks::MockWebhookManager,
};
use crate::{
    config::ProxyConfig,
    helpers::calculate_hmac,
    middleware::HmacMiddlewareFactory,
    routes::WebhookRoute,
    server::WEBHOOK_SIGNATURE_HEADER,
};

const HMAC_SECRET: &str = "webhook-tests-only";

const SUCCESS_CALLBACK: &str = r#"{
    "status": 200,
    "order_info": {
        "order_id": "ORD_1",
        "order_amount": 1500,
        "transaction_amount": 1500,
        "gateway": "PhonePe",
        "bank_reference": "YESBNK222",
        "status": "success",
        "payment_mode": "upi",
        "payemnt_details": "success@ybl",
        "Payment_message": "payment success",
        "payment_time": "2024-10-19T08:45:00.000Z",
        "error_message": "NA"
    }
}"#;

fn configure(db: MockWebhookManager, hmac_checks: bool) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let hmac = HmacMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, Secret::new(HMAC_SECRET.into()), hmac_checks);
        cfg.app_data(web::Data::new(WebhookApi::new(db)))
            .app_data(web::Data::new(ProxyConfig::default()))
            .service(web::scope("/api/webhook").wrap(hmac).service(WebhookRoute::<MockWebhookManager>::new()));
    }
}

fn logging_db(expected_calls: usize) -> MockWebhookManager {
    let mut db = MockWebhookManager::new();
    db.expect_insert_webhook_log().times(expected_calls).returning(|log| Ok(webhook_log(7, log)));
    db
}

#[actix_web::test]
async fn reconciled_webhook() {
    let _ = env_logger::try_init().ok();
    let mut db = MockWebhookManager::new();
    db.expect_insert_webhook_log()
        .withf(|log| is_success_code(log) && log.order_info.is_some() && log.raw_payload.contains("YESBNK222"))
        .times(1)
        .returning(|log| Ok(webhook_log(7, log)));
    db.expect_fetch_order_by_reference().withf(|r| r.to_string() == "ORD_1").times(1).returning(|r| Ok(Some(order(42, r))));
    db.expect_apply_webhook_update()
        .withf(|order_id, log_id, update| {
            *order_id == 42 &&
                *log_id == 7 &&
                update.status == Some(PaymentStatus::Success) &&
                update.payment_details.as_deref() == Some("success@ybl") &&
                update.payment_message.as_deref() == Some("payment success")
        })
        .times(1)
        .returning(|order_id, _, _| {
            let current = order_status(order_id, PaymentStatus::Success, FeeAmount::from_major(1500));
            Ok(StatusChange { previous: Some(PaymentStatus::Pending), current })
        });
    let (status, body) = post_request("", "/api/webhook", SUCCESS_CALLBACK, configure(db, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Webhook processed successfully"}"#);
}

#[actix_web::test]
async fn webhook_for_unknown_order_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut db = logging_db(1);
    db.expect_fetch_order_by_reference().times(1).returning(|_| Ok(None));
    let (status, body) = post_request("", "/api/webhook", SUCCESS_CALLBACK, configure(db, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Webhook processed successfully"}"#);
}

#[actix_web::test]
async fn failed_result_codes_are_only_logged() {
    let _ = env_logger::try_init().ok();
    let body = r#"{ "status": 400, "order_info": { "order_id": "ORD_1", "status": "failed" } }"#;
    let (status, _) = post_request("", "/api/webhook", body, configure(logging_db(1), false)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn malformed_webhooks_are_logged_and_acknowledged() {
    let _ = env_logger::try_init().ok();
    for body in [r#"{ "order_info": {} }"#, r#"{ "status": "ok" }"#, "[200]"] {
        let mut db = MockWebhookManager::new();
        db.expect_insert_webhook_log()
            .withf(|log| log.status.is_none() && log.order_info.is_none())
            .times(1)
            .returning(|log| Ok(webhook_log(7, log)));
        let (status, response) = post_request("", "/api/webhook", body, configure(db, false)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(response, r#"{"message":"Webhook processed successfully"}"#);
    }
    // A string result code is logged, but never applied to an order
    let body = r#"{ "status": "200", "order_info": { "order_id": "ORD_1", "status": "success" } }"#;
    let mut db = MockWebhookManager::new();
    db.expect_insert_webhook_log().withf(is_success_code).times(1).returning(|log| Ok(webhook_log(7, log)));
    let (status, _) = post_request("", "/api/webhook", body, configure(db, false)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_request("", "/api/webhook", "status=200", configure(logging_db(0), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn webhook_log_failure() {
    let _ = env_logger::try_init().ok();
    let mut db = MockWebhookManager::new();
    db.expect_insert_webhook_log().times(1).returning(|_| Err(PaymentsDbError::DatabaseError("database is locked".into())));
    let (status, body) = post_request("", "/api/webhook", SUCCESS_CALLBACK, configure(db, false)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("database is locked"), "{body}");
}

#[actix_web::test]
async fn signed_webhooks() {
    let _ = env_logger::try_init().ok();
    let body = r#"{ "status": 202 }"#;
    let (status, _) = post_request("", "/api/webhook", body, configure(logging_db(0), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri("/api/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, calculate_hmac("not-the-secret", body.as_bytes())))
        .set_payload(body);
    let (status, _) = send(req, "", configure(logging_db(0), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::post()
        .uri("/api/webhook")
        .insert_header((WEBHOOK_SIGNATURE_HEADER, calculate_hmac(HMAC_SECRET, body.as_bytes())))
        .set_payload(body);
    let (status, body) = send(req, "", configure(logging_db(1), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Webhook processed successfully"}"#);
}

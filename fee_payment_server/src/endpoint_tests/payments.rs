use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use fee_payment_engine::{
    db_types::PaymentStatus,
    payment_objects::IssuerConfig,
    traits::{CollectResponse, GatewayError},
    PaymentRequestApi,
};
use fpg_common::FeeAmount;
use serde_json::{json, Value};

use super::{
    helpers::{bearer, issue_token, order, order_status, post_request, valid_token},
    mocks::{MockGateway, MockOrderManager},
};
use crate::routes::CreatePaymentRoute;

const BODY: &str = r#"{
    "amount": 1500,
    "student_info": { "name": "Asha Rao", "id": "STU-001", "email": "asha@school.edu" }
}"#;

fn issuer() -> IssuerConfig {
    IssuerConfig {
        school_id: "65b0e6293e9f76a9694d84b4".into(),
        gateway_name: "Edviron Payment Gateway".into(),
        default_callback_url: "https://google.com".into(),
    }
}

fn configure(db: MockOrderManager, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = PaymentRequestApi::new(db, gateway, issuer());
        cfg.app_data(web::Data::new(api))
            .service(web::scope("/api").service(CreatePaymentRoute::<MockOrderManager, MockGateway>::new()));
    }
}

#[actix_web::test]
async fn create_payment_without_token() {
    let _ = env_logger::try_init().ok();
    // Neither mock has expectations, so any call into them fails the test
    let (status, body) =
        post_request("", "/api/create-payment", BODY, configure(MockOrderManager::new(), MockGateway::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. No bearer token was supplied."}"#);
}

#[actix_web::test]
async fn create_payment_with_expired_token() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("trustee-7", Utc::now() - Duration::hours(2));
    let (status, body) = post_request(
        &bearer(&token),
        "/api/create-payment",
        BODY,
        configure(MockOrderManager::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Access token is invalid"), "{body}");
}

#[actix_web::test]
async fn create_payment_with_invalid_body() {
    let _ = env_logger::try_init().ok();
    let token = bearer(&valid_token());
    let body = r#"{ "student_info": { "name": "Asha Rao", "id": "STU-001", "email": "asha@school.edu" } }"#;
    let (status, body) =
        post_request(&token, "/api/create-payment", body, configure(MockOrderManager::new(), MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"\"amount\" is required"}"#);

    let body = r#"{ "amount": 10, "student_info": { "name": "Asha Rao", "id": "STU-001", "email": "asha" } }"#;
    let (status, body) =
        post_request(&token, "/api/create-payment", body, configure(MockOrderManager::new(), MockGateway::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"\"student_info.email\" must be a valid email"}"#);

    let (status, body) = post_request(
        &token,
        "/api/create-payment",
        "{ this is not json",
        configure(MockOrderManager::new(), MockGateway::new()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#), "{body}");
}

#[actix_web::test]
async fn create_payment() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_insert_order_with_pending_status()
        .withf(|order, amount| {
            order.trustee_id == "trustee-7" &&
                order.school_id == "65b0e6293e9f76a9694d84b4" &&
                order.student_info.id == "STU-001" &&
                *amount == FeeAmount::from_major(1500)
        })
        .times(1)
        .returning(|_, amount| {
            Ok((order(42, "ORD_0f6c1f0e4d0a4a2c9e4b7c2d5e6f7a8b"), order_status(42, PaymentStatus::Pending, amount)))
        });
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_collect_request()
        .withf(|req| req.amount == "1500" && req.callback_url == "https://google.com")
        .times(1)
        .returning(|_| {
            Ok(CollectResponse {
                payload: json!({
                    "collect_request_id": "6720d1f0a1b2c3d4e5f60718",
                    "Collect_request_url": "https://pay.example.com/collect/6720d1f0"
                }),
                redirect_url: Some("https://pay.example.com/collect/6720d1f0".into()),
            })
        });
    let (status, body) =
        post_request(&bearer(&valid_token()), "/api/create-payment", BODY, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Payment request created successfully");
    assert_eq!(body["order_id"], 42);
    assert_eq!(body["custom_order_id"], "ORD_0f6c1f0e4d0a4a2c9e4b7c2d5e6f7a8b");
    assert_eq!(body["payment_data"]["collect_request_id"], "6720d1f0a1b2c3d4e5f60718");
    assert_eq!(body["redirect_url"], "https://pay.example.com/collect/6720d1f0");
}

#[actix_web::test]
async fn create_payment_when_gateway_fails() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_insert_order_with_pending_status()
        .times(1)
        .returning(|_, amount| Ok((order(43, "ORD_1"), order_status(43, PaymentStatus::Pending, amount))));
    db.expect_mark_order_failed()
        .withf(|id, reason| *id == 43 && reason.contains("Invalid API key"))
        .times(1)
        .returning(|id, reason| {
            let mut status = order_status(id, PaymentStatus::Failed, FeeAmount::from_major(1500));
            status.error_message = reason.to_string();
            Ok(status)
        });
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_collect_request()
        .times(1)
        .returning(|_| Err(GatewayError::Rejected { status: 401, message: "Invalid API key".into() }));
    let (status, body) =
        post_request(&bearer(&valid_token()), "/api/create-payment", BODY, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to create payment request."), "{error}");
}

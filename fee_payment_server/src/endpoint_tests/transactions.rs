use actix_web::{http::StatusCode, web, web::ServiceConfig};
use fee_payment_engine::{
    db_types::{PaymentStatus, StudentInfo},
    transaction_objects::{SortField, SortOrder, TransactionDetail, TransactionSummary},
    TransactionApi,
};
use fpg_common::FeeAmount;
use serde_json::Value;

use super::{
    helpers::{bearer, get_request, timestamp, valid_token},
    mocks::MockTransactionQuerier,
};
use crate::routes::{SchoolTransactionsRoute, TransactionStatusRoute, TransactionsRoute};

const SCHOOL_ID: &str = "65b0e6293e9f76a9694d84b4";

fn configure(db: MockTransactionQuerier) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(TransactionApi::new(db))).service(
            web::scope("/api")
                .service(TransactionsRoute::<MockTransactionQuerier>::new())
                .service(SchoolTransactionsRoute::<MockTransactionQuerier>::new())
                .service(TransactionStatusRoute::<MockTransactionQuerier>::new()),
        );
    }
}

fn summary(collect_id: i64, name: &str, status: Option<PaymentStatus>) -> TransactionSummary {
    TransactionSummary {
        collect_id,
        school_id: SCHOOL_ID.into(),
        gateway: "Edviron Payment Gateway".into(),
        custom_order_id: format!("ORD_{collect_id}").into(),
        student_name: name.into(),
        student_email: format!("{}@school.edu", name.to_lowercase()),
        order_amount: status.map(|_| FeeAmount::from_major(1500)),
        transaction_amount: status.map(|_| FeeAmount::from(150_050)),
        status,
        payment_mode: status.map(|_| "upi".into()),
        payment_time: status.map(|_| timestamp()),
        bank_reference: None,
    }
}

#[actix_web::test]
async fn transactions_require_a_token() {
    let _ = env_logger::try_init().ok();
    for path in ["/api/transactions", "/api/transactions/school/abc", "/api/transaction-status/ORD_1"] {
        let (status, body) = get_request("", path, configure(MockTransactionQuerier::new())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert!(body.contains("No bearer token"), "{body}");
    }
    let (status, _) =
        get_request("Bearer not.a.token", "/api/transactions", configure(MockTransactionQuerier::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_transactions() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transactions()
        .withf(|q| {
            q.sort == SortField::OrderAmount &&
                q.order == SortOrder::Asc &&
                q.paging.page == 2 &&
                q.paging.limit == 2 &&
                q.filter.is_empty()
        })
        .times(1)
        .returning(|_| Ok(vec![summary(3, "Hiro", Some(PaymentStatus::Success)), summary(4, "Bea", None)]));
    db.expect_count_transactions().times(1).returning(|_| Ok(5));
    let path = "/api/transactions?page=2&limit=2&sort=order_amount&order=asc";
    let (status, body) = get_request(&bearer(&valid_token()), path, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["pagination"]["current_page"], 2);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["total_records"], 5);
    assert_eq!(body["pagination"]["limit"], 2);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["student_name"], "Hiro");
    assert_eq!(transactions[0]["status"], "success");
    assert_eq!(transactions[0]["order_amount"], 1500);
    assert_eq!(transactions[0]["transaction_amount"], 1500.5);
    assert_eq!(transactions[1]["custom_order_id"], "ORD_4");
    assert!(transactions[1]["status"].is_null());
    assert!(transactions[1]["payment_time"].is_null());
}

#[actix_web::test]
async fn list_transactions_with_defaults() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transactions()
        .withf(|q| {
            q.sort == SortField::PaymentTime &&
                q.order == SortOrder::Desc &&
                q.paging.page == 1 &&
                q.paging.limit == 10 &&
                q.filter.status == Some(PaymentStatus::Pending)
        })
        .times(1)
        .returning(|_| Ok(vec![]));
    db.expect_count_transactions().times(1).returning(|_| Ok(0));
    let path = "/api/transactions?page=abc&limit=-1&sort=password&status=pending";
    let (status, body) = get_request(&bearer(&valid_token()), path, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"transactions":[],"pagination":{"current_page":1,"total_pages":0,"total_records":0,"limit":10}}"#
    );
}

#[actix_web::test]
async fn list_transactions_with_a_huge_limit() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transactions()
        .withf(|q| q.paging.page == 1 && q.paging.limit == i64::MAX && q.paging.offset() == 0)
        .times(1)
        .returning(|_| Ok(vec![summary(1, "Jabu", Some(PaymentStatus::Pending)), summary(2, "Amara", None)]));
    db.expect_count_transactions().times(1).returning(|_| Ok(5));
    let path = "/api/transactions?limit=9223372036854775807";
    let (status, body) = get_request(&bearer(&valid_token()), path, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["pagination"]["total_pages"], 1);
    assert_eq!(body["pagination"]["total_records"], 5);
    assert_eq!(body["pagination"]["limit"], i64::MAX);
}

#[actix_web::test]
async fn list_transactions_with_unknown_status() {
    let _ = env_logger::try_init().ok();
    let path = "/api/transactions?status=refunded";
    let (status, body) = get_request(&bearer(&valid_token()), path, configure(MockTransactionQuerier::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("refunded"), "{body}");
}

#[actix_web::test]
async fn school_transactions() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transactions()
        .withf(|q| {
            q.filter.school_id.as_deref() == Some(SCHOOL_ID) &&
                q.sort == SortField::PaymentTime &&
                q.order == SortOrder::Desc &&
                q.paging.limit == 1
        })
        .times(1)
        .returning(|_| Ok(vec![summary(9, "Gita", Some(PaymentStatus::Pending))]));
    db.expect_count_transactions().withf(|f| f.school_id.as_deref() == Some(SCHOOL_ID)).times(1).returning(|_| Ok(3));
    let path = format!("/api/transactions/school/{SCHOOL_ID}?limit=1&sort=student_name");
    let (status, body) = get_request(&bearer(&valid_token()), &path, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["school_id"], SCHOOL_ID);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["transactions"][0]["student_name"], "Gita");
}

#[actix_web::test]
async fn transaction_status() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transaction_detail()
        .withf(|id| id.as_str() == "ORD_42")
        .times(1)
        .returning(|id| {
            Ok(Some(TransactionDetail {
                collect_id: 42,
                custom_order_id: id.clone(),
                school_id: SCHOOL_ID.into(),
                student_info: StudentInfo {
                    name: "Asha Rao".into(),
                    id: "STU-001".into(),
                    email: "asha@school.edu".into(),
                },
                gateway: "Edviron Payment Gateway".into(),
                order_amount: Some(FeeAmount::from_major(1500)),
                transaction_amount: Some(FeeAmount::from_major(1500)),
                status: Some(PaymentStatus::Success),
                payment_mode: Some("upi".into()),
                payment_details: Some("success@ybl".into()),
                bank_reference: Some("YESBNK222".into()),
                payment_message: Some("payment success".into()),
                error_message: Some("NA".into()),
                payment_time: Some(timestamp()),
            }))
        });
    let (status, body) = get_request(&bearer(&valid_token()), "/api/transaction-status/ORD_42", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Transaction status retrieved successfully");
    assert_eq!(body["transaction"]["collect_id"], 42);
    assert_eq!(body["transaction"]["student_info"]["email"], "asha@school.edu");
    assert_eq!(body["transaction"]["bank_reference"], "YESBNK222");
    assert_eq!(body["transaction"]["payment_time"], "2024-10-19T08:30:00Z");
}

#[actix_web::test]
async fn transaction_status_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockTransactionQuerier::new();
    db.expect_fetch_transaction_detail().times(1).returning(|_| Ok(None));
    let (status, body) = get_request(&bearer(&valid_token()), "/api/transaction-status/ORD_nope", configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Transaction not found"}"#);
}

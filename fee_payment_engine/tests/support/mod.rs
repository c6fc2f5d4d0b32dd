#![allow(dead_code)]
use std::{
    env,
    sync::{Arc, Mutex},
};

use fee_payment_engine::{
    payment_objects::IssuerConfig,
    traits::{CollectRequest, CollectResponse, GatewayError},
    PaymentGateway,
    SqliteDatabase,
};
use log::*;
use serde_json::{json, Value};
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub const SCHOOL_ID: &str = "65b0e6293e9f76a9694d84b4";
pub const TRUSTEE_ID: &str = "65b0e552dd31950a9b41c5ba";

/// Creates a fresh, migrated database in the temp directory and returns a handle to it.
pub async fn prepare_test_env() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let url = random_db_path();
    create_database(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    info!("🚀️ Test database ready at {url}");
    db
}

pub fn random_db_path() -> String {
    let dir = env::temp_dir();
    format!("sqlite://{}/fpe_test_store_{}.db", dir.display(), rand::random::<u64>())
}

async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        Sqlite::drop_database(url).await.expect("Error dropping database");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
}

pub fn issuer_config() -> IssuerConfig {
    IssuerConfig { school_id: SCHOOL_ID.to_string(), ..Default::default() }
}

pub fn payment_body(amount: i64, name: &str) -> Value {
    json!({
        "amount": amount,
        "student_info": {
            "name": name,
            "id": format!("STU-{name}"),
            "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        }
    })
}

/// A payment gateway that records every request it receives, and either accepts or rejects them all.
#[derive(Clone, Default)]
pub struct StubGateway {
    reject: bool,
    requests: Arc<Mutex<Vec<CollectRequest>>>,
}

impl StubGateway {
    pub fn rejecting() -> Self {
        Self { reject: true, ..Default::default() }
    }

    pub fn requests(&self) -> Vec<CollectRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PaymentGateway for StubGateway {
    async fn create_collect_request(&self, request: CollectRequest) -> Result<CollectResponse, GatewayError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        if self.reject {
            return Err(GatewayError::Rejected { status: 401, message: "Invalid API key".to_string() });
        }
        let n = self.requests().len();
        let redirect = format!("https://pay.example.com/collect/{n}");
        Ok(CollectResponse {
            payload: json!({ "collect_request_id": format!("CR-{n}"), "Collect_request_url": redirect }),
            redirect_url: Some(redirect),
        })
    }
}

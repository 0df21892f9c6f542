#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use tradestock_api::{
    auth::{RequestContext, ROLES_HEADER, STORE_ID_HEADER, USER_ID_HEADER},
    config::AppConfig,
    db,
    entities::{update_token, warehouse},
    events::{self, EventSender},
    handlers::AppServices,
    services::purchase_orders::{NewPurchaseOrder, ReceivedQuantities},
    AppState,
};

/// Helper harness for spinning up an application state backed by an
/// on-disk SQLite database unique to the test.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub user_id: Uuid,
    pub store_id: Uuid,
    db_file: PathBuf,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file =
            std::env::temp_dir().join(format!("tradestock_test_{}.db", Uuid::new_v4().simple()));

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Some(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", tradestock_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            user_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            db_file,
            _event_task: event_task,
        }
    }

    /// Caller context holding every operational role.
    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(
            self.user_id,
            self.store_id,
            vec![
                "purchasing".to_string(),
                "sales".to_string(),
                "finance".to_string(),
            ],
        )
    }

    /// Seeds a warehouse belonging to the test caller's store.
    pub async fn seed_warehouse(&self) -> warehouse::Model {
        self.seed_warehouse_for_store(self.store_id).await
    }

    /// Seeds a warehouse for an arbitrary store.
    pub async fn seed_warehouse_for_store(&self, store_id: Uuid) -> warehouse::Model {
        let now = Utc::now();
        warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_id: Set(store_id),
            name: Set("Main warehouse".to_string()),
            address: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed warehouse for tests")
    }

    /// Seeds an unused update token with the given opaque value.
    pub async fn seed_token(&self, value: &str) -> update_token::Model {
        update_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(value.to_string()),
            status: Set("unused".to_string()),
            used_by: Set(None),
            used_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed update token for tests")
    }

    /// Send a request against the router with caller-identity headers.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        roles: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, self.user_id.to_string())
            .header(STORE_ID_HEADER, self.store_id.to_string());

        if let Some(roles) = roles {
            builder = builder.header(ROLES_HEADER, roles);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request without any caller-identity headers.
    pub async fn request_anonymous(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
        let _ = std::fs::remove_file(&self.db_file);
    }
}

pub fn order_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
}

pub fn received_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 8).expect("valid date")
}

/// Builds a purchase-order input with integral quantities, which survive
/// the SQLite round trip exactly.
pub fn new_po_input(warehouse_id: Uuid, sku: &str) -> NewPurchaseOrder {
    NewPurchaseOrder {
        contact_id: Uuid::new_v4(),
        warehouse_id,
        sku: sku.to_string(),
        item_name: "Cotton combed 30s".to_string(),
        grade: Some("A".to_string()),
        description: Some("First-grade batch".to_string()),
        thickness: Some("30s".to_string()),
        attachment: None,
        order_date: order_date(),
        stock_roll: Decimal::from(100),
        stock_kg: Decimal::from(50),
        stock_rib: Decimal::from(20),
        price: Decimal::from(1000),
    }
}

pub fn qty(roll: i64, kg: i64, rib: i64) -> ReceivedQuantities {
    ReceivedQuantities {
        stock_roll: Decimal::from(roll),
        stock_kg: Decimal::from(kg),
        stock_rib: Decimal::from(rib),
    }
}

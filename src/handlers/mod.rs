pub mod common;
pub mod purchase_orders;
pub mod sales_orders;
pub mod settlements;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub purchase_orders: Arc<crate::services::purchase_orders::PurchaseOrderService>,
    pub sales_orders: Arc<crate::services::sales_orders::SalesOrderService>,
    pub settlements: Arc<crate::services::settlements::SettlementService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        let purchase_orders = Arc::new(
            crate::services::purchase_orders::PurchaseOrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
        );
        let sales_orders = Arc::new(crate::services::sales_orders::SalesOrderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let settlements = Arc::new(crate::services::settlements::SettlementService::new(
            db_pool,
            event_sender,
        ));

        Self {
            purchase_orders,
            sales_orders,
            settlements,
        }
    }
}

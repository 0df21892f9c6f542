use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the core after a transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Purchase intake
    PurchaseOrderCreated(Uuid),
    PurchaseOrderReceived {
        purchase_order_id: Uuid,
        bill_id: Uuid,
        status: String,
    },
    PurchaseOrderCorrected {
        purchase_order_id: Uuid,
        token_id: Uuid,
    },

    // Sales fulfillment
    SalesOrderCreated {
        sales_order_id: Uuid,
        invoice_id: Uuid,
        commission_id: Option<Uuid>,
    },
    SalesOrderReceived {
        sales_order_id: Uuid,
        status: String,
    },

    // Settlement
    BillPaymentApplied {
        bill_id: Uuid,
        paid_status: String,
    },
    InvoicePaymentApplied {
        invoice_id: Uuid,
        paid_status: String,
    },
    CommissionPaymentApplied {
        commission_id: Uuid,
        paid_status: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Event delivery is best-effort; the owning transaction has already
    /// committed by the time this is called.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!("Dropping event {:?}: {}", event, e);
        }
    }
}

/// Consumes events off the channel and logs them. Runs as a background task
/// for the lifetime of the process.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::PurchaseOrderCreated(id) => {
                info!(purchase_order_id = %id, "event: purchase order created")
            }
            Event::PurchaseOrderReceived {
                purchase_order_id,
                bill_id,
                status,
            } => {
                info!(%purchase_order_id, %bill_id, %status, "event: purchase order received")
            }
            Event::PurchaseOrderCorrected {
                purchase_order_id,
                token_id,
            } => {
                info!(%purchase_order_id, %token_id, "event: purchase order corrected")
            }
            Event::SalesOrderCreated {
                sales_order_id,
                invoice_id,
                commission_id,
            } => {
                info!(%sales_order_id, %invoice_id, ?commission_id, "event: sales order created")
            }
            Event::SalesOrderReceived {
                sales_order_id,
                status,
            } => {
                info!(%sales_order_id, %status, "event: sales order received")
            }
            Event::BillPaymentApplied { bill_id, paid_status } => {
                info!(%bill_id, %paid_status, "event: bill payment applied")
            }
            Event::InvoicePaymentApplied {
                invoice_id,
                paid_status,
            } => {
                info!(%invoice_id, %paid_status, "event: invoice payment applied")
            }
            Event::CommissionPaymentApplied {
                commission_id,
                paid_status,
            } => {
                info!(%commission_id, %paid_status, "event: commission payment applied")
            }
        }
    }

    info!("Event channel closed; event processor exiting");
}

//! Database entities for the trade-accounting core.
//!
//! One module per table. Quantities and money are `Decimal`; all primary
//! keys are UUIDv4 assigned by the service layer.

pub mod bill;
pub mod commission;
pub mod document_sequence;
pub mod invoice;
pub mod purchase_order;
pub mod sales_order;
pub mod update_token;
pub mod warehouse;

//! Document numbering.
//!
//! Human-readable document numbers come from a per-type counter row that is
//! locked and bumped inside the same transaction as the insert it numbers,
//! so two concurrent creates can never observe the same value. The numbers
//! are display identifiers only; uniqueness constraints live elsewhere.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, QuerySelect,
};
use strum::Display;

use crate::{entities::document_sequence, errors::ServiceError};

/// Document families with their own running sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentType {
    PurchaseOrder,
    SalesOrder,
    Invoice,
    Commission,
}

/// Direction tag embedded in delivery-order numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryDirection {
    Inbound,
    Outbound,
}

impl DeliveryDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "IN",
            Self::Outbound => "OUT",
        }
    }
}

/// Atomically advances the counter for `doc_type` and returns the new value.
/// Must be called inside the transaction that inserts the numbered document.
pub async fn next_value<C: ConnectionTrait>(
    conn: &C,
    doc_type: DocumentType,
) -> Result<i64, ServiceError> {
    let key = doc_type.to_string();

    let existing = document_sequence::Entity::find_by_id(key.clone())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?;

    match existing {
        Some(row) => {
            let next = row.last_value + 1;
            let mut active: document_sequence::ActiveModel = row.into();
            active.last_value = Set(next);
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(ServiceError::db_error)?;
            Ok(next)
        }
        None => {
            let row = document_sequence::ActiveModel {
                doc_type: Set(key),
                last_value: Set(1),
                updated_at: Set(Utc::now()),
            };
            row.insert(conn).await.map_err(ServiceError::db_error)?;
            Ok(1)
        }
    }
}

pub fn po_number(seq: i64) -> String {
    format!("PO{:05}", seq)
}

pub fn so_number(seq: i64) -> String {
    format!("SO{:05}", seq)
}

/// Delivery-order number; shares the sequence value of the purchase or
/// sales order it belongs to.
pub fn delivery_number(direction: DeliveryDirection, date: NaiveDate, seq: i64) -> String {
    format!("INV/{}/{}/{}", direction.as_str(), date.format("%Y/%m/%d"), seq)
}

pub fn invoice_number(date: NaiveDate, seq: i64) -> String {
    format!("INVOICE/{}/{}", date.format("%Y/%m/%d"), seq)
}

/// Commission document number. The prefix spelling is the established
/// external format and is kept as-is.
pub fn commission_number(date: NaiveDate, seq: i64) -> String {
    format!("COMMISIONS/{}/{}", date.format("%Y/%m/%d"), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()
    }

    #[test]
    fn order_numbers_are_zero_padded_to_five_digits() {
        assert_eq!(po_number(1), "PO00001");
        assert_eq!(po_number(42), "PO00042");
        assert_eq!(so_number(99_999), "SO99999");
        assert_eq!(so_number(100_000), "SO100000");
    }

    #[test]
    fn delivery_numbers_embed_direction_and_date() {
        assert_eq!(
            delivery_number(DeliveryDirection::Inbound, date(), 7),
            "INV/IN/2025/09/03/7"
        );
        assert_eq!(
            delivery_number(DeliveryDirection::Outbound, date(), 12),
            "INV/OUT/2025/09/03/12"
        );
    }

    #[test]
    fn settlement_document_numbers_embed_date() {
        assert_eq!(invoice_number(date(), 3), "INVOICE/2025/09/03/3");
        assert_eq!(commission_number(date(), 3), "COMMISIONS/2025/09/03/3");
    }

    #[test]
    fn document_type_keys_are_stable() {
        assert_eq!(DocumentType::PurchaseOrder.to_string(), "purchase_order");
        assert_eq!(DocumentType::SalesOrder.to_string(), "sales_order");
        assert_eq!(DocumentType::Invoice.to_string(), "invoice");
        assert_eq!(DocumentType::Commission.to_string(), "commission");
    }
}

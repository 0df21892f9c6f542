use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, QuerySelect, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        bill::{self, Entity as BillEntity},
        commission::{self, Entity as CommissionEntity},
        invoice::{self, Entity as InvoiceEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::PaidStatus,
};

/// A payment applied against a bill or invoice. The bank reference is only
/// written when supplied; an omitted field never blanks stored data.
#[derive(Debug, Clone, Copy)]
pub struct PaymentInput {
    pub amount: Decimal,
    pub bank_id: Option<Uuid>,
}

/// A payment applied against a commission, optionally carrying the broker's
/// payout account details.
#[derive(Debug, Clone)]
pub struct CommissionPaymentInput {
    pub amount: Decimal,
    pub bank_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
}

/// Derives the settlement state from cumulative payment vs. amount owed.
pub fn derive_paid_status(paid: Decimal, owed: Decimal) -> PaidStatus {
    if paid == owed {
        PaidStatus::Paid
    } else if paid > Decimal::ZERO && paid < owed {
        PaidStatus::PartiallyPaid
    } else {
        PaidStatus::Unpaid
    }
}

fn check_payment(paid: Decimal, amount: Decimal, owed: Decimal) -> Result<Decimal, ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "payment amount must be positive".to_string(),
        ));
    }
    if paid + amount > owed {
        return Err(ServiceError::ValidationError(format!(
            "payment {} exceeds amount owed ({} already paid of {})",
            amount, paid, owed
        )));
    }
    Ok(paid + amount)
}

/// Settlement: applies partial or full payments against bills, invoices,
/// and commissions, deriving their paid status. Each payment call is one
/// row-locked transaction, so concurrent payments against the same record
/// cannot jointly overpay.
#[derive(Clone)]
pub struct SettlementService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl SettlementService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Applies a payment toward a supplier bill.
    #[instrument(skip(self))]
    pub async fn pay_bill(
        &self,
        bill_id: Uuid,
        payment: PaymentInput,
    ) -> Result<bill::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let record = BillEntity::find_by_id(bill_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Bill {} not found", bill_id)))?;

        let new_paid = check_payment(record.payment, payment.amount, record.bill_price)?;
        let paid_status = derive_paid_status(new_paid, record.bill_price);

        let mut active: bill::ActiveModel = record.into();
        active.payment = Set(new_paid);
        if payment.bank_id.is_some() {
            active.bank_id = Set(payment.bank_id);
        }
        active.paid_status = Set(paid_status.to_string());
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::BillPaymentApplied {
                    bill_id,
                    paid_status: paid_status.to_string(),
                })
                .await;
        }

        info!(
            "Bill {} payment applied: {} (status: {})",
            bill_id, payment.amount, paid_status
        );

        Ok(updated)
    }

    /// Applies a payment toward a customer invoice.
    #[instrument(skip(self))]
    pub async fn pay_invoice(
        &self,
        invoice_id: Uuid,
        payment: PaymentInput,
    ) -> Result<invoice::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let record = InvoiceEntity::find_by_id(invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let new_paid = check_payment(record.paid_price, payment.amount, record.bill_price)?;
        let paid_status = derive_paid_status(new_paid, record.bill_price);

        let mut active: invoice::ActiveModel = record.into();
        active.paid_price = Set(new_paid);
        if payment.bank_id.is_some() {
            active.bank_id = Set(payment.bank_id);
        }
        active.paid_status = Set(paid_status.to_string());
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::InvoicePaymentApplied {
                    invoice_id,
                    paid_status: paid_status.to_string(),
                })
                .await;
        }

        info!(
            "Invoice {} payment applied: {} (status: {})",
            invoice_id, payment.amount, paid_status
        );

        Ok(updated)
    }

    /// Applies a payment toward a broker commission, optionally recording
    /// the broker's payout account details.
    #[instrument(skip(self, payment))]
    pub async fn pay_commission(
        &self,
        commission_id: Uuid,
        payment: CommissionPaymentInput,
    ) -> Result<commission::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let record = CommissionEntity::find_by_id(commission_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Commission {} not found", commission_id))
            })?;

        let new_paid = check_payment(record.payment, payment.amount, record.broker_fee)?;
        let paid_status = derive_paid_status(new_paid, record.broker_fee);

        let mut active: commission::ActiveModel = record.into();
        active.payment = Set(new_paid);
        if payment.bank_id.is_some() {
            active.bank_id = Set(payment.bank_id);
        }
        if payment.bank_name.is_some() {
            active.bank_name = Set(payment.bank_name);
        }
        if payment.account_name.is_some() {
            active.account_name = Set(payment.account_name);
        }
        if payment.account_number.is_some() {
            active.account_number = Set(payment.account_number);
        }
        active.paid_status = Set(paid_status.to_string());
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::CommissionPaymentApplied {
                    commission_id,
                    paid_status: paid_status.to_string(),
                })
                .await;
        }

        info!(
            "Commission {} payment applied: {} (status: {})",
            commission_id, payment.amount, paid_status
        );

        Ok(updated)
    }

    pub async fn get_bill(&self, id: Uuid) -> Result<Option<bill::Model>, ServiceError> {
        BillEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Option<invoice::Model>, ServiceError> {
        InvoiceEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn get_commission(
        &self,
        id: Uuid,
    ) -> Result<Option<commission::Model>, ServiceError> {
        CommissionEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn list_bills(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<bill::Model>, u64), ServiceError> {
        let paginator = BillEntity::find()
            .order_by_desc(bill::Column::CreatedAt)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn list_invoices(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<invoice::Model>, u64), ServiceError> {
        let paginator = InvoiceEntity::find()
            .order_by_desc(invoice::Column::CreatedAt)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn list_commissions(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<commission::Model>, u64), ServiceError> {
        let paginator = CommissionEntity::find()
            .order_by_desc(commission::Column::CreatedAt)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn paid_status_derivation() {
        assert_eq!(
            derive_paid_status(Decimal::ZERO, dec!(100)),
            PaidStatus::Unpaid
        );
        assert_eq!(
            derive_paid_status(dec!(40), dec!(100)),
            PaidStatus::PartiallyPaid
        );
        assert_eq!(derive_paid_status(dec!(100), dec!(100)), PaidStatus::Paid);
    }

    #[test]
    fn check_payment_rejects_non_positive_amounts() {
        assert!(check_payment(dec!(0), dec!(0), dec!(100)).is_err());
        assert!(check_payment(dec!(0), dec!(-5), dec!(100)).is_err());
    }

    #[test]
    fn check_payment_rejects_overpayment() {
        // 600 already paid of 1000: 500 more would overshoot, 400 settles it
        assert!(check_payment(dec!(600), dec!(500), dec!(1000)).is_err());
        assert_eq!(
            check_payment(dec!(600), dec!(400), dec!(1000)).unwrap(),
            dec!(1000)
        );
    }
}

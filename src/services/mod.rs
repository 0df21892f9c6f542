// Core services
pub mod purchase_orders;
pub mod sales_orders;
pub mod sequences;
pub mod settlements;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state shared by purchase and sales orders. Transitions are
/// driven solely by quantity exhaustion; there is no transition out of Done.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Received,
    Done,
}

/// Settlement state derived from cumulative payment vs. amount owed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaidStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_status_round_trips_through_strings() {
        assert_eq!(DocumentStatus::Draft.to_string(), "draft");
        assert_eq!(DocumentStatus::Received.to_string(), "received");
        assert_eq!(DocumentStatus::Done.to_string(), "done");
        assert_eq!(
            DocumentStatus::from_str("received").unwrap(),
            DocumentStatus::Received
        );
    }

    #[test]
    fn paid_status_round_trips_through_strings() {
        assert_eq!(PaidStatus::PartiallyPaid.to_string(), "partially_paid");
        assert_eq!(
            PaidStatus::from_str("partially_paid").unwrap(),
            PaidStatus::PartiallyPaid
        );
    }
}

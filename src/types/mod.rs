//! Wire types of the Alert API

pub mod alert;
pub mod customer;
pub mod stats;
pub mod transaction;

pub use alert::{
    Alert, AlertSeverity, AlertStatus, AlertSummary, AlertUpdateRequest, BulkUpdateRequest,
    Decision, DecisionAction, NoteRequest, NoteResponse, PagedAlerts,
};
pub use customer::{Customer, CustomerAlertHistory, CustomerSummary, RiskProfile};
pub use stats::{AlertStatistics, RiskFactorCount};
pub use transaction::{Transaction, TransactionSummary};

use thiserror::Error;

/// A string that does not name any variant of a wire enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

//! Transaction records embedded in alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction that triggered an alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,

    /// Non-negative amount in `currency`
    pub amount: f64,

    /// ISO currency code
    pub currency: String,

    pub destination_country: String,

    pub timestamp: DateTime<Utc>,
}

/// Transaction reference carried by alert summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub transaction_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
}

impl TransactionSummary {
    pub fn new(transaction_id: impl Into<String>, amount: f64, currency: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
            currency: currency.into(),
        }
    }
}

impl From<&Transaction> for TransactionSummary {
    fn from(tx: &Transaction) -> Self {
        Self::new(tx.transaction_id.clone(), tx.amount, tx.currency.clone())
    }
}

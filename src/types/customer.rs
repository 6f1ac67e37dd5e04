//! Customer records embedded in alerts

use serde::{Deserialize, Serialize};

use super::alert::AlertSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub country: String,
    /// Trust in the customer's device, 0.0 - 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_trust_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_fraud_history: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub customer_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

impl CustomerSummary {
    pub fn new(
        customer_id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            name: name.into(),
            country: country.into(),
        }
    }
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self::new(
            customer.customer_id.clone(),
            customer.name.clone(),
            customer.country.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    #[serde(default)]
    pub current_risk_level: Option<String>,
    #[serde(default)]
    pub has_fraud_history: Option<bool>,
    #[serde(default)]
    pub device_trust_score: Option<f64>,
}

/// Response of `GET /customers/{id}/alerts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAlertHistory {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub alerts: Vec<AlertSummary>,
    #[serde(default)]
    pub total_alerts: Option<u64>,
    #[serde(default)]
    pub risk_profile: Option<RiskProfile>,
}

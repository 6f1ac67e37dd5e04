//! Alert data structures exchanged with the Alert API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::customer::{Customer, CustomerSummary};
use super::transaction::{Transaction, TransactionSummary};
use super::UnknownVariant;

/// Alert severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 4] = [
        AlertSeverity::Low,
        AlertSeverity::Medium,
        AlertSeverity::High,
        AlertSeverity::Critical,
    ];

    /// Wire representation, as used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
            AlertSeverity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("severity", s))
    }
}

/// Alert lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Open,
    Investigating,
    Resolved,
    FalsePositive,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 4] = [
        AlertStatus::Open,
        AlertStatus::Investigating,
        AlertStatus::Resolved,
        AlertStatus::FalsePositive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "OPEN",
            AlertStatus::Investigating => "INVESTIGATING",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::FalsePositive => "FALSE_POSITIVE",
        }
    }

    /// Whether the alert still needs an analyst (open or under investigation)
    pub fn is_active(&self) -> bool {
        matches!(self, AlertStatus::Open | AlertStatus::Investigating)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}

/// Action recommended or taken for an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    Allow,
    Block,
    Monitor,
    Investigate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub reasoning: String,
}

/// Full alert record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Assigned by the server; absent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,

    pub severity: AlertSeverity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,

    pub risk_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    pub customer: Customer,

    pub transaction: Transaction,

    #[serde(default)]
    pub risk_factors: Vec<String>,

    pub decision: Decision,

    #[serde(default)]
    pub notes: Vec<String>,
}

/// Lightweight alert record returned by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionSummary>,
}

impl AlertSummary {
    pub fn id(&self) -> Option<&str> {
        self.alert_id.as_deref()
    }

    /// Whether the alert is open or under investigation
    pub fn is_active(&self) -> bool {
        self.status.map(|s| s.is_active()).unwrap_or(false)
    }
}

/// One page of alert summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedAlerts {
    #[serde(default)]
    pub alerts: Vec<AlertSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body of `PATCH /alerts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdateRequest {
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PATCH /alerts/bulk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub alert_ids: Vec<String>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteResponse {
    #[serde(default)]
    pub notes: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Low < AlertSeverity::Medium);
        assert!(AlertSeverity::Medium < AlertSeverity::High);
        assert!(AlertSeverity::High < AlertSeverity::Critical);
        assert_eq!(
            AlertSeverity::ALL.iter().max(),
            Some(&AlertSeverity::Critical)
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("open".parse::<AlertStatus>().unwrap(), AlertStatus::Open);
        assert_eq!(
            "false-positive".parse::<AlertStatus>().unwrap(),
            AlertStatus::FalsePositive
        );
        assert!("closed".parse::<AlertStatus>().is_err());
        assert_eq!(
            "Critical".parse::<AlertSeverity>().unwrap(),
            AlertSeverity::Critical
        );
    }

    #[test]
    fn test_active_statuses() {
        assert!(AlertStatus::Open.is_active());
        assert!(AlertStatus::Investigating.is_active());
        assert!(!AlertStatus::Resolved.is_active());
        assert!(!AlertStatus::FalsePositive.is_active());
        assert!(!AlertSummary::default().is_active());
    }

    #[test]
    fn test_summary_wire_format() {
        let json = r#"{
            "alertId": "AL001",
            "severity": "HIGH",
            "status": "FALSE_POSITIVE",
            "riskScore": 8.5,
            "createdAt": "2024-05-01T10:00:00Z",
            "customer": {"customerId": "C000001", "name": "John Doe", "country": "United States"},
            "transaction": {"transactionId": "TX001", "amount": 15000, "currency": "USD"}
        }"#;

        let summary: AlertSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id(), Some("AL001"));
        assert_eq!(summary.severity, Some(AlertSeverity::High));
        assert_eq!(summary.status, Some(AlertStatus::FalsePositive));
        assert_eq!(summary.transaction.unwrap().amount, 15000.0);
        assert!(summary.updated_at.is_none());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = AlertUpdateRequest {
            status: AlertStatus::Resolved,
            assigned_to: None,
            notes: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"status": "RESOLVED"}));
    }

    #[test]
    fn test_paged_alerts_defaults() {
        let page: PagedAlerts = serde_json::from_str("{}").unwrap();
        assert!(page.alerts.is_empty());
        assert_eq!(page.total, 0);
    }
}

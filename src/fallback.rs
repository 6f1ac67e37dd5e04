//! Degraded mode: what to show when a read from the Alert API fails.
//!
//! The default strategy shows nothing and lets the caller surface the error.
//! [`DemoPlaceholders`] fills the screen with fixed sample records instead,
//! which keeps a demo populated but hides real outages.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DegradedConfig;
use crate::types::{
    Alert, AlertSeverity, AlertStatistics, AlertStatus, AlertSummary, Customer, CustomerSummary,
    Decision, DecisionAction, PagedAlerts, Transaction, TransactionSummary,
};

/// Substitute data for failed reads. `None` means "no substitute".
pub trait ReadFallback: Send + Sync {
    fn alert_page(&self, _page: u32, _limit: u32) -> Option<PagedAlerts> {
        None
    }

    fn alert(&self, _alert_id: &str) -> Option<Alert> {
        None
    }

    fn notes(&self, _alert_id: &str) -> Option<Vec<String>> {
        None
    }

    fn statistics(&self) -> Option<AlertStatistics> {
        None
    }
}

/// Never substitutes anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl ReadFallback for NoFallback {}

/// Fixed sample records for demos
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoPlaceholders;

impl DemoPlaceholders {
    fn sample_alerts() -> Vec<AlertSummary> {
        let now = Utc::now();
        vec![
            AlertSummary {
                alert_id: Some("AL001".to_string()),
                severity: Some(AlertSeverity::High),
                status: Some(AlertStatus::Open),
                risk_score: Some(8.5),
                created_at: Some(now),
                updated_at: None,
                customer: Some(CustomerSummary::new("C000001", "John Doe", "United States")),
                transaction: Some(TransactionSummary::new("TX001", 15000.0, "USD")),
            },
            AlertSummary {
                alert_id: Some("AL002".to_string()),
                severity: Some(AlertSeverity::Critical),
                status: Some(AlertStatus::Investigating),
                risk_score: Some(9.2),
                created_at: Some(now - Duration::hours(1)),
                updated_at: None,
                customer: Some(CustomerSummary::new("C000002", "Jane Smith", "Canada")),
                transaction: Some(TransactionSummary::new("TX002", 25000.0, "CAD")),
            },
        ]
    }
}

impl ReadFallback for DemoPlaceholders {
    fn alert_page(&self, page: u32, limit: u32) -> Option<PagedAlerts> {
        let alerts = Self::sample_alerts();
        Some(PagedAlerts {
            total: alerts.len() as u64,
            alerts,
            page,
            limit,
            total_pages: 1,
        })
    }

    fn alert(&self, alert_id: &str) -> Option<Alert> {
        let now = Utc::now();
        Some(Alert {
            alert_id: Some(alert_id.to_string()),
            severity: AlertSeverity::High,
            status: Some(AlertStatus::Open),
            risk_score: 8.5,
            created_at: Some(now),
            updated_at: Some(now),
            assigned_to: Some("john.doe@company.com".to_string()),
            customer: Customer {
                customer_id: "C000001".to_string(),
                name: "John Doe".to_string(),
                country: "United States".to_string(),
                device_trust_score: Some(0.75),
                has_fraud_history: Some(false),
            },
            transaction: Transaction {
                transaction_id: "TX001".to_string(),
                amount: 15000.0,
                currency: "USD".to_string(),
                destination_country: "Switzerland".to_string(),
                timestamp: now,
            },
            risk_factors: vec![
                "Unusual transaction amount".to_string(),
                "New destination country".to_string(),
                "High-risk merchant category".to_string(),
            ],
            decision: Decision {
                action: DecisionAction::Investigate,
                reasoning: "High amount transaction to unusual destination requires investigation"
                    .to_string(),
            },
            notes: Vec::new(),
        })
    }

    fn notes(&self, _alert_id: &str) -> Option<Vec<String>> {
        Some(vec![
            "Initial alert created from ML model detection".to_string(),
            "Customer contacted for verification".to_string(),
            "Transaction temporarily blocked pending review".to_string(),
        ])
    }

    fn statistics(&self) -> Option<AlertStatistics> {
        let alerts = Self::sample_alerts();
        let mut by_severity = HashMap::new();
        let mut by_status = HashMap::new();
        for alert in &alerts {
            if let Some(severity) = alert.severity {
                *by_severity.entry(severity.as_str().to_string()).or_insert(0) += 1;
            }
            if let Some(status) = alert.status {
                *by_status.entry(status.as_str().to_string()).or_insert(0) += 1;
            }
        }
        let scores: Vec<f64> = alerts.iter().filter_map(|a| a.risk_score).collect();

        Some(AlertStatistics {
            total: Some(alerts.len() as u64),
            by_severity,
            by_status,
            average_risk_score: Some(scores.iter().sum::<f64>() / scores.len() as f64),
            top_risk_factors: Vec::new(),
        })
    }
}

/// Pick the fallback strategy configured for this deployment
pub fn from_config(config: &DegradedConfig) -> Arc<dyn ReadFallback> {
    if config.placeholders {
        Arc::new(DemoPlaceholders)
    } else {
        Arc::new(NoFallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fallback_substitutes_nothing() {
        let fallback = NoFallback;
        assert!(fallback.alert_page(1, 20).is_none());
        assert!(fallback.alert("AL001").is_none());
        assert!(fallback.notes("AL001").is_none());
        assert!(fallback.statistics().is_none());
    }

    #[test]
    fn test_placeholder_page() {
        let page = DemoPlaceholders.alert_page(3, 50).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.alerts.len(), 2);
        assert_eq!(page.page, 3);
        assert_eq!(page.alerts[0].id(), Some("AL001"));
        assert_eq!(page.alerts[1].id(), Some("AL002"));
    }

    #[test]
    fn test_placeholder_alert_keeps_requested_id() {
        let alert = DemoPlaceholders.alert("AL777").unwrap();
        assert_eq!(alert.alert_id.as_deref(), Some("AL777"));
        assert_eq!(alert.decision.action, DecisionAction::Investigate);
    }

    #[test]
    fn test_placeholder_statistics_match_page() {
        let stats = DemoPlaceholders.statistics().unwrap();
        assert_eq!(stats.total, Some(2));
        assert_eq!(stats.count_for_status(AlertStatus::Open), Some(1));
        assert_eq!(stats.count_for_severity(AlertSeverity::Critical), Some(1));
        assert!((stats.average_risk_score.unwrap() - 8.85).abs() < 1e-9);
    }

    #[test]
    fn test_from_config() {
        let off = from_config(&DegradedConfig { placeholders: false });
        assert!(off.alert_page(1, 20).is_none());

        let on = from_config(&DegradedConfig { placeholders: true });
        assert!(on.alert_page(1, 20).is_some());
    }
}

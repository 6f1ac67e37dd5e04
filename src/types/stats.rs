//! Aggregate alert statistics reported by the Alert API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::alert::{AlertSeverity, AlertStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorCount {
    #[serde(default)]
    pub factor: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `GET /alerts/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatistics {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub by_severity: HashMap<String, u64>,
    #[serde(default)]
    pub by_status: HashMap<String, u64>,
    #[serde(default)]
    pub average_risk_score: Option<f64>,
    #[serde(default)]
    pub top_risk_factors: Vec<RiskFactorCount>,
}

impl AlertStatistics {
    pub fn count_for_status(&self, status: AlertStatus) -> Option<u64> {
        self.by_status.get(status.as_str()).copied()
    }

    pub fn count_for_severity(&self, severity: AlertSeverity) -> Option<u64> {
        self.by_severity.get(severity.as_str()).copied()
    }
}

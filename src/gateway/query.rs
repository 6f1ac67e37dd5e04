//! Typed query parameters for the Alert API read endpoints

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::types::{AlertSeverity, AlertStatus, UnknownVariant};

/// Default page size of `GET /alerts`
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default number of alerts returned by the customer history endpoint
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query of `GET /alerts`. Unset filters are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAlertsQuery {
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub customer_id: Option<String>,
    pub assigned_to: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl Default for ListAlertsQuery {
    fn default() -> Self {
        Self {
            status: None,
            severity: None,
            customer_id: None,
            assigned_to: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListAlertsQuery {
    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Query parameters in the order they are sent, credential excluded
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(severity) = self.severity {
            params.push(("severity", severity.as_str().to_string()));
        }
        if let Some(customer_id) = non_blank(&self.customer_id) {
            params.push(("customerId", customer_id.to_string()));
        }
        if let Some(assigned_to) = non_blank(&self.assigned_to) {
            params.push(("assignedTo", assigned_to.to_string()));
        }
        params
    }
}

/// Optional date bounds of the statistics and export endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            params.push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        params
    }
}

/// Payload format of `GET /alerts/export`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownVariant::new("export format", s)),
        }
    }
}

/// Query of `GET /alerts/export`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportQuery {
    pub format: ExportFormat,
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub range: DateRange,
}

impl ExportQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("format", self.format.as_str().to_string())];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(severity) = self.severity {
            params.push(("severity", severity.as_str().to_string()));
        }
        params.extend(self.range.to_params());
        params
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

//! Fraud Alert Console Library
//!
//! Client-side triage of fraud alerts: a typed gateway to the Alert API,
//! the alert list and detail state machines, and the dashboard with its
//! per-customer rollup.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;
pub use dashboard::DashboardState;
pub use error::{GatewayError, GatewayResult};
pub use fallback::ReadFallback;
pub use gateway::{AlertApi, AlertGateway};
pub use metrics::GatewayMetrics;
pub use state::{AlertDetailState, AlertListState};
pub use types::{Alert, AlertSeverity, AlertStatus, AlertSummary, PagedAlerts};

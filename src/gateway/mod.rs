//! Call layer between the console state and the Alert API.
//!
//! Every logical operation maps to exactly one HTTP request. The gateway only
//! assembles parameters and maps failures; state machines depend on the
//! [`AlertApi`] trait so they can be driven without a server.

pub mod client;
pub mod query;

pub use client::AlertGateway;
pub use query::{DateRange, ExportFormat, ExportQuery, ListAlertsQuery};

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::types::{
    Alert, AlertStatistics, AlertUpdateRequest, BulkUpdateRequest, CustomerAlertHistory,
    PagedAlerts,
};

/// Operations offered by the Alert API
#[async_trait]
pub trait AlertApi: Send + Sync {
    /// `GET /alerts`
    async fn list_alerts(&self, query: &ListAlertsQuery) -> GatewayResult<PagedAlerts>;

    /// `GET /alerts/{id}`; a missing alert is `GatewayError::NotFound`
    async fn get_alert(&self, alert_id: &str) -> GatewayResult<Alert>;

    /// `POST /alerts`
    async fn create_alert(&self, alert: &Alert) -> GatewayResult<Alert>;

    /// `PATCH /alerts/{id}`
    async fn update_alert(&self, alert_id: &str, update: &AlertUpdateRequest)
        -> GatewayResult<Alert>;

    /// `PATCH /alerts/bulk`; fails as a whole
    async fn bulk_update(&self, request: &BulkUpdateRequest) -> GatewayResult<()>;

    /// `GET /alerts/{id}/notes`, oldest first
    async fn list_notes(&self, alert_id: &str) -> GatewayResult<Vec<String>>;

    /// `POST /alerts/{id}/notes`
    async fn add_note(&self, alert_id: &str, note: &str) -> GatewayResult<()>;

    /// `GET /customers/{id}/alerts`
    async fn customer_history(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> GatewayResult<CustomerAlertHistory>;

    /// `GET /alerts/stats`
    async fn statistics(&self, range: &DateRange) -> GatewayResult<AlertStatistics>;

    /// `GET /alerts/export`; the payload is returned as-is
    async fn export_alerts(&self, query: &ExportQuery) -> GatewayResult<String>;
}

//! Alert list: filters, pagination, selection and bulk updates.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::SkipReason;
use crate::error::{GatewayError, GatewayResult};
use crate::fallback::ReadFallback;
use crate::gateway::{AlertApi, ListAlertsQuery};
use crate::types::{AlertSeverity, AlertStatus, AlertSummary, BulkUpdateRequest, PagedAlerts};

/// Filter fields of the alert list. Blank strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub customer_id: Option<String>,
    pub assigned_to: Option<String>,
}

impl FilterCriteria {
    pub fn status(status: AlertStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn severity(severity: AlertSeverity) -> Self {
        Self {
            severity: Some(severity),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Status(status) => self.status = status,
            FilterUpdate::Severity(severity) => self.severity = severity,
            FilterUpdate::CustomerId(value) => self.customer_id = normalize(value),
            FilterUpdate::AssignedTo(value) => self.assigned_to = normalize(value),
        }
    }

    fn normalized(self) -> Self {
        Self {
            customer_id: normalize(self.customer_id),
            assigned_to: normalize(self.assigned_to),
            ..self
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A change to one filter field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Status(Option<AlertStatus>),
    Severity(Option<AlertSeverity>),
    CustomerId(Option<String>),
    AssignedTo(Option<String>),
}

/// A list request tagged with its issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub seq: u64,
    pub query: ListAlertsQuery,
}

/// What happened to a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The response replaced the current page
    Applied,
    /// The read failed and placeholder data replaced the current page
    Degraded,
    /// A newer request was issued since; the response was dropped
    Stale,
}

/// Result of a bulk update attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkUpdateOutcome {
    Updated { count: usize },
    Skipped(SkipReason),
}

/// State behind the alert list screen
pub struct AlertListState {
    api: Arc<dyn AlertApi>,
    fallback: Arc<dyn ReadFallback>,
    filters: FilterCriteria,
    page: u32,
    page_size: u32,
    alerts: Vec<AlertSummary>,
    total: u64,
    /// Selected row indices into `alerts`
    selection: BTreeSet<usize>,
    issued_seq: u64,
    degraded: bool,
    last_error: Option<String>,
}

impl AlertListState {
    pub fn new(api: Arc<dyn AlertApi>, fallback: Arc<dyn ReadFallback>, page_size: u32) -> Self {
        Self {
            api,
            fallback,
            filters: FilterCriteria::default(),
            page: 1,
            page_size: page_size.max(1),
            alerts: Vec::new(),
            total: 0,
            selection: BTreeSet::new(),
            issued_seq: 0,
            degraded: false,
            last_error: None,
        }
    }

    /// Start from `filters` instead of an unfiltered list. Nothing is fetched.
    pub fn with_filters(mut self, filters: FilterCriteria) -> Self {
        self.filters = filters.normalized();
        self
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows of the current page, in API order
    pub fn alerts(&self) -> &[AlertSummary] {
        &self.alerts
    }

    /// Total matches across all pages
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether the current page is placeholder data
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Query matching the current filters and cursor
    pub fn query(&self) -> ListAlertsQuery {
        ListAlertsQuery {
            status: self.filters.status,
            severity: self.filters.severity,
            customer_id: self.filters.customer_id.clone(),
            assigned_to: self.filters.assigned_to.clone(),
            page: self.page,
            limit: self.page_size,
        }
    }

    /// Tag a request for the current query. Responses to earlier tags become stale.
    pub fn begin_reload(&mut self) -> ListRequest {
        self.issued_seq += 1;
        ListRequest {
            seq: self.issued_seq,
            query: self.query(),
        }
    }

    /// Apply the response to the request tagged `seq`
    pub fn finish_reload(
        &mut self,
        seq: u64,
        result: GatewayResult<PagedAlerts>,
    ) -> GatewayResult<ReloadOutcome> {
        if seq < self.issued_seq {
            debug!(seq, latest = self.issued_seq, "Dropping stale alert list response");
            return Ok(ReloadOutcome::Stale);
        }

        match result {
            Ok(page) => {
                debug!(
                    seq,
                    rows = page.alerts.len(),
                    total = page.total,
                    "Alert list page loaded"
                );
                self.apply_page(page);
                self.degraded = false;
                self.last_error = None;
                Ok(ReloadOutcome::Applied)
            }
            Err(e) => {
                error!(error = %e, page = self.page, "Error loading alerts");
                self.last_error = Some(e.to_string());
                match self.fallback.alert_page(self.page, self.page_size) {
                    Some(placeholder) => {
                        warn!("Showing placeholder alerts, the list does not reflect the Alert API");
                        self.apply_page(placeholder);
                        self.degraded = true;
                        Ok(ReloadOutcome::Degraded)
                    }
                    None => Err(e),
                }
            }
        }
    }

    fn apply_page(&mut self, page: PagedAlerts) {
        self.alerts = page.alerts;
        self.total = page.total;
        self.selection.clear();
    }

    /// Fetch the page for the current filters and cursor
    pub async fn reload(&mut self) -> GatewayResult<ReloadOutcome> {
        let request = self.begin_reload();
        let result = self.api.list_alerts(&request.query).await;
        self.finish_reload(request.seq, result)
    }

    /// Change one filter, return to the first page and reload
    pub async fn set_filter(&mut self, update: FilterUpdate) -> GatewayResult<ReloadOutcome> {
        self.filters.apply(update);
        self.requery().await
    }

    /// Drop every filter, return to the first page and reload
    pub async fn clear_filters(&mut self) -> GatewayResult<ReloadOutcome> {
        self.filters = FilterCriteria::default();
        self.requery().await
    }

    /// Replace all filters at once, as when following a dashboard card
    pub async fn apply_drill_down(
        &mut self,
        filters: FilterCriteria,
    ) -> GatewayResult<ReloadOutcome> {
        self.filters = filters.normalized();
        self.requery().await
    }

    /// Selected rows belong to the old filters, so they go even if the reload fails
    async fn requery(&mut self) -> GatewayResult<ReloadOutcome> {
        self.page = 1;
        self.selection.clear();
        self.reload().await
    }

    /// Move the cursor, keeping filters
    pub async fn change_page(
        &mut self,
        page: u32,
        page_size: u32,
    ) -> GatewayResult<ReloadOutcome> {
        if page == 0 || page_size == 0 {
            return Err(GatewayError::precondition(format!(
                "page and page size start at 1 (got page {page}, size {page_size})"
            )));
        }
        self.page = page;
        self.page_size = page_size;
        self.reload().await
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.contains(&row)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.len() == self.alerts.len()
    }

    /// Selected rows in page order
    pub fn selected(&self) -> Vec<&AlertSummary> {
        self.selection
            .iter()
            .filter_map(|&row| self.alerts.get(row))
            .collect()
    }

    /// Clear the selection if every row is selected, otherwise select every row
    pub fn toggle_select_all(&mut self) {
        if self.is_all_selected() {
            self.selection.clear();
        } else {
            self.selection = (0..self.alerts.len()).collect();
        }
    }

    /// Flip one row; rows outside the page are ignored
    pub fn toggle_row(&mut self, row: usize) {
        if row >= self.alerts.len() {
            return;
        }
        if !self.selection.remove(&row) {
            self.selection.insert(row);
        }
    }

    /// Select the rows whose alert id is in `ids`; returns how many matched
    pub fn select_ids(&mut self, ids: &[String]) -> usize {
        let before = self.selection.len();
        for (row, alert) in self.alerts.iter().enumerate() {
            if alert.id().is_some_and(|id| ids.iter().any(|wanted| wanted == id)) {
                self.selection.insert(row);
            }
        }
        self.selection.len() - before
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Apply one status/assignee change to every selected alert.
    ///
    /// Nothing is sent when the selection is empty or no status is given. On
    /// failure the selection and page are left as they were.
    pub async fn bulk_update(
        &mut self,
        status: Option<AlertStatus>,
        assigned_to: Option<String>,
    ) -> GatewayResult<BulkUpdateOutcome> {
        if self.selection.is_empty() {
            return Ok(BulkUpdateOutcome::Skipped(SkipReason::EmptySelection));
        }
        let Some(status) = status else {
            return Ok(BulkUpdateOutcome::Skipped(SkipReason::MissingStatus));
        };

        let alert_ids: Vec<String> = self
            .selected()
            .into_iter()
            .filter_map(|alert| alert.alert_id.clone())
            .collect();
        if alert_ids.is_empty() {
            return Ok(BulkUpdateOutcome::Skipped(SkipReason::NoAlertIds));
        }

        let request = BulkUpdateRequest {
            alert_ids,
            status,
            assigned_to: normalize(assigned_to),
        };
        let count = request.alert_ids.len();

        if let Err(e) = self.api.bulk_update(&request).await {
            error!(error = %e, alerts = count, status = %status, "Error in bulk update");
            return Err(e);
        }
        info!(alerts = count, status = %status, "Bulk update applied");

        self.selection.clear();
        if let Err(e) = self.reload().await {
            warn!(error = %e, "Bulk update succeeded but the list could not be reloaded");
        }
        Ok(BulkUpdateOutcome::Updated { count })
    }
}

//! In-memory `AlertApi` used by the state machine tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{AlertApi, DateRange, ExportQuery, ListAlertsQuery};
use crate::types::{
    Alert, AlertStatistics, AlertStatus, AlertSummary, AlertUpdateRequest, BulkUpdateRequest,
    CustomerAlertHistory, CustomerSummary, PagedAlerts, TransactionSummary,
};

/// A call received by [`FakeAlertApi`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListAlerts(ListAlertsQuery),
    GetAlert(String),
    CreateAlert,
    UpdateAlert(String, AlertUpdateRequest),
    BulkUpdate(BulkUpdateRequest),
    ListNotes(String),
    AddNote(String, String),
    CustomerHistory(String, u32),
    Statistics(DateRange),
    Export(ExportQuery),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    page: PagedAlerts,
    alert: Option<Alert>,
    notes: Vec<String>,
    statistics: AlertStatistics,
    fail_reads: bool,
    fail_writes: bool,
}

/// Records every call and answers from canned data
#[derive(Default)]
pub(crate) struct FakeAlertApi {
    state: Mutex<FakeState>,
}

fn unavailable(operation: &'static str) -> GatewayError {
    GatewayError::HttpStatus {
        operation,
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl FakeAlertApi {
    pub fn with_page(page: PagedAlerts) -> Self {
        let api = Self::default();
        api.set_page(page);
        api
    }

    pub fn set_page(&self, page: PagedAlerts) {
        self.state.lock().unwrap().page = page;
    }

    pub fn set_alert(&self, alert: Alert) {
        self.state.lock().unwrap().alert = Some(alert);
    }

    pub fn set_notes(&self, notes: Vec<&str>) {
        self.state.lock().unwrap().notes = notes.into_iter().map(String::from).collect();
    }

    pub fn set_statistics(&self, statistics: AlertStatistics) {
        self.state.lock().unwrap().statistics = statistics;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call) -> std::sync::MutexGuard<'_, FakeState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl AlertApi for FakeAlertApi {
    async fn list_alerts(&self, query: &ListAlertsQuery) -> GatewayResult<PagedAlerts> {
        let state = self.record(Call::ListAlerts(query.clone()));
        if state.fail_reads {
            return Err(unavailable("list_alerts"));
        }
        Ok(state.page.clone())
    }

    async fn get_alert(&self, alert_id: &str) -> GatewayResult<Alert> {
        let state = self.record(Call::GetAlert(alert_id.to_string()));
        if state.fail_reads {
            return Err(unavailable("get_alert"));
        }
        state.alert.clone().ok_or_else(|| GatewayError::NotFound {
            resource: format!("alert {alert_id}"),
        })
    }

    async fn create_alert(&self, alert: &Alert) -> GatewayResult<Alert> {
        let state = self.record(Call::CreateAlert);
        if state.fail_writes {
            return Err(unavailable("create_alert"));
        }
        Ok(alert.clone())
    }

    async fn update_alert(
        &self,
        alert_id: &str,
        update: &AlertUpdateRequest,
    ) -> GatewayResult<Alert> {
        let mut state = self.record(Call::UpdateAlert(alert_id.to_string(), update.clone()));
        if state.fail_writes {
            return Err(unavailable("update_alert"));
        }
        if let Some(note) = &update.notes {
            state.notes.push(note.clone());
        }
        let mut alert = state.alert.clone().ok_or_else(|| GatewayError::NotFound {
            resource: format!("alert {alert_id}"),
        })?;
        alert.status = Some(update.status);
        alert.assigned_to = update.assigned_to.clone();
        state.alert = Some(alert.clone());
        Ok(alert)
    }

    async fn bulk_update(&self, request: &BulkUpdateRequest) -> GatewayResult<()> {
        let state = self.record(Call::BulkUpdate(request.clone()));
        if state.fail_writes {
            return Err(unavailable("bulk_update"));
        }
        Ok(())
    }

    async fn list_notes(&self, alert_id: &str) -> GatewayResult<Vec<String>> {
        let state = self.record(Call::ListNotes(alert_id.to_string()));
        if state.fail_reads {
            return Err(unavailable("list_notes"));
        }
        Ok(state.notes.clone())
    }

    async fn add_note(&self, alert_id: &str, note: &str) -> GatewayResult<()> {
        let mut state = self.record(Call::AddNote(alert_id.to_string(), note.to_string()));
        if state.fail_writes {
            return Err(unavailable("add_note"));
        }
        state.notes.push(note.to_string());
        Ok(())
    }

    async fn customer_history(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> GatewayResult<CustomerAlertHistory> {
        let state = self.record(Call::CustomerHistory(customer_id.to_string(), limit));
        if state.fail_reads {
            return Err(unavailable("customer_history"));
        }
        Ok(CustomerAlertHistory {
            customer_id: Some(customer_id.to_string()),
            ..CustomerAlertHistory::default()
        })
    }

    async fn statistics(&self, range: &DateRange) -> GatewayResult<AlertStatistics> {
        let state = self.record(Call::Statistics(*range));
        if state.fail_reads {
            return Err(unavailable("statistics"));
        }
        Ok(state.statistics.clone())
    }

    async fn export_alerts(&self, query: &ExportQuery) -> GatewayResult<String> {
        let state = self.record(Call::Export(query.clone()));
        if state.fail_reads {
            return Err(unavailable("export_alerts"));
        }
        Ok("alertId,status\n".to_string())
    }
}

/// Alert summary with a customer and transaction attached
pub(crate) fn summary(
    alert_id: &str,
    customer_id: &str,
    amount: f64,
    status: AlertStatus,
) -> AlertSummary {
    AlertSummary {
        alert_id: Some(alert_id.to_string()),
        status: Some(status),
        risk_score: Some(7.0),
        customer: Some(CustomerSummary::new(customer_id, "Test Customer", "Germany")),
        transaction: Some(TransactionSummary::new(
            format!("TX-{alert_id}"),
            amount,
            "EUR",
        )),
        ..AlertSummary::default()
    }
}

/// Page holding `alerts`, with `total` equal to their count
pub(crate) fn page_of(alerts: Vec<AlertSummary>) -> PagedAlerts {
    PagedAlerts {
        total: alerts.len() as u64,
        page: 1,
        limit: 20,
        total_pages: 1,
        alerts,
    }
}

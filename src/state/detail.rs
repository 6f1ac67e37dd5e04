//! Alert detail screen: one alert, its notes, and the edit buffer.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::SkipReason;
use crate::error::{GatewayError, GatewayResult};
use crate::fallback::ReadFallback;
use crate::gateway::AlertApi;
use crate::types::{Alert, AlertStatus, AlertUpdateRequest, CustomerAlertHistory};

/// How the detail screen was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailRoute {
    #[default]
    View,
    Edit,
}

/// Editable subset of an alert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub status: Option<AlertStatus>,
    pub assigned_to: Option<String>,
    /// Note submitted together with the save
    pub note: String,
}

impl EditBuffer {
    fn from_alert(alert: &Alert) -> Self {
        Self {
            status: alert.status,
            assigned_to: alert.assigned_to.clone(),
            note: String::new(),
        }
    }
}

/// Result of a save or add-note attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped(SkipReason),
}

pub struct AlertDetailState {
    api: Arc<dyn AlertApi>,
    fallback: Arc<dyn ReadFallback>,
    alert_id: String,
    alert: Option<Alert>,
    notes: Vec<String>,
    history: Option<CustomerAlertHistory>,
    edit_mode: bool,
    edit: EditBuffer,
    /// Pending input of the standalone add-note action
    new_note: String,
    degraded: bool,
    last_error: Option<String>,
}

impl AlertDetailState {
    pub fn new(
        api: Arc<dyn AlertApi>,
        fallback: Arc<dyn ReadFallback>,
        alert_id: impl Into<String>,
        route: DetailRoute,
    ) -> Self {
        Self {
            api,
            fallback,
            alert_id: alert_id.into(),
            alert: None,
            notes: Vec::new(),
            history: None,
            edit_mode: route == DetailRoute::Edit,
            edit: EditBuffer::default(),
            new_note: String::new(),
            degraded: false,
            last_error: None,
        }
    }

    /// Create the state and load the alert with its notes
    pub async fn open(
        api: Arc<dyn AlertApi>,
        fallback: Arc<dyn ReadFallback>,
        alert_id: impl Into<String>,
        route: DetailRoute,
    ) -> GatewayResult<Self> {
        let mut state = Self::new(api, fallback, alert_id, route);
        state.load().await?;
        Ok(state)
    }

    pub fn alert_id(&self) -> &str {
        &self.alert_id
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Notes, oldest first
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn customer_history(&self) -> Option<&CustomerAlertHistory> {
        self.history.as_ref()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn edit_buffer(&self) -> &EditBuffer {
        &self.edit
    }

    pub fn edit_buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.edit
    }

    pub fn new_note(&self) -> &str {
        &self.new_note
    }

    pub fn set_new_note(&mut self, text: impl Into<String>) {
        self.new_note = text.into();
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the alert and its notes concurrently
    pub async fn load(&mut self) -> GatewayResult<()> {
        let (alert, notes) = futures::join!(
            self.api.get_alert(&self.alert_id),
            self.api.list_notes(&self.alert_id)
        );
        let alert = self.apply_alert(alert);
        let notes = self.apply_notes(notes);
        alert.and(notes)
    }

    pub async fn load_notes(&mut self) -> GatewayResult<()> {
        let notes = self.api.list_notes(&self.alert_id).await;
        self.apply_notes(notes)
    }

    /// Fetch recent alerts of the loaded alert's customer
    pub async fn load_customer_history(&mut self, limit: u32) -> GatewayResult<()> {
        let customer_id = match &self.alert {
            Some(alert) => alert.customer.customer_id.clone(),
            None => return Err(GatewayError::precondition("no alert loaded")),
        };
        match self.api.customer_history(&customer_id, limit).await {
            Ok(history) => {
                self.history = Some(history);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, customer_id = %customer_id, "Error loading customer history");
                Err(e)
            }
        }
    }

    fn apply_alert(&mut self, result: GatewayResult<Alert>) -> GatewayResult<()> {
        match result {
            Ok(alert) => {
                self.edit = EditBuffer::from_alert(&alert);
                self.alert = Some(alert);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, alert_id = %self.alert_id, "Error loading alert");
                self.last_error = Some(e.to_string());
                match self.fallback.alert(&self.alert_id) {
                    Some(placeholder) => {
                        warn!(alert_id = %self.alert_id, "Showing placeholder alert");
                        self.edit = EditBuffer::from_alert(&placeholder);
                        self.alert = Some(placeholder);
                        self.degraded = true;
                        Ok(())
                    }
                    None => Err(e),
                }
            }
        }
    }

    fn apply_notes(&mut self, result: GatewayResult<Vec<String>>) -> GatewayResult<()> {
        match result {
            Ok(notes) => {
                self.notes = notes;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, alert_id = %self.alert_id, "Error loading notes");
                self.last_error = Some(e.to_string());
                match self.fallback.notes(&self.alert_id) {
                    Some(placeholder) => {
                        warn!(alert_id = %self.alert_id, "Showing placeholder notes");
                        self.notes = placeholder;
                        self.degraded = true;
                        Ok(())
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Flip edit mode; entering it resets the buffer from the alert
    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        if self.edit_mode {
            if let Some(alert) = &self.alert {
                self.edit = EditBuffer::from_alert(alert);
            }
        }
    }

    /// Commit the edit buffer.
    ///
    /// Notes are re-fetched only when the save carried a note.
    pub async fn save(&mut self) -> GatewayResult<SaveOutcome> {
        if self.alert.is_none() {
            return Ok(SaveOutcome::Skipped(SkipReason::NoAlertLoaded));
        }
        let Some(status) = self.edit.status else {
            return Ok(SaveOutcome::Skipped(SkipReason::MissingStatus));
        };

        let note = self.edit.note.trim();
        let update = AlertUpdateRequest {
            status,
            assigned_to: self
                .edit
                .assigned_to
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from),
            notes: (!note.is_empty()).then(|| note.to_string()),
        };

        let updated = match self.api.update_alert(&self.alert_id, &update).await {
            Ok(alert) => alert,
            Err(e) => {
                error!(error = %e, alert_id = %self.alert_id, "Error updating alert");
                return Err(e);
            }
        };
        info!(alert_id = %self.alert_id, status = %status, "Alert updated");

        self.alert = Some(updated);
        self.edit_mode = false;
        if update.notes.is_some() {
            if let Err(e) = self.load_notes().await {
                warn!(error = %e, "Alert saved but notes could not be reloaded");
            }
        }
        Ok(SaveOutcome::Saved)
    }

    /// Post the pending note on its own, then clear the input and reload notes
    pub async fn add_note(&mut self) -> GatewayResult<SaveOutcome> {
        let note = self.new_note.trim().to_string();
        if note.is_empty() {
            return Ok(SaveOutcome::Skipped(SkipReason::BlankNote));
        }

        if let Err(e) = self.api.add_note(&self.alert_id, &note).await {
            error!(error = %e, alert_id = %self.alert_id, "Error adding note");
            return Err(e);
        }

        self.new_note.clear();
        if let Err(e) = self.load_notes().await {
            warn!(error = %e, "Note added but notes could not be reloaded");
        }
        Ok(SaveOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{DemoPlaceholders, NoFallback};
    use crate::test_support::{Call, FakeAlertApi};

    fn sample_alert() -> Alert {
        let mut alert = DemoPlaceholders.alert("AL001").unwrap();
        alert.assigned_to = Some("analyst@company.com".to_string());
        alert
    }

    fn fake() -> Arc<FakeAlertApi> {
        let api = Arc::new(FakeAlertApi::default());
        api.set_alert(sample_alert());
        api.set_notes(vec!["Initial review"]);
        api
    }

    async fn open(api: &Arc<FakeAlertApi>, route: DetailRoute) -> AlertDetailState {
        AlertDetailState::open(api.clone(), Arc::new(NoFallback), "AL001", route)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_loads_alert_and_notes() {
        let api = fake();
        let state = open(&api, DetailRoute::View).await;

        assert_eq!(state.alert().unwrap().alert_id.as_deref(), Some("AL001"));
        assert_eq!(state.notes(), ["Initial review".to_string()]);
        assert!(!state.is_edit_mode());
        assert_eq!(state.edit_buffer().status, Some(AlertStatus::Open));
        assert_eq!(
            state.edit_buffer().assigned_to.as_deref(),
            Some("analyst@company.com")
        );
    }

    #[tokio::test]
    async fn test_edit_route_starts_in_edit_mode() {
        let api = fake();
        let mut state = open(&api, DetailRoute::Edit).await;
        assert!(state.is_edit_mode());

        state.toggle_edit_mode();
        assert!(!state.is_edit_mode());
    }

    #[tokio::test]
    async fn test_entering_edit_mode_resets_buffer() {
        let api = fake();
        let mut state = open(&api, DetailRoute::View).await;

        state.toggle_edit_mode();
        state.edit_buffer_mut().status = Some(AlertStatus::Resolved);
        state.edit_buffer_mut().note = "draft".to_string();
        state.toggle_edit_mode();
        state.toggle_edit_mode();

        assert_eq!(state.edit_buffer().status, Some(AlertStatus::Open));
        assert!(state.edit_buffer().note.is_empty());
    }

    #[tokio::test]
    async fn test_save_without_note_skips_notes_reload() {
        let api = fake();
        let mut state = open(&api, DetailRoute::Edit).await;
        api.clear_calls();

        state.edit_buffer_mut().status = Some(AlertStatus::Resolved);
        let outcome = state.save().await.unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert!(!state.is_edit_mode());
        assert_eq!(state.alert().unwrap().status, Some(AlertStatus::Resolved));
        assert_eq!(
            api.calls(),
            vec![Call::UpdateAlert(
                "AL001".to_string(),
                AlertUpdateRequest {
                    status: AlertStatus::Resolved,
                    assigned_to: Some("analyst@company.com".to_string()),
                    notes: None,
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_save_with_note_reloads_notes() {
        let api = fake();
        let mut state = open(&api, DetailRoute::Edit).await;
        api.clear_calls();

        state.edit_buffer_mut().status = Some(AlertStatus::Investigating);
        state.edit_buffer_mut().note = "  Escalated to tier 2 ".to_string();
        state.save().await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::UpdateAlert(_, update) => {
                assert_eq!(update.notes.as_deref(), Some("Escalated to tier 2"))
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(calls[1], Call::ListNotes("AL001".to_string()));
        assert_eq!(state.notes().last().unwrap(), "Escalated to tier 2");
    }

    #[tokio::test]
    async fn test_save_preconditions() {
        let api = Arc::new(FakeAlertApi::default());
        let mut state =
            AlertDetailState::new(api.clone(), Arc::new(NoFallback), "AL001", DetailRoute::Edit);
        assert_eq!(
            state.save().await.unwrap(),
            SaveOutcome::Skipped(SkipReason::NoAlertLoaded)
        );

        let api = fake();
        let mut state = open(&api, DetailRoute::Edit).await;
        api.clear_calls();
        state.edit_buffer_mut().status = None;
        assert_eq!(
            state.save().await.unwrap(),
            SaveOutcome::Skipped(SkipReason::MissingStatus)
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_state() {
        let api = fake();
        let mut state = open(&api, DetailRoute::Edit).await;
        api.fail_writes(true);

        state.edit_buffer_mut().status = Some(AlertStatus::Resolved);
        assert!(state.save().await.is_err());
        assert!(state.is_edit_mode());
        assert_eq!(state.alert().unwrap().status, Some(AlertStatus::Open));
    }

    #[tokio::test]
    async fn test_add_note_clears_input_and_reloads() {
        let api = fake();
        let mut state = open(&api, DetailRoute::View).await;
        api.clear_calls();

        state.set_new_note("Reviewed by analyst");
        let outcome = state.add_note().await.unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert!(state.new_note().is_empty());
        assert_eq!(
            api.calls(),
            vec![
                Call::AddNote("AL001".to_string(), "Reviewed by analyst".to_string()),
                Call::ListNotes("AL001".to_string()),
            ]
        );
        assert_eq!(state.notes().last().unwrap(), "Reviewed by analyst");
    }

    #[tokio::test]
    async fn test_blank_note_is_skipped() {
        let api = fake();
        let mut state = open(&api, DetailRoute::View).await;
        api.clear_calls();

        state.set_new_note("   ");
        assert_eq!(
            state.add_note().await.unwrap(),
            SaveOutcome::Skipped(SkipReason::BlankNote)
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_note_failure_keeps_input() {
        let api = fake();
        let mut state = open(&api, DetailRoute::View).await;
        api.fail_writes(true);

        state.set_new_note("Call customer back");
        assert!(state.add_note().await.is_err());
        assert_eq!(state.new_note(), "Call customer back");
    }

    #[tokio::test]
    async fn test_read_failure_without_fallback() {
        let api = fake();
        api.fail_reads(true);

        let result =
            AlertDetailState::open(api.clone(), Arc::new(NoFallback), "AL001", DetailRoute::View)
                .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_failure_with_placeholders() {
        let api = fake();
        api.fail_reads(true);

        let state = AlertDetailState::open(
            api.clone(),
            Arc::new(DemoPlaceholders),
            "AL042",
            DetailRoute::View,
        )
        .await
        .unwrap();

        assert!(state.is_degraded());
        assert_eq!(state.alert().unwrap().alert_id.as_deref(), Some("AL042"));
        assert_eq!(state.notes().len(), 3);
        assert!(state.last_error().is_some());
    }

    #[tokio::test]
    async fn test_customer_history_uses_alert_customer() {
        let api = fake();
        let mut state = open(&api, DetailRoute::View).await;
        api.clear_calls();

        state.load_customer_history(10).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::CustomerHistory("C000001".to_string(), 10)]
        );
        assert_eq!(
            state.customer_history().unwrap().customer_id.as_deref(),
            Some("C000001")
        );
    }
}

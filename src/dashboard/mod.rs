//! Dashboard: headline statistics, recent open alerts and the customer rollup.

pub mod rollup;

pub use rollup::{CustomerRollup, FlagRule, RollupBuilder, RollupFilter, RollupView};

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::DashboardConfig;
use crate::error::GatewayResult;
use crate::fallback::ReadFallback;
use crate::gateway::{AlertApi, DateRange, ListAlertsQuery};
use crate::state::FilterCriteria;
use crate::types::{AlertSeverity, AlertStatistics, AlertStatus, AlertSummary, PagedAlerts};

/// Visual weight of a summary card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTone {
    Neutral,
    Negative,
}

/// One headline number on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: &'static str,
    pub tone: CardTone,
    /// Alert list filters shown when the card is followed
    pub drill_down: Option<FilterCriteria>,
}

/// Headline cards derived from the statistics
pub fn pipeline_cards(stats: &AlertStatistics) -> Vec<PipelineCard> {
    let render = |value: Option<u64>| value.unwrap_or(0).to_string();

    vec![
        PipelineCard {
            title: "Total Alerts",
            value: render(stats.total),
            subtitle: "All alerts in system",
            tone: CardTone::Neutral,
            drill_down: None,
        },
        PipelineCard {
            title: "Open Alerts",
            value: render(stats.count_for_status(AlertStatus::Open)),
            subtitle: "Requiring attention",
            tone: CardTone::Negative,
            drill_down: Some(status_drill_down(AlertStatus::Open)),
        },
        PipelineCard {
            title: "Critical Alerts",
            value: render(stats.count_for_severity(AlertSeverity::Critical)),
            subtitle: "High priority alerts",
            tone: CardTone::Negative,
            drill_down: Some(severity_drill_down(AlertSeverity::Critical)),
        },
    ]
}

/// Alert list filters for one severity
pub fn severity_drill_down(severity: AlertSeverity) -> FilterCriteria {
    FilterCriteria::severity(severity)
}

/// Alert list filters for one status
pub fn status_drill_down(status: AlertStatus) -> FilterCriteria {
    FilterCriteria::status(status)
}

/// State behind the dashboard screen
pub struct DashboardState {
    api: Arc<dyn AlertApi>,
    fallback: Arc<dyn ReadFallback>,
    config: DashboardConfig,
    statistics: Option<AlertStatistics>,
    statistics_error: Option<String>,
    cards: Vec<PipelineCard>,
    recent_alerts: Vec<AlertSummary>,
    recent_alerts_error: Option<String>,
    rollup: RollupView,
    rollup_error: Option<String>,
}

impl DashboardState {
    pub fn new(
        api: Arc<dyn AlertApi>,
        fallback: Arc<dyn ReadFallback>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            api,
            fallback,
            config,
            statistics: None,
            statistics_error: None,
            cards: Vec::new(),
            recent_alerts: Vec::new(),
            recent_alerts_error: None,
            rollup: RollupView::default(),
            rollup_error: None,
        }
    }

    pub fn statistics(&self) -> Option<&AlertStatistics> {
        self.statistics.as_ref()
    }

    pub fn statistics_error(&self) -> Option<&str> {
        self.statistics_error.as_deref()
    }

    pub fn cards(&self) -> &[PipelineCard] {
        &self.cards
    }

    pub fn recent_alerts(&self) -> &[AlertSummary] {
        &self.recent_alerts
    }

    pub fn recent_alerts_error(&self) -> Option<&str> {
        self.recent_alerts_error.as_deref()
    }

    pub fn rollup(&self) -> &RollupView {
        &self.rollup
    }

    pub fn rollup_mut(&mut self) -> &mut RollupView {
        &mut self.rollup
    }

    pub fn rollup_error(&self) -> Option<&str> {
        self.rollup_error.as_deref()
    }

    /// Load every section concurrently. Each section fails on its own.
    pub async fn load(&mut self) {
        let recent_query = ListAlertsQuery::default()
            .with_status(AlertStatus::Open)
            .with_page(1, self.config.recent_limit);
        let sample_query = ListAlertsQuery::default().with_page(1, self.config.rollup_sample);
        let range = DateRange::default();

        let (stats, recent, sample) = futures::join!(
            self.api.statistics(&range),
            self.api.list_alerts(&recent_query),
            self.api.list_alerts(&sample_query)
        );

        self.apply_statistics(stats);
        self.apply_recent_alerts(recent);
        self.apply_rollup_sample(sample);

        info!(
            cards = self.cards.len(),
            recent_alerts = self.recent_alerts.len(),
            customers = self.rollup.rows().len(),
            "Dashboard loaded"
        );
    }

    /// Re-fetch only the rollup sample; the flagged filter is kept
    pub async fn reload_rollup(&mut self) {
        let sample_query = ListAlertsQuery::default().with_page(1, self.config.rollup_sample);
        let sample = self.api.list_alerts(&sample_query).await;
        self.apply_rollup_sample(sample);
    }

    fn apply_statistics(&mut self, result: GatewayResult<AlertStatistics>) {
        let stats = match result {
            Ok(stats) => {
                self.statistics_error = None;
                Some(stats)
            }
            Err(e) => {
                error!(error = %e, "Error loading statistics");
                self.statistics_error =
                    Some("Failed to load statistics. Please try again later.".to_string());
                let placeholder = self.fallback.statistics();
                if placeholder.is_some() {
                    warn!("Showing placeholder statistics");
                }
                placeholder
            }
        };

        self.cards = stats.as_ref().map(pipeline_cards).unwrap_or_default();
        self.statistics = stats;
    }

    fn apply_recent_alerts(&mut self, result: GatewayResult<PagedAlerts>) {
        match self.page_or_fallback(result, self.config.recent_limit, "recent alerts") {
            Ok(page) => {
                self.recent_alerts = page.alerts;
                self.recent_alerts_error = None;
            }
            Err(message) => {
                self.recent_alerts.clear();
                self.recent_alerts_error = Some(message);
            }
        }
    }

    fn apply_rollup_sample(&mut self, result: GatewayResult<PagedAlerts>) {
        match self.page_or_fallback(result, self.config.rollup_sample, "customer transactions") {
            Ok(page) => {
                let builder = RollupBuilder::new(self.config.flag_rule, self.config.max_customers);
                self.rollup.replace(builder.build(&page.alerts));
                self.rollup_error = None;
            }
            Err(message) => {
                self.rollup.clear();
                self.rollup_error = Some(message);
            }
        }
    }

    fn page_or_fallback(
        &self,
        result: GatewayResult<PagedAlerts>,
        limit: u32,
        section: &str,
    ) -> Result<PagedAlerts, String> {
        match result {
            Ok(page) => Ok(page),
            Err(e) => {
                error!(error = %e, section, "Error loading dashboard section");
                match self.fallback.alert_page(1, limit) {
                    Some(placeholder) => {
                        warn!(section, "Showing placeholder alerts");
                        Ok(placeholder)
                    }
                    None => Err(format!(
                        "Failed to load {section}. Please try again later."
                    )),
                }
            }
        }
    }
}

//! reqwest implementation of [`AlertApi`]

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::query::{DateRange, ExportQuery, ListAlertsQuery};
use super::AlertApi;
use crate::config::ApiConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::metrics::GatewayMetrics;
use crate::types::{
    Alert, AlertStatistics, AlertUpdateRequest, BulkUpdateRequest, CustomerAlertHistory,
    NoteRequest, NoteResponse, PagedAlerts,
};

/// Query parameter carrying the API key on every request
pub const CREDENTIAL_PARAM: &str = "subscription-key";

/// HTTP gateway to the Alert API
#[derive(Clone)]
pub struct AlertGateway {
    client: Client,
    base_url: Url,
    api_key: String,
    metrics: Arc<GatewayMetrics>,
}

impl std::fmt::Debug for AlertGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertGateway")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl AlertGateway {
    /// Create a gateway with its own metrics collector
    pub fn new(config: &ApiConfig) -> GatewayResult<Self> {
        Self::with_metrics(config, Arc::new(GatewayMetrics::new()))
    }

    /// Create a gateway that records into `metrics`
    pub fn with_metrics(config: &ApiConfig, metrics: Arc<GatewayMetrics>) -> GatewayResult<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            GatewayError::InvalidConfig(format!("base_url {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidConfig(format!(
                "base_url {:?} cannot carry endpoint paths",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each
    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidConfig("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request with the credential and `params` attached
    fn request(
        &self,
        method: Method,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> GatewayResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self
            .client
            .request(method, url)
            .query(&[(CREDENTIAL_PARAM, self.api_key.as_str())])
            .query(params))
    }

    /// Time a whole call, body included, and record its outcome
    async fn observe<T, F>(&self, operation: &'static str, call: F) -> GatewayResult<T>
    where
        F: Future<Output = GatewayResult<T>>,
    {
        let start = Instant::now();
        let result = call.await;
        let elapsed = start.elapsed();
        self.metrics.record_call(operation, elapsed, result.is_ok());

        match &result {
            Ok(_) => debug!(
                operation,
                elapsed_us = elapsed.as_micros() as u64,
                "Alert API call succeeded"
            ),
            Err(e) => debug!(operation, error = %e, "Alert API call failed"),
        }
        result
    }

    /// Send a request and turn non-2xx responses into errors
    async fn send(
        operation: &'static str,
        request: RequestBuilder,
    ) -> GatewayResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;

        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::HttpStatus {
            operation,
            status,
            body,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> GatewayResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
            operation,
            message: e.to_string(),
        })
    }
}

fn not_found_as(resource: String, err: GatewayError) -> GatewayError {
    match err {
        GatewayError::HttpStatus { status: 404, .. } => GatewayError::NotFound { resource },
        other => other,
    }
}

#[async_trait]
impl AlertApi for AlertGateway {
    async fn list_alerts(&self, query: &ListAlertsQuery) -> GatewayResult<PagedAlerts> {
        const OP: &str = "list_alerts";
        let request = self.request(Method::GET, &["alerts"], &query.to_params())?;
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn get_alert(&self, alert_id: &str) -> GatewayResult<Alert> {
        const OP: &str = "get_alert";
        let request = self.request(Method::GET, &["alerts", alert_id], &[])?;
        self.observe(OP, async {
            let response = Self::send(OP, request)
                .await
                .map_err(|e| not_found_as(format!("alert {alert_id}"), e))?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn create_alert(&self, alert: &Alert) -> GatewayResult<Alert> {
        const OP: &str = "create_alert";
        let request = self.request(Method::POST, &["alerts"], &[])?.json(alert);
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn update_alert(
        &self,
        alert_id: &str,
        update: &AlertUpdateRequest,
    ) -> GatewayResult<Alert> {
        const OP: &str = "update_alert";
        let request = self
            .request(Method::PATCH, &["alerts", alert_id], &[])?
            .json(update);
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn bulk_update(&self, request: &BulkUpdateRequest) -> GatewayResult<()> {
        const OP: &str = "bulk_update";
        if request.alert_ids.is_empty() {
            return Err(GatewayError::precondition(
                "bulk update needs at least one alert id",
            ));
        }
        let http = self
            .request(Method::PATCH, &["alerts", "bulk"], &[])?
            .json(request);
        self.observe(OP, async {
            Self::send(OP, http).await?;
            Ok(())
        })
        .await
    }

    async fn list_notes(&self, alert_id: &str) -> GatewayResult<Vec<String>> {
        const OP: &str = "list_notes";
        let request = self.request(Method::GET, &["alerts", alert_id, "notes"], &[])?;
        let notes: NoteResponse = self
            .observe(OP, async {
                let response = Self::send(OP, request).await?;
                Self::read_json(OP, response).await
            })
            .await?;
        Ok(notes.notes.unwrap_or_default())
    }

    async fn add_note(&self, alert_id: &str, note: &str) -> GatewayResult<()> {
        const OP: &str = "add_note";
        let body = NoteRequest {
            note: note.to_string(),
        };
        let request = self
            .request(Method::POST, &["alerts", alert_id, "notes"], &[])?
            .json(&body);
        self.observe(OP, async {
            Self::send(OP, request).await?;
            Ok(())
        })
        .await
    }

    async fn customer_history(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> GatewayResult<CustomerAlertHistory> {
        const OP: &str = "customer_history";
        let request = self.request(
            Method::GET,
            &["customers", customer_id, "alerts"],
            &[("limit", limit.to_string())],
        )?;
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn statistics(&self, range: &DateRange) -> GatewayResult<AlertStatistics> {
        const OP: &str = "statistics";
        let request = self.request(Method::GET, &["alerts", "stats"], &range.to_params())?;
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            Self::read_json(OP, response).await
        })
        .await
    }

    async fn export_alerts(&self, query: &ExportQuery) -> GatewayResult<String> {
        const OP: &str = "export_alerts";
        let request = self.request(Method::GET, &["alerts", "export"], &query.to_params())?;
        self.observe(OP, async {
            let response = Self::send(OP, request).await?;
            response
                .text()
                .await
                .map_err(|source| GatewayError::Transport {
                    operation: OP,
                    source,
                })
        })
        .await
    }
}

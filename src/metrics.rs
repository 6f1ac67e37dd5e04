//! Call statistics for Alert API requests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept per operation before the oldest half is dropped
const MAX_SAMPLES: usize = 10_000;

#[derive(Debug, Default)]
struct OperationRecord {
    calls: u64,
    failures: u64,
    latencies_us: Vec<u64>,
}

/// Metrics collector shared by every gateway call
pub struct GatewayMetrics {
    /// Total requests issued
    pub requests: AtomicU64,
    /// Requests that ended in an error
    pub failures: AtomicU64,
    /// Per-operation counters and latencies
    operations: RwLock<BTreeMap<&'static str, OperationRecord>>,
    start_time: Instant,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            operations: RwLock::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record one finished request
    pub fn record_call(&self, operation: &'static str, latency: Duration, success: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut operations) = self.operations.write() {
            let record = operations.entry(operation).or_default();
            record.calls += 1;
            if !success {
                record.failures += 1;
            }
            record.latencies_us.push(latency.as_micros() as u64);
            if record.latencies_us.len() > MAX_SAMPLES {
                record.latencies_us.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Latency statistics for one operation
    pub fn operation_stats(&self, operation: &str) -> Option<OperationStats> {
        let operations = self.operations.read().ok()?;
        operations.get(operation).map(OperationStats::from_record)
    }

    /// Latency statistics for every operation seen so far, by name
    pub fn all_operation_stats(&self) -> BTreeMap<&'static str, OperationStats> {
        match self.operations.read() {
            Ok(operations) => operations
                .iter()
                .map(|(name, record)| (*name, OperationStats::from_record(record)))
                .collect(),
            Err(_) => BTreeMap::new(),
        }
    }

    /// Fraction of requests that failed
    pub fn failure_rate(&self) -> f64 {
        let requests = self.requests.load(Ordering::Relaxed);
        if requests == 0 {
            return 0.0;
        }
        self.failures.load(Ordering::Relaxed) as f64 / requests as f64
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let requests = self.requests.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed().as_secs_f64();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              ALERT API GATEWAY - CALL SUMMARY                ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests: {:>8}  │  Failures: {:>6} ({:>5.1}%)  │  {:>6.1}s ║",
            requests,
            failures,
            self.failure_rate() * 100.0,
            elapsed
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        for (operation, stats) in self.all_operation_stats() {
            info!(
                "║ {:<18} calls={:>5} failed={:>4} mean={:>7}μs p95={:>7}μs",
                operation, stats.calls, stats.failures, stats.mean_us, stats.p95_us
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-operation statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OperationStats {
    pub calls: u64,
    pub failures: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

impl OperationStats {
    fn from_record(record: &OperationRecord) -> Self {
        let mut sorted = record.latencies_us.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        if count == 0 {
            return Self {
                calls: record.calls,
                failures: record.failures,
                ..Self::default()
            };
        }

        let sum: u64 = sorted.iter().sum();
        Self {
            calls: record.calls,
            failures: record.failures,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = GatewayMetrics::new();

        metrics.record_call("list_alerts", Duration::from_micros(100), true);
        metrics.record_call("list_alerts", Duration::from_micros(300), false);
        metrics.record_call("get_alert", Duration::from_micros(50), true);

        assert_eq!(metrics.requests.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.failures.load(Ordering::Relaxed), 1);

        let list = metrics.operation_stats("list_alerts").unwrap();
        assert_eq!(list.calls, 2);
        assert_eq!(list.failures, 1);
        assert_eq!(list.mean_us, 200);
        assert_eq!(list.max_us, 300);

        assert!(metrics.operation_stats("export_alerts").is_none());
        assert_eq!(metrics.all_operation_stats().len(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = GatewayMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        metrics.record_call("bulk_update", Duration::from_micros(10), false);
        metrics.record_call("bulk_update", Duration::from_micros(10), true);
        assert!((metrics.failure_rate() - 0.5).abs() < 1e-9);
    }
}

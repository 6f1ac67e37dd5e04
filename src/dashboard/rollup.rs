//! Per-customer rollup of a page of alerts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::AlertSummary;

/// Customers kept in a rollup unless configured otherwise
pub const DEFAULT_MAX_CUSTOMERS: usize = 10;

/// Country shown when an alert carries none
const UNKNOWN_COUNTRY: &str = "Unknown";

/// How a customer's `flagged` state is derived from its alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagRule {
    /// Flagged if any contributing alert is open or under investigation
    #[default]
    AnyActive,
    /// The most recently processed alert decides
    LastSeen,
}

/// Transaction totals of one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRollup {
    pub customer_id: String,
    pub country: String,
    pub transaction_count: u32,
    pub total_amount: f64,
    pub average_amount: f64,
    pub flagged: bool,
}

impl CustomerRollup {
    fn new(customer_id: &str, country: &str) -> Self {
        let country = if country.trim().is_empty() {
            UNKNOWN_COUNTRY
        } else {
            country
        };
        Self {
            customer_id: customer_id.to_string(),
            country: country.to_string(),
            transaction_count: 0,
            total_amount: 0.0,
            average_amount: 0.0,
            flagged: false,
        }
    }

    fn accumulate(&mut self, amount: f64, active: bool, rule: FlagRule) {
        self.transaction_count += 1;
        self.total_amount += amount;
        self.average_amount = self.total_amount / self.transaction_count as f64;
        self.flagged = match rule {
            FlagRule::AnyActive => self.flagged || active,
            FlagRule::LastSeen => active,
        };
    }
}

/// Builds customer rollups from alert pages.
pub struct RollupBuilder {
    flag_rule: FlagRule,
    max_customers: usize,
}

impl RollupBuilder {
    pub fn new(flag_rule: FlagRule, max_customers: usize) -> Self {
        Self {
            flag_rule,
            max_customers,
        }
    }

    pub fn flag_rule(&self) -> FlagRule {
        self.flag_rule
    }

    /// Build the rollup of `alerts` from scratch.
    ///
    /// Alerts lacking a customer or transaction are skipped. Customers keep
    /// first-encounter order and only the first `max_customers` are returned;
    /// their totals still include alerts that appear later in the page.
    pub fn build(&self, alerts: &[AlertSummary]) -> Vec<CustomerRollup> {
        let mut rollups: Vec<CustomerRollup> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for alert in alerts {
            let (Some(customer), Some(transaction)) = (&alert.customer, &alert.transaction) else {
                continue;
            };

            let slot = *index
                .entry(customer.customer_id.as_str())
                .or_insert_with(|| {
                    rollups.push(CustomerRollup::new(&customer.customer_id, &customer.country));
                    rollups.len() - 1
                });

            rollups[slot].accumulate(transaction.amount, alert.is_active(), self.flag_rule);
        }

        rollups.truncate(self.max_customers);
        rollups
    }
}

impl Default for RollupBuilder {
    fn default() -> Self {
        Self::new(FlagRule::default(), DEFAULT_MAX_CUSTOMERS)
    }
}

/// Which rollup rows are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollupFilter {
    #[default]
    All,
    FlaggedOnly,
}

/// A built rollup plus the client-side flagged filter over it
#[derive(Debug, Clone, Default)]
pub struct RollupView {
    rows: Vec<CustomerRollup>,
    filter: RollupFilter,
}

impl RollupView {
    pub fn new(rows: Vec<CustomerRollup>) -> Self {
        Self {
            rows,
            filter: RollupFilter::All,
        }
    }

    /// Swap in a freshly built rollup, keeping the current filter
    pub fn replace(&mut self, rows: Vec<CustomerRollup>) {
        self.rows = rows;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Every row, regardless of the filter
    pub fn rows(&self) -> &[CustomerRollup] {
        &self.rows
    }

    pub fn filter(&self) -> RollupFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: RollupFilter) {
        self.filter = filter;
    }

    pub fn toggle_flagged_only(&mut self) {
        self.filter = match self.filter {
            RollupFilter::All => RollupFilter::FlaggedOnly,
            RollupFilter::FlaggedOnly => RollupFilter::All,
        };
    }

    /// Rows passing the current filter, in rollup order
    pub fn visible(&self) -> Vec<&CustomerRollup> {
        self.rows
            .iter()
            .filter(|row| match self.filter {
                RollupFilter::All => true,
                RollupFilter::FlaggedOnly => row.flagged,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertStatus, CustomerSummary, TransactionSummary};

    fn alert(customer_id: &str, amount: f64, status: AlertStatus) -> AlertSummary {
        AlertSummary {
            alert_id: Some(format!("AL-{customer_id}-{amount}")),
            status: Some(status),
            customer: Some(CustomerSummary::new(customer_id, "Name", "Germany")),
            transaction: Some(TransactionSummary::new("TX", amount, "EUR")),
            ..AlertSummary::default()
        }
    }

    #[test]
    fn test_two_alerts_same_customer() {
        let alerts = vec![
            alert("C000001", 100.0, AlertStatus::Resolved),
            alert("C000001", 300.0, AlertStatus::Resolved),
        ];

        let rollup = RollupBuilder::default().build(&alerts);
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].customer_id, "C000001");
        assert_eq!(rollup[0].transaction_count, 2);
        assert!((rollup[0].total_amount - 400.0).abs() < 1e-9);
        assert!((rollup[0].average_amount - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_for_many_alerts() {
        let amounts = [12.5, 99.99, 0.0, 1500.0, 42.0];
        let alerts: Vec<_> = amounts
            .iter()
            .map(|&a| alert("C7", a, AlertStatus::Resolved))
            .collect();

        let rollup = RollupBuilder::default().build(&alerts);
        let expected: f64 = amounts.iter().sum();
        assert_eq!(rollup[0].transaction_count, amounts.len() as u32);
        assert!((rollup[0].total_amount - expected).abs() < 1e-9);
        assert!((rollup[0].average_amount - expected / amounts.len() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_truncates_to_first_customers_in_order() {
        let mut alerts: Vec<_> = (0..15)
            .map(|i| alert(&format!("C{i:02}"), 10.0, AlertStatus::Resolved))
            .collect();
        // a later alert for an already-kept customer still counts
        alerts.push(alert("C03", 30.0, AlertStatus::Resolved));

        let rollup = RollupBuilder::default().build(&alerts);
        let ids: Vec<_> = rollup.iter().map(|r| r.customer_id.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("C{i:02}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(rollup[3].transaction_count, 2);
        assert!((rollup[3].total_amount - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_skips_alerts_without_customer_or_transaction() {
        let mut no_tx = alert("C1", 10.0, AlertStatus::Open);
        no_tx.transaction = None;
        let mut no_customer = alert("C2", 10.0, AlertStatus::Open);
        no_customer.customer = None;

        let rollup = RollupBuilder::default().build(&[no_tx, no_customer]);
        assert!(rollup.is_empty());
    }

    #[test]
    fn test_missing_country_is_unknown() {
        let mut a = alert("C1", 10.0, AlertStatus::Open);
        if let Some(customer) = a.customer.as_mut() {
            customer.country = String::new();
        }
        let rollup = RollupBuilder::default().build(&[a]);
        assert_eq!(rollup[0].country, "Unknown");
    }

    #[test]
    fn test_flag_rules() {
        let alerts = vec![
            alert("C1", 10.0, AlertStatus::Open),
            alert("C1", 10.0, AlertStatus::Resolved),
        ];

        let any = RollupBuilder::new(FlagRule::AnyActive, 10).build(&alerts);
        assert!(any[0].flagged);

        let last = RollupBuilder::new(FlagRule::LastSeen, 10).build(&alerts);
        assert!(!last[0].flagged);

        let investigating = vec![alert("C2", 10.0, AlertStatus::Investigating)];
        assert!(RollupBuilder::new(FlagRule::LastSeen, 10).build(&investigating)[0].flagged);
    }

    #[test]
    fn test_flagged_filter_is_pure_view() {
        let alerts = vec![
            alert("C1", 10.0, AlertStatus::Open),
            alert("C2", 20.0, AlertStatus::Resolved),
            alert("C3", 30.0, AlertStatus::Investigating),
        ];
        let rows = RollupBuilder::default().build(&alerts);
        let mut view = RollupView::new(rows.clone());

        let original: Vec<CustomerRollup> = view.visible().into_iter().cloned().collect();
        assert_eq!(original.len(), 3);

        view.toggle_flagged_only();
        let flagged: Vec<_> = view.visible().iter().map(|r| r.customer_id.clone()).collect();
        assert_eq!(flagged, vec!["C1".to_string(), "C3".to_string()]);
        assert_eq!(view.rows(), rows.as_slice());

        view.toggle_flagged_only();
        let restored: Vec<CustomerRollup> = view.visible().into_iter().cloned().collect();
        assert_eq!(restored, original);
        assert_eq!(view.filter(), RollupFilter::All);
    }

    #[test]
    fn test_replace_keeps_filter() {
        let mut view = RollupView::default();
        view.set_filter(RollupFilter::FlaggedOnly);
        view.replace(RollupBuilder::default().build(&[alert("C1", 5.0, AlertStatus::Resolved)]));
        assert_eq!(view.filter(), RollupFilter::FlaggedOnly);
        assert!(view.visible().is_empty());
        assert_eq!(view.rows().len(), 1);
    }
}

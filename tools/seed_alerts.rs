//! Test Alert Seeder
//!
//! Generates alerts and creates them through the Alert API so a backend has
//! something to triage.

use chrono::{Duration as ChronoDuration, Utc};
use clap::Parser;
use fraud_alert_console::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    gateway::{AlertApi, AlertGateway},
    logging,
    types::{Alert, AlertSeverity, AlertStatus, Customer, Decision, DecisionAction, Transaction},
    GatewayError,
};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "seed-alerts", about = "Create random fraud alerts")]
struct Args {
    /// Number of alerts to generate
    #[arg(long, default_value_t = 100)]
    count: u64,
    /// Share of suspicious alerts, 0.0 to 1.0
    #[arg(long, default_value_t = 0.1, value_parser = parse_fraud_rate)]
    fraud_rate: f64,
    /// Pause between alerts
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
    /// Print alerts instead of creating them
    #[arg(long)]
    dry_run: bool,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

const NAMES: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Maria Garcia",
    "Wei Chen",
    "Amara Okafor",
    "Lukas Muller",
];

/// Alert generator for seeding
struct AlertGenerator {
    rng: rand::rngs::ThreadRng,
}

impl AlertGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a low-risk alert
    fn generate_legitimate(&mut self) -> Alert {
        let risk_score = self.rng.gen_range(1.0..5.0);
        let trust = self.rng.gen_range(0.6..1.0);
        let country = self
            .random_choice(&["United States", "Canada", "Germany", "France"])
            .to_string();

        Alert {
            alert_id: None,
            severity: severity_for(risk_score),
            status: Some(AlertStatus::Open),
            risk_score,
            created_at: None,
            updated_at: None,
            assigned_to: None,
            customer: self.customer(&country, trust, false),
            transaction: Transaction {
                transaction_id: format!("TX-{}", uuid::Uuid::new_v4()),
                amount: round_cents(self.rng.gen_range(10.0..500.0)),
                currency: self.random_choice(&["USD", "EUR", "GBP", "CAD"]).to_string(),
                destination_country: country,
                timestamp: Utc::now(),
            },
            risk_factors: vec!["Unusual merchant category".to_string()],
            decision: Decision {
                action: self.random_choice_action(&[DecisionAction::Allow, DecisionAction::Monitor]),
                reasoning: "Low risk pattern consistent with customer history".to_string(),
            },
            notes: Vec::new(),
        }
    }

    /// Generate a high-risk alert
    fn generate_suspicious(&mut self) -> Alert {
        let risk_score = self.rng.gen_range(7.0..10.0);
        let home = self
            .random_choice(&["United States", "Canada", "United Kingdom"])
            .to_string();
        let destination = self
            .random_choice(&["Switzerland", "Cayman Islands", "Panama", "Cyprus"])
            .to_string();
        let hours_ago = self.rng.gen_range(0..6);
        let trust = self.rng.gen_range(0.0..0.4);
        let fraud_history = self.rng.gen_bool(0.3);

        let factor_pool = [
            "Unusual transaction amount",
            "New destination country",
            "High-risk merchant category",
            "Device not recognised",
            "Multiple failed attempts",
        ];
        let factor_count = self.rng.gen_range(2..=factor_pool.len());
        let risk_factors = factor_pool[..factor_count]
            .iter()
            .map(|f| f.to_string())
            .collect();

        Alert {
            alert_id: None,
            severity: severity_for(risk_score),
            status: Some(AlertStatus::Open),
            risk_score,
            created_at: None,
            updated_at: None,
            assigned_to: None,
            customer: self.customer(&home, trust, fraud_history),
            transaction: Transaction {
                transaction_id: format!("TX-{}", uuid::Uuid::new_v4()),
                amount: round_cents(self.rng.gen_range(5000.0..50000.0)),
                currency: self.random_choice(&["USD", "EUR", "CHF"]).to_string(),
                destination_country: destination,
                timestamp: Utc::now() - ChronoDuration::hours(hours_ago),
            },
            risk_factors,
            decision: Decision {
                action: self.random_choice_action(&[
                    DecisionAction::Block,
                    DecisionAction::Investigate,
                ]),
                reasoning: "High amount transaction to unusual destination requires investigation"
                    .to_string(),
            },
            notes: Vec::new(),
        }
    }

    fn customer(&mut self, country: &str, device_trust_score: f64, fraud_history: bool) -> Customer {
        Customer {
            customer_id: format!("C{:06}", self.rng.gen_range(1..50)),
            name: self.random_choice(NAMES).to_string(),
            country: country.to_string(),
            device_trust_score: Some(device_trust_score),
            has_fraud_history: Some(fraud_history),
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }

    fn random_choice_action(&mut self, choices: &[DecisionAction]) -> DecisionAction {
        choices[self.rng.gen_range(0..choices.len())]
    }

    fn generate(&mut self, fraud_rate: f64) -> (Alert, bool) {
        if self.rng.gen_bool(fraud_rate) {
            (self.generate_suspicious(), true)
        } else {
            (self.generate_legitimate(), false)
        }
    }
}

fn parse_fraud_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("must be between 0.0 and 1.0, got {value}"));
    }
    Ok(rate)
}

fn severity_for(risk_score: f64) -> AlertSeverity {
    match risk_score {
        s if s >= 9.0 => AlertSeverity::Critical,
        s if s >= 7.0 => AlertSeverity::High,
        s if s >= 4.0 => AlertSeverity::Medium,
        _ => AlertSeverity::Low,
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load_from_path(&args.config)?;

    // Initialize logging
    logging::init(&config.logging, &["seed_alerts", logging::LIBRARY_TARGET]);

    let fraud_rate = args.fraud_rate;
    info!(
        base_url = %config.api.base_url,
        count = args.count,
        fraud_rate = fraud_rate,
        delay_ms = args.delay_ms,
        "Configuration loaded"
    );

    if args.dry_run {
        return run_dry_mode(args.count, fraud_rate, args.delay_ms).await;
    }

    let gateway = AlertGateway::new(&config.api)?;
    let mut generator = AlertGenerator::new();

    info!("Starting to create {} alerts...", args.count);

    let mut legitimate_count = 0;
    let mut suspicious_count = 0;

    for i in 0..args.count {
        let (alert, suspicious) = generator.generate(fraud_rate);

        match gateway.create_alert(&alert).await {
            Ok(created) => {
                if suspicious {
                    suspicious_count += 1;
                } else {
                    legitimate_count += 1;
                }
                info!(
                    alert_id = created.alert_id.as_deref().unwrap_or("-"),
                    severity = %created.severity,
                    "Alert created"
                );
            }
            Err(e @ GatewayError::Transport { .. }) if i == 0 => {
                warn!(error = %e, "Alert API unreachable. Running in dry-run mode.");
                return run_dry_mode(args.count, fraud_rate, args.delay_ms).await;
            }
            Err(e) => return Err(e.into()),
        }

        if (i + 1) % 10 == 0 {
            info!(
                "Created {}/{} alerts ({} legitimate, {} suspicious)",
                i + 1,
                args.count,
                legitimate_count,
                suspicious_count
            );
        }

        tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
    }

    info!(
        "Completed! Created {} alerts ({} legitimate, {} suspicious)",
        args.count, legitimate_count, suspicious_count
    );
    gateway.metrics().print_summary();

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (nothing is sent)");

    let mut generator = AlertGenerator::new();

    for i in 0..count {
        let (alert, _) = generator.generate(fraud_rate);
        let json = serde_json::to_string_pretty(&alert)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample alert {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}

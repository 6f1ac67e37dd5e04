//! Fraud Alert Console - Main Entry Point
//!
//! Drives the dashboard, alert list and alert detail state against the
//! Alert API. Results go to stdout, logs to stderr.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fraud_alert_console::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    dashboard::{CardTone, DashboardState, PipelineCard, RollupFilter},
    fallback,
    gateway::{
        query::DEFAULT_HISTORY_LIMIT, AlertApi, AlertGateway, DateRange, ExportFormat, ExportQuery,
    },
    logging,
    state::{
        AlertDetailState, AlertListState, BulkUpdateOutcome, DetailRoute, FilterCriteria,
        ReloadOutcome, SaveOutcome,
    },
    types::{AlertSeverity, AlertStatus, AlertSummary},
    ReadFallback,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fraud-alert-console", version, about = "Triage fraud alerts")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Headline statistics, recent open alerts and the customer rollup
    Dashboard {
        /// Only show customers with an open or investigating alert
        #[arg(long)]
        flagged_only: bool,
    },
    /// List alerts
    Alerts(ListArgs),
    /// Show one alert with its notes and customer history
    Show { id: String },
    /// Change the status or assignee of one alert
    Update {
        id: String,
        #[arg(long)]
        status: AlertStatus,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Apply one status to several alerts of the listed page
    BulkUpdate {
        #[arg(long)]
        status: AlertStatus,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Add a note to an alert
    Note { id: String, text: String },
    /// Recent alerts of one customer
    History {
        customer_id: String,
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// Export alerts as CSV or JSON
    Export {
        #[arg(long, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        status: Option<AlertStatus>,
        #[arg(long)]
        severity: Option<AlertSeverity>,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    status: Option<AlertStatus>,
    #[arg(long)]
    severity: Option<AlertSeverity>,
    #[arg(long)]
    customer: Option<String>,
    #[arg(long)]
    assignee: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    page_size: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Initialize logging
    logging::init(&config.logging, &[logging::LIBRARY_TARGET]);
    info!(
        base_url = %config.api.base_url,
        placeholders = config.degraded.placeholders,
        "Configuration loaded"
    );

    let gateway = AlertGateway::new(&config.api).context("Failed to create Alert API gateway")?;
    let metrics = gateway.metrics().clone();
    let api: Arc<dyn AlertApi> = Arc::new(gateway);
    let fallback = fallback::from_config(&config.degraded);

    let result = run(cli.command, &config, api, fallback).await;

    metrics.print_summary();
    result
}

async fn run(
    command: Command,
    config: &AppConfig,
    api: Arc<dyn AlertApi>,
    fallback: Arc<dyn ReadFallback>,
) -> Result<()> {
    match command {
        Command::Dashboard { flagged_only } => {
            let mut dashboard = DashboardState::new(api, fallback, config.dashboard.clone());
            dashboard.load().await;
            if flagged_only {
                dashboard.rollup_mut().set_filter(RollupFilter::FlaggedOnly);
            }
            print_dashboard(&dashboard);
        }

        Command::Alerts(args) => {
            let filters = FilterCriteria {
                status: args.status,
                severity: args.severity,
                customer_id: args.customer,
                assigned_to: args.assignee,
            };
            let page_size = args.page_size.unwrap_or(config.list.page_size);
            let mut list = AlertListState::new(api, fallback, page_size).with_filters(filters);

            let outcome = list
                .change_page(args.page, page_size)
                .await
                .context("Failed to load alerts")?;
            if outcome == ReloadOutcome::Degraded {
                warn!("Alert API unavailable, showing placeholder alerts");
            }

            println!(
                "Page {} ({} of {} alerts)",
                list.page(),
                list.alerts().len(),
                list.total()
            );
            print_alert_rows(list.alerts());
        }

        Command::Show { id } => {
            let mut detail = AlertDetailState::open(api, fallback, id.as_str(), DetailRoute::View)
                .await
                .with_context(|| format!("Failed to load alert {id}"))?;
            if let Err(e) = detail.load_customer_history(DEFAULT_HISTORY_LIMIT).await {
                warn!(error = %e, "Customer history unavailable");
            }
            print_detail(&detail)?;
        }

        Command::Update {
            id,
            status,
            assignee,
            note,
        } => {
            let mut detail = AlertDetailState::open(api, fallback, id.as_str(), DetailRoute::Edit)
                .await
                .with_context(|| format!("Failed to load alert {id}"))?;

            let buffer = detail.edit_buffer_mut();
            buffer.status = Some(status);
            if assignee.is_some() {
                buffer.assigned_to = assignee;
            }
            buffer.note = note.unwrap_or_default();

            match detail
                .save()
                .await
                .with_context(|| format!("Failed to update alert {id}"))?
            {
                SaveOutcome::Saved => println!("Alert {id} set to {status}"),
                SaveOutcome::Skipped(reason) => println!("Nothing sent: {reason}"),
            }
        }

        Command::BulkUpdate {
            status,
            assignee,
            page_size,
            ids,
        } => {
            let page_size = page_size.unwrap_or(config.list.page_size);
            let mut list = AlertListState::new(api, fallback, page_size);
            list.reload().await.context("Failed to load alerts")?;

            let matched = list.select_ids(&ids);
            if matched < ids.len() {
                warn!(
                    requested = ids.len(),
                    matched,
                    "Some alert ids are not on the listed page and were skipped"
                );
            }

            match list
                .bulk_update(Some(status), assignee)
                .await
                .context("Bulk update failed")?
            {
                BulkUpdateOutcome::Updated { count } => {
                    println!("Updated {count} alerts to {status}")
                }
                BulkUpdateOutcome::Skipped(reason) => println!("Nothing sent: {reason}"),
            }
        }

        Command::Note { id, text } => {
            let mut detail = AlertDetailState::new(api, fallback, id.as_str(), DetailRoute::View);
            detail.set_new_note(text);
            match detail
                .add_note()
                .await
                .with_context(|| format!("Failed to add note to alert {id}"))?
            {
                SaveOutcome::Saved => {
                    println!("Notes of {id}:");
                    for note in detail.notes() {
                        println!("  - {note}");
                    }
                }
                SaveOutcome::Skipped(reason) => println!("Nothing sent: {reason}"),
            }
        }

        Command::History { customer_id, limit } => {
            let history = api
                .customer_history(&customer_id, limit)
                .await
                .with_context(|| format!("Failed to load history of customer {customer_id}"))?;
            println!(
                "Customer {} {}",
                customer_id,
                history.customer_name.as_deref().unwrap_or("")
            );
            if let Some(profile) = &history.risk_profile {
                println!(
                    "Risk level: {}  Fraud history: {}",
                    profile.current_risk_level.as_deref().unwrap_or("-"),
                    profile.has_fraud_history.map_or("-", |h| if h { "yes" } else { "no" })
                );
            }
            print_alert_rows(&history.alerts);
        }

        Command::Export {
            format,
            status,
            severity,
            start,
            end,
        } => {
            let query = ExportQuery {
                format,
                status,
                severity,
                range: DateRange::new(start, end),
            };
            let body = api
                .export_alerts(&query)
                .await
                .context("Failed to export alerts")?;
            print!("{body}");
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &DashboardState) {
    if let Some(message) = dashboard.statistics_error() {
        println!("! {message}");
    }
    for card in dashboard.cards() {
        print_card(card);
    }
    if let Some(stats) = dashboard.statistics() {
        if let Some(avg) = stats.average_risk_score {
            println!("Average risk score: {avg:.2}");
        }
        for factor in &stats.top_risk_factors {
            println!(
                "  {:<40} {}",
                factor.factor.as_deref().unwrap_or("-"),
                factor.count.unwrap_or(0)
            );
        }
    }

    println!();
    println!("Recent open alerts");
    if let Some(message) = dashboard.recent_alerts_error() {
        println!("! {message}");
    }
    print_alert_rows(dashboard.recent_alerts());

    println!();
    let rollup = dashboard.rollup();
    let label = match rollup.filter() {
        RollupFilter::All => "all customers",
        RollupFilter::FlaggedOnly => "flagged customers",
    };
    println!("Customer transactions ({label})");
    if let Some(message) = dashboard.rollup_error() {
        println!("! {message}");
    }
    println!(
        "{:<12} {:<16} {:>5} {:>14} {:>12} {}",
        "CUSTOMER", "COUNTRY", "TXNS", "TOTAL", "AVERAGE", "FLAGGED"
    );
    for row in rollup.visible() {
        println!(
            "{:<12} {:<16} {:>5} {:>14.2} {:>12.2} {}",
            row.customer_id,
            row.country,
            row.transaction_count,
            row.total_amount,
            row.average_amount,
            if row.flagged { "yes" } else { "" }
        );
    }
}

fn print_card(card: &PipelineCard) {
    let marker = match card.tone {
        CardTone::Neutral => " ",
        CardTone::Negative => "!",
    };
    let drill = card
        .drill_down
        .as_ref()
        .map(drill_down_hint)
        .unwrap_or_default();
    println!(
        "{marker} {:<16} {:>8}  {}{drill}",
        card.title, card.value, card.subtitle
    );
}

fn drill_down_hint(filters: &FilterCriteria) -> String {
    let mut args = Vec::new();
    if let Some(status) = filters.status {
        args.push(format!("--status {status}"));
    }
    if let Some(severity) = filters.severity {
        args.push(format!("--severity {severity}"));
    }
    if args.is_empty() {
        String::new()
    } else {
        format!("  (alerts {})", args.join(" "))
    }
}

fn print_alert_rows(alerts: &[AlertSummary]) {
    println!(
        "{:<14} {:<9} {:<15} {:>5} {:<12} {:>14}",
        "ALERT", "SEVERITY", "STATUS", "RISK", "CUSTOMER", "AMOUNT"
    );
    for alert in alerts {
        let severity = alert.severity.map(|s| s.to_string()).unwrap_or_default();
        let status = alert.status.map(|s| s.to_string()).unwrap_or_default();
        let risk = alert
            .risk_score
            .map(|r| format!("{r:.1}"))
            .unwrap_or_default();
        let customer = alert
            .customer
            .as_ref()
            .map(|c| c.customer_id.as_str())
            .unwrap_or("-");
        let amount = alert
            .transaction
            .as_ref()
            .map(|t| format!("{:.2} {}", t.amount, t.currency))
            .unwrap_or_default();
        println!(
            "{:<14} {:<9} {:<15} {:>5} {:<12} {:>14}",
            alert.id().unwrap_or("-"),
            severity,
            status,
            risk,
            customer,
            amount
        );
    }
}

fn print_detail(detail: &AlertDetailState) -> Result<()> {
    if detail.is_degraded() {
        warn!("Alert API unavailable, showing placeholder data");
    }
    if let Some(alert) = detail.alert() {
        let json = serde_json::to_string_pretty(alert).context("Failed to render alert")?;
        println!("{json}");
    }

    println!();
    println!("Notes");
    for note in detail.notes() {
        println!("  - {note}");
    }

    if let Some(history) = detail.customer_history() {
        println!();
        println!("Customer history");
        print_alert_rows(&history.alerts);
    }
    Ok(())
}

//! tracing-subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target of everything logged by this library, including the metrics summary
pub const LIBRARY_TARGET: &str = "fraud_alert_console";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise each of `targets` logs at the configured
/// level and everything else at `warn`.
pub fn init(config: &LoggingConfig, targets: &[&str]) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level, targets)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn default_directives(level: &str, targets: &[&str]) -> String {
    targets
        .iter()
        .fold(String::from("warn"), |mut directives, target| {
            directives.push_str(&format!(",{target}={level}"));
            directives
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_target_gets_the_level() {
        assert_eq!(
            default_directives("info", &["seed_alerts", LIBRARY_TARGET]),
            "warn,seed_alerts=info,fraud_alert_console=info"
        );
        assert_eq!(default_directives("debug", &[]), "warn");
    }

    #[test]
    fn test_directives_enable_library_target() {
        let filter = EnvFilter::new(default_directives("info", &["seed_alerts", LIBRARY_TARGET]));
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("fraud_alert_console=info"));
        assert!(rendered.contains("seed_alerts=info"));
    }
}

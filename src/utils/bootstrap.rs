//! Bootstrap utilities for the dashboard binaries.
//!
//! Shared initialization code: tracing setup and command-line config lookup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the DASHBOARD_LOG environment variable.
///
/// Defaults to "info" level if DASHBOARD_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Extract the value of `--config <path>` (or `--config=<path>`) from the
/// process arguments.
pub fn parse_config_path() -> Option<String> {
    config_path_from_args(std::env::args().skip(1))
}

fn config_path_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_path_separate_value() {
        assert_eq!(
            config_path_from_args(args(&["--config", "dashboard.yaml"])),
            Some("dashboard.yaml".to_string())
        );
    }

    #[test]
    fn test_config_path_inline_value() {
        assert_eq!(
            config_path_from_args(args(&["-v", "--config=/etc/dashboard.yaml"])),
            Some("/etc/dashboard.yaml".to_string())
        );
    }

    #[test]
    fn test_config_path_absent() {
        assert_eq!(config_path_from_args(args(&["--port", "3000"])), None);
        assert_eq!(config_path_from_args(args(&["--config"])), None);
    }
}

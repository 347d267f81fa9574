mod cli;

/// Release version stamped by CI through `VMCLOUD_VERSION`, "dev" otherwise
pub const VERSION: &str = match option_env!("VMCLOUD_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli::config::Config;
use cli::output::OutputFormat;
use cli::{ClientSettings, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Command-line client for VictoriaMetrics Cloud
#[derive(Parser, Debug)]
#[command(name = "vmcloud", version, about, long_about = None)]
struct Args {
    /// API key (overrides the saved key)
    #[arg(long, env = "VMCLOUD_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API base URL (overrides the saved URL)
    #[arg(long, env = "VMCLOUD_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive limited to this crate's targets
    fn directive(self) -> Option<&'static str> {
        let directive = match self {
            LogLevel::Off => return None,
            LogLevel::Error => "vmcloud=error",
            LogLevel::Warn => "vmcloud=warn",
            LogLevel::Info => "vmcloud=info",
            LogLevel::Debug => "vmcloud=debug",
            LogLevel::Trace => "vmcloud=trace,reqwest=debug",
        };
        Some(directive)
    }
}

/// Log to a file under the config directory; `VMCLOUD_LOG` overrides the
/// `--log-level` filter when set
fn init_logging(level: LogLevel) -> Result<Option<WorkerGuard>> {
    let filter = match std::env::var("VMCLOUD_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid VMCLOUD_LOG filter {:?}", directives))?,
        _ => match level.directive() {
            Some(directive) => EnvFilter::new(directive),
            None => return Ok(None),
        },
    };

    let log_file = log_file_path();
    let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let file_name = log_file
        .file_name()
        .map(|name| name.to_owned())
        .unwrap_or_else(|| "vmcloud.log".into());
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        log_dir, file_name,
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(version = VERSION, log_file = ?log_file, "logging initialized");
    Ok(Some(guard))
}

fn log_file_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("vmcloud"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".vmcloud")))
        .unwrap_or_default()
        .join("vmcloud.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = match init_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::load();
    let settings = ClientSettings {
        api_key: config.effective_api_key(args.api_key.as_deref()),
        base_url: config.effective_base_url(args.base_url.as_deref()),
        timeout: Duration::from_secs(args.timeout),
    };

    match cli::run(args.command, &settings, args.output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("Error: {}", cli::format_api_error(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_directives() {
        assert_eq!(LogLevel::Off.directive(), None);
        assert_eq!(LogLevel::Info.directive(), Some("vmcloud=info"));
        assert!(EnvFilter::try_new(LogLevel::Trace.directive().unwrap()).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "vmcloud",
            "deployments",
            "list",
            "--output",
            "json",
            "--base-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080"));
    }
}

//! `cloudlog`: write one structured event through the logging facade.
//!
//! ```text
//! cloudlog [--config logging.toml | --platform run --project p] \
//!     info "cache warmed" entries=1200 cold=false
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use cloud_logging::config::load_config;
use cloud_logging::observability::logging::{init_tracing, DEFAULT_FILTER};
use cloud_logging::platform::{self, ProcessEnv};
use cloud_logging::{FieldValue, Fields, Level, LocalConfig, Logger, Options};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Platform {
    /// Local text output only
    Local,
    /// Compute Engine / Kubernetes Engine
    Gce,
    /// App Engine
    Gae,
    /// Cloud Functions
    Gcf,
    /// Cloud Run
    Run,
}

#[derive(Parser)]
#[command(name = "cloudlog")]
#[command(about = "Write a structured log event to local output and Cloud Logging", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, conflicts_with = "platform")]
    config: Option<PathBuf>,

    /// Platform preset used when no config file is given
    #[arg(short, long, value_enum)]
    platform: Option<Platform>,

    /// GCP project id (gce, run)
    #[arg(long)]
    project: Option<String>,

    /// Log id; each platform has its own default
    #[arg(long)]
    log_id: Option<String>,

    /// Override the configured level gate
    #[arg(long)]
    min_level: Option<Level>,

    /// Local output as JSON lines (no config file)
    #[arg(long)]
    json: bool,

    /// Emit the tool's own diagnostics as JSON
    #[arg(long)]
    json_diagnostics: bool,

    /// Level of the event
    level: Level,

    /// Message
    message: String,

    /// Fields as key=value
    fields: Vec<String>,
}

fn parse_field(raw: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("field '{}' is not key=value", raw))?;
    if key.is_empty() {
        return Err(format!("field '{}' has an empty key", raw));
    }
    let value = if let Ok(v) = value.parse::<i64>() {
        FieldValue::Int(v)
    } else if let Ok(v) = value.parse::<bool>() {
        FieldValue::Bool(v)
    } else if let Ok(v) = value.parse::<f64>() {
        FieldValue::Float(v)
    } else {
        FieldValue::Str(value.to_string())
    };
    Ok((key.to_string(), value))
}

fn build_options(cli: &Cli) -> Result<Options, Box<dyn std::error::Error>> {
    let project = cli.project.as_deref().unwrap_or_default();
    let log_id = cli.log_id.as_deref();

    let options = match (&cli.config, cli.platform) {
        (Some(path), _) => {
            let config = load_config(path)?;
            tracing::info!(path = ?path, "Configuration loaded");
            Options::from_config(&config)
        }
        (None, Some(Platform::Gce)) => {
            platform::compute_engine_options(project, log_id.unwrap_or("cloudlog"))
        }
        (None, Some(Platform::Gae)) => platform::app_engine_options(&ProcessEnv, log_id),
        (None, Some(Platform::Gcf)) => platform::cloud_function_options(&ProcessEnv, log_id)?,
        (None, Some(Platform::Run)) => platform::cloud_run_options(&ProcessEnv, project, log_id),
        (None, Some(Platform::Local)) | (None, None) => {
            let local = if cli.json {
                LocalConfig::json()
            } else {
                LocalConfig::text()
            };
            Options::new().local(local)
        }
    };

    Ok(match cli.min_level {
        Some(level) => options.level(level),
        None => options,
    })
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let fields = cli
        .fields
        .iter()
        .map(|raw| parse_field(raw))
        .collect::<Result<Fields, String>>()?;

    let logger = Logger::new(build_options(&cli)?)?;
    tracing::debug!(backends = ?logger.backend_names(), "Logger ready");

    logger.log(cli.level, cli.message.as_str(), fields);
    logger.close()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(DEFAULT_FILTER, cli.json_diagnostics);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "cloudlog failed");
            eprintln!("cloudlog: {}", e);
            ExitCode::FAILURE
        }
    }
}

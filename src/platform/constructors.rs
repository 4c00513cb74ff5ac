//! Environment-aware logger constructors.
//!
//! Each platform has an `*_options` function that only reads the
//! environment and decides the backends, a `*_logger` function that builds
//! the logger from the process environment, and a `must_*` variant that
//! panics instead of returning an error.

use crate::backend::{LocalConfig, RemoteConfig};
use crate::error::LoggingResult;
use crate::logger::{Logger, Options};
use crate::platform::env::{EnvSource, ProcessEnv};
use crate::platform::MonitoredResource;

pub const CLOUD_FUNCTIONS_LOG_ID: &str = "cloudfunctions.googleapis.com/cloud-functions";
pub const APP_ENGINE_LOG_ID: &str = "appengine.googleapis.com/request_log";
pub const CLOUD_RUN_LOG_ID: &str = "run.googleapis.com/request_log";

fn log_id_or(log_id: Option<&str>, default: &str) -> String {
    log_id
        .filter(|id| !id.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn must(result: LoggingResult<Logger>) -> Logger {
    match result {
        Ok(logger) => logger,
        Err(e) => panic!("failed to create logger: {}", e),
    }
}

/// Compute Engine / GKE: remote only. The resource is left for the
/// logging service to detect.
pub fn compute_engine_options(project_id: &str, log_id: &str) -> Options {
    Options::new().remote(RemoteConfig::new(project_id, log_id))
}

pub fn compute_engine_logger(project_id: &str, log_id: &str) -> LoggingResult<Logger> {
    Logger::new(compute_engine_options(project_id, log_id))
}

pub fn must_compute_engine_logger(project_id: &str, log_id: &str) -> Logger {
    must(compute_engine_logger(project_id, log_id))
}

/// Cloud Functions: remote only; `GCP_PROJECT`, `FUNCTION_NAME` and
/// `FUNCTION_REGION` are required.
pub fn cloud_function_options(env: &impl EnvSource, log_id: Option<&str>) -> LoggingResult<Options> {
    let project_id = env.require("GCP_PROJECT")?;
    let function_name = env.require("FUNCTION_NAME")?;
    let region = env.require("FUNCTION_REGION")?;

    let resource = MonitoredResource::new("cloud_function")
        .with_label("project_id", project_id.as_str())
        .with_label("function_name", function_name)
        .with_label("region", region);

    let remote = RemoteConfig::new(project_id, log_id_or(log_id, CLOUD_FUNCTIONS_LOG_ID))
        .with_resource(resource);
    Ok(Options::new().remote(remote))
}

pub fn cloud_function_logger(log_id: Option<&str>) -> LoggingResult<Logger> {
    Logger::new(cloud_function_options(&ProcessEnv, log_id)?)
}

pub fn must_cloud_function_logger(log_id: Option<&str>) -> Logger {
    must(cloud_function_logger(log_id))
}

/// App Engine: remote when `GOOGLE_CLOUD_PROJECT`, `GAE_SERVICE` and
/// `GAE_VERSION` are all set, local text output otherwise (dev server).
pub fn app_engine_options(env: &impl EnvSource, log_id: Option<&str>) -> Options {
    let project_id = env.get("GOOGLE_CLOUD_PROJECT");
    let service = env.get("GAE_SERVICE");
    let version = env.get("GAE_VERSION");

    match (project_id, service, version) {
        (Some(project_id), Some(service), Some(version)) => {
            let resource = MonitoredResource::new("gae_app")
                .with_label("project_id", project_id.as_str())
                .with_label("module_id", service)
                .with_label("version_id", version);
            let remote = RemoteConfig::new(project_id, log_id_or(log_id, APP_ENGINE_LOG_ID))
                .with_resource(resource);
            Options::new().remote(remote)
        }
        _ => Options::new().local(LocalConfig::text()),
    }
}

pub fn app_engine_logger(log_id: Option<&str>) -> LoggingResult<Logger> {
    Logger::new(app_engine_options(&ProcessEnv, log_id))
}

pub fn must_app_engine_logger(log_id: Option<&str>) -> Logger {
    must(app_engine_logger(log_id))
}

/// Cloud Run: remote when `K_SERVICE`, `K_REVISION` and `K_CONFIGURATION`
/// are all set, local text output otherwise.
pub fn cloud_run_options(env: &impl EnvSource, project_id: &str, log_id: Option<&str>) -> Options {
    let service = env.get("K_SERVICE");
    let revision = env.get("K_REVISION");
    let configuration = env.get("K_CONFIGURATION");

    match (service, revision, configuration) {
        (Some(service), Some(revision), Some(configuration)) => {
            let resource = MonitoredResource::new("cloud_run_revision")
                .with_label("project_id", project_id)
                .with_label("service_name", service)
                .with_label("revision_name", revision)
                .with_label("configuration_name", configuration);
            let remote = RemoteConfig::new(project_id, log_id_or(log_id, CLOUD_RUN_LOG_ID))
                .with_resource(resource);
            Options::new().remote(remote)
        }
        _ => Options::new().local(LocalConfig::text()),
    }
}

pub fn cloud_run_logger(project_id: &str, log_id: Option<&str>) -> LoggingResult<Logger> {
    Logger::new(cloud_run_options(&ProcessEnv, project_id, log_id))
}

pub fn must_cloud_run_logger(project_id: &str, log_id: Option<&str>) -> Logger {
    must(cloud_run_logger(project_id, log_id))
}

/// Local text logger only. The first path is the output, the second the
/// error output; the defaults are stdout and stderr.
pub fn local_logger<S: AsRef<str>>(paths: &[S]) -> LoggingResult<Logger> {
    Logger::new(Options::new().local(LocalConfig::text().with_paths(paths)))
}

pub fn must_local_logger<S: AsRef<str>>(paths: &[S]) -> Logger {
    must(local_logger(paths))
}

//! Settings of the checker client and the ledger

use std::{env::VarError, path::PathBuf, time::Duration};

/// The public coordinate checker
pub const DEFAULT_BASE_URL: &str = "https://geocheck.org";
/// Relative to the working directory
pub const DEFAULT_LEDGER_PATH: &str = "checked_points.txt";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_LOG: &str = "info";

/// Invalid configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The environment variable has an unusable value
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar {
        /// Variable name
        var: String,
        /// What is wrong with the value
        reason: String,
    },
}

/// Runtime settings, all from the `GEOCHECK_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the checker site
    pub base_url: String,
    /// File of the checked points
    pub ledger_path: PathBuf,
    /// Limit for every single HTTP request
    pub request_timeout: Duration,
    /// `User-Agent` header of the requests
    pub user_agent: String,
    /// `None` waits for the operator forever
    pub max_rate_limit_waits: Option<u32>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log: String,
}

/// Load the configuration from the environment after reading the `.env` file.
///
/// # Errors
///
/// Returns `ConfigError` if some value is invalid.
pub fn load_config() -> Result<Config, ConfigError> {
    // the `.env` file is optional
    let _ = dotenvy::dotenv();
    build_config(|key| std::env::var(key))
}

/// Build the configuration using the provided env-var lookup function.
fn build_config<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let base_url = or_default("GEOCHECK_BASE_URL", DEFAULT_BASE_URL);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "GEOCHECK_BASE_URL",
            format!("{base_url:?} is not an http(s) URL"),
        ));
    }

    let ledger_path = PathBuf::from(or_default("GEOCHECK_LEDGER_PATH", DEFAULT_LEDGER_PATH));

    let timeout_var = "GEOCHECK_REQUEST_TIMEOUT_SECS";
    let request_timeout = or_default(timeout_var, DEFAULT_TIMEOUT_SECS)
        .parse::<u64>()
        .map_err(|e| invalid(timeout_var, e.to_string()))?;
    if request_timeout == 0 {
        return Err(invalid(timeout_var, "must be positive".to_string()));
    }

    let user_agent = or_default(
        "GEOCHECK_USER_AGENT",
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
    );

    let waits_var = "GEOCHECK_MAX_RATE_LIMIT_WAITS";
    let max_rate_limit_waits = lookup(waits_var)
        .ok()
        .map(|raw| raw.parse::<u32>().map_err(|e| invalid(waits_var, e.to_string())))
        .transpose()?;

    let log = or_default("GEOCHECK_LOG", DEFAULT_LOG);

    Ok(Config {
        base_url,
        ledger_path,
        request_timeout: Duration::from_secs(request_timeout),
        user_agent,
        max_rate_limit_waits,
        log,
    })
}

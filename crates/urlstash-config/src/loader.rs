//! Environment loading and validation for [`Settings`].

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    DEFAULT_BIND_ADDR, DEFAULT_JOB_BUDGET_SECS, DEFAULT_RETRIEVAL_TOOL, DEFAULT_SCRATCH_ROOT,
    DEFAULT_STORE_URL, Settings,
};

const ENV_BIND_ADDR: &str = "URLSTASH_BIND_ADDR";
const ENV_SCRATCH_ROOT: &str = "URLSTASH_SCRATCH_ROOT";
const ENV_RETRIEVAL_TOOL: &str = "URLSTASH_RETRIEVAL_TOOL";
const ENV_STORE_URL: &str = "URLSTASH_STORE_URL";
const ENV_JOB_BUDGET_SECS: &str = "URLSTASH_JOB_BUDGET_SECS";

/// Load settings from the process environment, falling back to defaults
/// for unset variables.
///
/// # Errors
///
/// Returns an error if a variable is set but fails parsing or validation.
pub fn load_from_env() -> ConfigResult<Settings> {
    load_with(|name| std::env::var(name).ok())
}

fn load_with<F>(lookup: F) -> ConfigResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let bind_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = bind_addr
        .parse()
        .map_err(|_| ConfigError::InvalidField {
            field: "bind_addr",
            reason: "not a socket address",
            value: Some(bind_addr.clone()),
        })?;

    let scratch_root = lookup(ENV_SCRATCH_ROOT)
        .map_or_else(|| PathBuf::from(DEFAULT_SCRATCH_ROOT), PathBuf::from);
    if scratch_root.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "scratch_root",
            reason: "must not be empty",
            value: None,
        });
    }

    let retrieval_tool =
        lookup(ENV_RETRIEVAL_TOOL).unwrap_or_else(|| DEFAULT_RETRIEVAL_TOOL.to_string());
    if retrieval_tool.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "retrieval_tool",
            reason: "must not be empty",
            value: Some(retrieval_tool),
        });
    }

    let store_base_url = lookup(ENV_STORE_URL).unwrap_or_else(|| DEFAULT_STORE_URL.to_string());
    let store_base_url = Url::parse(&store_base_url).map_err(|_| ConfigError::InvalidField {
        field: "store_base_url",
        reason: "not a valid url",
        value: Some(store_base_url.clone()),
    })?;
    if !matches!(store_base_url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidField {
            field: "store_base_url",
            reason: "scheme must be http or https",
            value: Some(store_base_url.to_string()),
        });
    }

    let job_budget_secs = match lookup(ENV_JOB_BUDGET_SECS) {
        Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidField {
            field: "job_budget",
            reason: "not a positive integer",
            value: Some(raw.clone()),
        })?,
        None => DEFAULT_JOB_BUDGET_SECS,
    };
    if job_budget_secs == 0 {
        return Err(ConfigError::InvalidField {
            field: "job_budget",
            reason: "must be greater than zero",
            value: Some(job_budget_secs.to_string()),
        });
    }

    Ok(Settings {
        bind_addr,
        scratch_root,
        retrieval_tool,
        store_base_url,
        job_budget: Duration::from_secs(job_budget_secs),
    })
}

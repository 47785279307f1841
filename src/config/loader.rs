//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "traindesk.toml";

/// Load configuration from traindesk.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Reject configurations that cannot be used safely.
fn validate(config: &Config) -> Result<()> {
    if config.auth.secret.trim().is_empty() {
        return Err(Error::Config(
            "auth.secret must be set (use the TRAINDESK_SECRET environment variable)".to_string(),
        ));
    }
    if config.auth.token_ttl_minutes <= 0 {
        return Err(Error::Config(
            "auth.token_ttl_minutes must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Traindesk Configuration

[server]
host = "0.0.0.0"
port = 4080

[auth]
secret = "${TRAINDESK_SECRET}"
token_ttl_minutes = 60
renewal_window_minutes = 5
inactivity_minutes = 5
reset_token_minutes = 10

# Initial account created at startup when the user store is empty.
# [bootstrap]
# username = "superadmin"
# email = "admin@example.gov"
# password = "${TRAINDESK_BOOTSTRAP_PASSWORD}"
# office = "Administration"
"#
}

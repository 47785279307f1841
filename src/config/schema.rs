//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Authentication configuration.
///
/// `token_ttl_minutes` is the single TTL used by every issuance path,
/// login and refresh alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret. Must be non-empty; there is no built-in
    /// fallback value.
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,

    /// Refresh when less than this remains before expiry.
    #[serde(default = "default_renewal_window")]
    pub renewal_window_minutes: i64,

    /// Force logout after this long without user interaction.
    #[serde(default = "default_inactivity")]
    pub inactivity_minutes: i64,

    /// Lifetime of password-reset tokens.
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_minutes: i64,
}

fn default_token_ttl() -> i64 {
    60
}

fn default_renewal_window() -> i64 {
    5
}

fn default_inactivity() -> i64 {
    5
}

fn default_reset_token_ttl() -> i64 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_minutes: default_token_ttl(),
            renewal_window_minutes: default_renewal_window(),
            inactivity_minutes: default_inactivity(),
            reset_token_minutes: default_reset_token_ttl(),
        }
    }
}

/// Initial account seeded at startup when the user store is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub username: String,
    pub email: String,
    pub password: String,

    #[serde(default = "default_bootstrap_firstname")]
    pub firstname: String,

    #[serde(default = "default_bootstrap_lastname")]
    pub lastname: String,

    #[serde(default = "default_bootstrap_office")]
    pub office: String,
}

fn default_bootstrap_firstname() -> String {
    "System".to_string()
}

fn default_bootstrap_lastname() -> String {
    "Administrator".to_string()
}

fn default_bootstrap_office() -> String {
    "Administration".to_string()
}

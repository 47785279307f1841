//! CLI command implementations

use crate::api;
use crate::config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "traindesk.toml";

/// Write a default configuration file into the current directory.
pub async fn init() -> Result<()> {
    let path = Path::new(CONFIG_FILENAME);
    if path.exists() {
        return Err(Error::Config(format!(
            "{} already exists, refusing to overwrite",
            CONFIG_FILENAME
        )));
    }
    fs::write(path, config::default_config_content())?;
    tracing::info!("wrote {}", CONFIG_FILENAME);
    Ok(())
}

/// Load the configuration and run the server.
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    api::server::run_server(config, &host, port).await
}

//! Outbound mail seam
//!
//! Password-reset delivery goes through this trait. The default
//! implementation logs instead of sending; a real transport plugs in behind
//! the same interface.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Writes outbound mail to the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        tracing::info!(%to, %subject, %body, "outbound mail");
        Ok(())
    }
}

//! HTTP API server

pub mod auth;
pub mod server;
pub mod taxonomy;
pub mod trainings;
pub mod users;

pub use server::*;

use serde::{Deserialize, Serialize};

/// Simple `{ "message": ... }` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

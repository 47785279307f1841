//! Error types for Traindesk

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'traindesk init' first.")]
    ConfigNotFound,

    #[error("No authentication token provided")]
    MissingCredential,

    #[error("Invalid token: {0}")]
    InvalidCredential(String),

    #[error("Token expired")]
    ExpiredCredential,

    #[error("Access denied")]
    Forbidden,

    #[error("Account is pending approval")]
    NotApproved,

    #[error("Invalid credentials")]
    BadPassword,

    #[error("Username or email already exists")]
    AccountConflict,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token signing error: {0}")]
    TokenSigning(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// HTTP status for this error.
    ///
    /// Authentication failures (missing/invalid/expired token) all map to
    /// 401; authorization failures map to 403 and are never conflated with
    /// authentication. Invalid and expired tokens share one wire message,
    /// the distinction is only logged server-side.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingCredential
            | Error::InvalidCredential(_)
            | Error::ExpiredCredential
            | Error::BadPassword => StatusCode::UNAUTHORIZED,
            Error::Forbidden | Error::NotApproved => StatusCode::FORBIDDEN,
            Error::AccountConflict => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal errors and token-verification details
    /// are replaced with generic text.
    fn public_message(&self) -> String {
        match self {
            Error::InvalidCredential(_) | Error::ExpiredCredential => {
                "Invalid or expired token.".to_string()
            }
            Error::MissingCredential => "No token provided.".to_string(),
            Error::BadPassword => "Invalid credentials.".to_string(),
            Error::Forbidden => "Access denied.".to_string(),
            Error::NotApproved => "Account is pending approval.".to_string(),
            Error::AccountConflict => "Username or email already exists.".to_string(),
            Error::NotFound(what) => format!("{} not found.", what),
            Error::Validation(msg) => msg.clone(),
            _ => "Internal server error.".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "message": self.public_message() }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

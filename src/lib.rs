//! Traindesk - training-record management with role-based access control
//!
//! Library interface: the token issuer, access-control middleware, role
//! policy and client-side session lifecycle, plus the HTTP API that ties
//! them to the record store.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod mail;
pub mod store;

pub use config::Config;
pub use error::Error;

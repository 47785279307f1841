//! CLI interface for Traindesk

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "traindesk")]
#[command(version = "0.1.0")]
#[command(about = "Training-record management service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new traindesk.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

//! CLI command definitions for the `memlens` binary.
//!
//! `serve` runs the proxy; `check-key` and `compare` exercise the same
//! adapters from the terminal using server-side configuration.

pub mod check_key;
pub mod compare;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use memlens_types::vendor::Vendor;

/// Side-by-side proxy for the Mem0 and Zep memory APIs.
#[derive(Parser)]
#[command(name = "memlens", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to a TOML config file.
    #[arg(long, global = true, env = "MEMLENS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server.
    Serve {
        /// Port to listen on (overrides PORT and the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides HOST and the config file).
        #[arg(long)]
        host: Option<String>,

        /// Directory of the built dashboard to serve.
        #[arg(long)]
        web_dir: Option<String>,
    },

    /// Check that a vendor API key is accepted, without sending a message.
    #[command(name = "check-key")]
    CheckKey {
        /// Vendor to check (mem0 or zep).
        vendor: Vendor,

        /// API key; Zep falls back to ZEP_API_KEY.
        #[arg(long)]
        api_key: Option<String>,

        /// Base URL override.
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Send one message to both vendors and print both replies.
    Compare {
        /// Message to send.
        message: String,

        /// Session / user identity shared by both vendors.
        #[arg(long)]
        session_id: Option<String>,

        /// Mem0 API key.
        #[arg(long, env = "MEM0_API_KEY", hide_env_values = true)]
        mem0_api_key: Option<String>,

        /// Mem0 base URL override.
        #[arg(long)]
        mem0_api_url: Option<String>,

        /// Zep API key; falls back to ZEP_API_KEY.
        #[arg(long)]
        zep_api_key: Option<String>,

        /// Zep base URL override.
        #[arg(long)]
        zep_api_url: Option<String>,
    },
}

impl Commands {
    /// Default log filter when neither `-v` nor `RUST_LOG` is given.
    pub fn default_filter(&self) -> &'static str {
        match self {
            Commands::Serve { .. } => "info",
            _ => "warn",
        }
    }
}

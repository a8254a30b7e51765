//! CLI module - Command-line interface for soloauth
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// soloauth - single-admin username/password authentication service
#[derive(Parser)]
#[command(name = "soloauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (otherwise the default search paths are used)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Create the administrator account from the command line
    CreateAdmin {
        /// Username for the administrator
        username: String,
        /// Password for the administrator
        #[arg(long)]
        password: String,
    },

    /// Validate the config and check that the database is reachable
    Check,
}

pub use commands::*;

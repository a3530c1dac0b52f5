//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses, bills, and what they are telling you
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance tracker with expense analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// User the command operates on
    #[arg(long, default_value = "local", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable the authenticated-user header requirement
        ///
        /// WARNING: Do not use this flag when exposing the server to a
        /// network. By default, the server requires the identity provider's
        /// x-auth-user-id header on every request.
        #[arg(long)]
        no_auth: bool,
    },

    /// Record a transaction
    Add {
        /// income or expense
        #[arg(short, long)]
        kind: String,

        /// Amount (non-negative)
        #[arg(short, long)]
        amount: f64,

        /// Category label (e.g. Food, Rent, Salary)
        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Free-form note
        #[arg(long)]
        description: Option<String>,
    },

    /// List recent transactions
    Transactions {
        /// How many to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Manage bills
    Bills {
        #[command(subcommand)]
        action: Option<BillsAction>,
    },

    /// Run expense analytics over the recent window
    Analyze {
        /// Forecast horizon in days
        #[arg(long, default_value = "30")]
        days_ahead: u32,

        /// Size of the recent-transaction window
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Bill notifications
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },

    /// Show dashboard summary
    Status,
}

#[derive(Subcommand)]
pub enum BillsAction {
    /// Add a bill
    Add {
        /// Bill title
        #[arg(short, long)]
        title: String,

        /// Amount due
        #[arg(short, long)]
        amount: f64,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// List bills
    List,

    /// Mark a bill as paid
    Pay {
        /// Bill id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Classify bills and create due notifications
    Check,

    /// List notifications
    List {
        /// Include read notifications
        #[arg(long)]
        all: bool,
    },
}

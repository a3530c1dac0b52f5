//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                  Initialize database
//!   tally add --kind expense --amount 12.50 --category Food
//!   tally analyze               Run expense analytics
//!   tally notify check          Create due-bill notifications
//!   tally serve --port 3000     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
        Commands::Add {
            kind,
            amount,
            category,
            date,
            currency,
            description,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(
                &db,
                &cli.user,
                &kind,
                amount,
                &category,
                date.as_deref(),
                &currency,
                description.as_deref(),
            )
        }
        Commands::Transactions { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_transactions(&db, &cli.user, limit)
        }
        Commands::Bills { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(BillsAction::List) => commands::cmd_bills_list(&db, &cli.user),
                Some(BillsAction::Add {
                    title,
                    amount,
                    due,
                    currency,
                }) => commands::cmd_bills_add(&db, &cli.user, &title, amount, &due, &currency),
                Some(BillsAction::Pay { id }) => commands::cmd_bills_pay(&db, &cli.user, id),
            }
        }
        Commands::Analyze { days_ahead, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_analyze(&db, &cli.user, days_ahead, limit)
        }
        Commands::Notify { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                NotifyAction::Check => commands::cmd_notify_check(&db, &cli.user),
                NotifyAction::List { all } => commands::cmd_notify_list(&db, &cli.user, all),
            }
        }
        Commands::Status => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_status(&db, &cli.user)
        }
    }
}

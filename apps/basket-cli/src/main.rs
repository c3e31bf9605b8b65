//! # basket: Cart Command-Line Front End
//!
//! Reads and edits the persisted cart from a terminal.
//!
//! ## Usage
//! ```bash
//! basket list
//! basket totals
//! basket add --id 42 --title "Coffee Mug" --image-url https://img/42.png --price 12.50
//! basket inc 42
//! basket dec 42
//!
//! # Use another database file or config
//! basket --db /tmp/cart.db list
//! basket --config ./basket.toml list
//! ```
//!
//! Results are printed to stdout as JSON. Logs go to stderr and follow
//! `RUST_LOG` (default `info,basket=debug,sqlx=warn`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use basket_core::{Money, NewLineItem};
use basket_store::BasketConfig;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::Action;
use error::CliResult;

#[derive(Debug, Parser)]
#[command(name = "basket")]
#[command(author, version, about = "Persistent shopping cart")]
struct Cli {
    /// Config file (defaults to basket.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite file, overriding the configured path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cart
    List,
    /// Print item count, total quantity and subtotal
    Totals,
    /// Add one unit of a product
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price as a decimal amount, e.g. 12.50
        #[arg(long)]
        price: f64,
    },
    /// Add one unit to an item already in the cart
    Inc { id: String },
    /// Remove one unit, dropping the item at zero
    Dec { id: String },
}

impl Commands {
    fn into_action(self) -> CliResult<Action> {
        Ok(match self {
            Commands::List => Action::List,
            Commands::Totals => Action::Totals,
            Commands::Add {
                id,
                title,
                image_url,
                price,
            } => Action::Add(NewLineItem::new(
                id,
                title,
                image_url,
                Money::from_decimal(price)?,
            )),
            Commands::Inc { id } => Action::Increment(id),
            Commands::Dec { id } => Action::Decrement(id),
        })
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "Command failed");
            let report = serde_json::to_string(&e.report())
                .unwrap_or_else(|_| format!("{{\"message\":\"{e}\"}}"));
            eprintln!("{report}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let mut config = BasketConfig::load(cli.config)?;
    if let Some(db) = cli.db {
        config.storage.database_path = Some(db);
    }

    let action = cli.command.into_action()?;

    let session = commands::open_session(&config).await?;
    let result = commands::execute(&session.store, action).await;
    session.close().await;

    Ok(serde_json::to_string_pretty(&result?)?)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket_store=trace` - Trace the store and its writer only
/// - Default: INFO, DEBUG for basket crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,basket=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

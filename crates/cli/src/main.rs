//! Sugarplum CLI - Inventory management tools.
//!
//! # Usage
//!
//! ```bash
//! # List the current inventory
//! sp-cli catalog
//!
//! # Seed the shop with a demo catalog (admin credentials required)
//! sp-cli seed
//!
//! # Restock a sweet (admin credentials required)
//! sp-cli restock --id s-42 --quantity 25
//! ```
//!
//! # Environment Variables
//!
//! - `SUGARPLUM_API_BASE_URL` - Base URL of the Sweet Shop API
//! - `SUGARPLUM_ADMIN_USERNAME` - Admin account for mutating commands
//! - `SUGARPLUM_ADMIN_PASSWORD` - Admin password (validated for strength)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Sugarplum CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current inventory
    Catalog {
        /// Server-side name search
        #[arg(long)]
        name: Option<String>,

        /// Server-side category filter
        #[arg(long)]
        category: Option<String>,
    },
    /// Seed the shop with a demo catalog
    Seed {
        /// Delete nothing, only add sweets that are missing by name
        #[arg(long)]
        skip_existing: bool,
    },
    /// Restock a sweet
    Restock {
        /// Sweet identifier
        #[arg(short, long)]
        id: String,

        /// Units to add
        #[arg(short, long)]
        quantity: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { name, category } => {
            commands::catalog::list(name.as_deref(), category.as_deref()).await?;
        }
        Commands::Seed { skip_existing } => commands::seed::run(skip_existing).await?,
        Commands::Restock { id, quantity } => commands::restock::run(&id, quantity).await?,
    }
    Ok(())
}

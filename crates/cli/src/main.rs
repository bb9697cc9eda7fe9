//! Longbox CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! longbox-cli migrate
//!
//! # Seed the catalog with demo data
//! longbox-cli seed
//!
//! # Create a staff user
//! longbox-cli user create -e staff@example.com -n "Staff Name" --staff
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with demo categories and products
//! - `user create` - Create users with role flags

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "longbox-cli")]
#[command(author, version, about = "Longbox CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with demo data
    Seed,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Grant the staff flag (catalog management)
        #[arg(long)]
        staff: bool,

        /// Grant the superuser flag (full access)
        #[arg(long)]
        superuser: bool,

        /// Add to a group (repeatable; "Owner" grants the owner role)
        #[arg(short, long)]
        group: Vec<String>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                staff,
                superuser,
                group,
            } => {
                commands::user::create(&email, &name, superuser, staff, group).await?;
            }
        },
    }
    Ok(())
}

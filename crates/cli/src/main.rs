//! Washboard CLI - tenant migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations to every tenant schema
//! wb-cli migrate all
//!
//! # Apply migrations to one tenant schema
//! wb-cli migrate tenant tenant_blue_lotus
//!
//! # Provision a new tenant schema (create + migrate)
//! wb-cli tenant create tenant_blue_lotus
//!
//! # Bootstrap a SAAS admin
//! wb-cli admin create -e admin@example.com -u asha.verma \
//!     --first-name Asha --last-name Verma --phone 9876543210
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply the embedded migrations per tenant schema
//! - `tenant create` - Create and migrate a tenant schema
//! - `admin create` - Create a SAAS admin with a generated password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wb-cli")]
#[command(author, version, about = "Washboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage tenant schemas
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },
    /// Manage SAAS admins
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Migrate every tenant schema found in the database
    All,
    /// Migrate a single tenant schema
    Tenant {
        /// Tenant schema name
        schema: String,
    },
}

#[derive(Subcommand)]
enum TenantAction {
    /// Create a tenant schema and apply migrations to it
    Create {
        /// Tenant schema name
        schema: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new SAAS admin
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin first name
        #[arg(long)]
        first_name: String,

        /// Admin last name
        #[arg(long)]
        last_name: String,

        /// Admin phone number (10 digits)
        #[arg(long)]
        phone: String,

        /// Tenant schema (defaults to public)
        #[arg(long)]
        schema: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wb_cli=info,washboard_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::All => commands::migrate::all().await,
            MigrateTarget::Tenant { schema } => commands::migrate::tenant(&schema).await,
        },
        Commands::Tenant { action } => match action {
            TenantAction::Create { schema } => commands::tenant::create(&schema).await,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                username,
                first_name,
                last_name,
                phone,
                schema,
            } => {
                commands::admin::create(
                    &email,
                    &username,
                    &first_name,
                    &last_name,
                    &phone,
                    schema.as_deref(),
                )
                .await
            }
        },
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

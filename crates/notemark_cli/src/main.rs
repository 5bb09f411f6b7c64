//! notemark CLI
//!
//! Command-line tools for mirroring a Notion-style workspace into local
//! Markdown files and pushing local edits back.
//!
//! # Commands
//!
//! - `auth status` - Show authentication status
//! - `search` - Search pages and databases
//! - `db list` / `db schema` / `db pull` - Database commands
//! - `page get` / `page append` - Page commands
//! - `sync once` / `sync run` - Bidirectional sync

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default sync root, `~` expanded at use.
const DEFAULT_SYNC_DIR: &str = "~/notion-sync";

/// notemark command-line tools.
#[derive(Parser)]
#[command(name = "notemark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Search pages and databases
    Search {
        /// Search query
        query: String,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Database commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Page commands
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Bidirectional sync commands
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Show authentication status and the environment variables used
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// List databases accessible to the integration
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a database schema
    Schema {
        /// Database ID
        #[arg(long)]
        id: String,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Skip the freshness-guarded sync for this command
        #[arg(long)]
        no_refresh: bool,
    },

    /// Dump a database's pages as JSON
    Pull {
        /// Database ID
        #[arg(long)]
        id: String,

        /// Output file, default stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip the freshness-guarded sync for this command
        #[arg(long)]
        no_refresh: bool,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    /// Show page information
    Get {
        /// Page ID
        #[arg(long)]
        id: String,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a Markdown file's content to an existing page
    Append {
        /// Page ID
        #[arg(long)]
        id: String,

        /// Markdown file to append
        #[arg(long)]
        content: PathBuf,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Run a one-time bidirectional sync for all visible databases
    Once {
        /// Sync root directory
        #[arg(long, default_value = DEFAULT_SYNC_DIR)]
        dir: String,
    },

    /// Run a looped bidirectional sync (polling)
    Run {
        /// Sync root directory
        #[arg(long, default_value = DEFAULT_SYNC_DIR)]
        dir: String,

        /// Polling interval in seconds (minimum 10)
        #[arg(long, default_value = "60")]
        interval: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Auth {
            command: AuthCommands::Status { json },
        } => {
            commands::auth::status(json);
        }
        Commands::Search { query, json } => {
            commands::search::run(&query, json).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::List { json } => commands::db::list(json).await?,
            DbCommands::Schema { id, json, no_refresh } => {
                commands::db::schema(&id, json, no_refresh).await?
            }
            DbCommands::Pull { id, out, no_refresh } => {
                commands::db::pull(&id, out.as_deref(), no_refresh).await?
            }
        },
        Commands::Page { command } => match command {
            PageCommands::Get { id, json } => commands::page::get(&id, json).await?,
            PageCommands::Append { id, content } => commands::page::append(&id, &content).await?,
        },
        Commands::Sync { command } => match command {
            SyncCommands::Once { dir } => commands::sync::once(&dir).await?,
            SyncCommands::Run { dir, interval } => commands::sync::run(&dir, interval).await?,
        },
    }

    Ok(())
}

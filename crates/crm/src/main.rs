// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `crm` - conversational CRM assistant.
//!
//! Binary entry point: parses the command line, loads configuration,
//! wires storage, embeddings, and generation, then runs one subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod chat;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Conversational CRM assistant with long-term memory and a knowledge base.
#[derive(Parser, Debug)]
#[command(name = "crm", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the assistant about one contact.
    Chat {
        /// Contact id to converse about.
        #[arg(long)]
        contact: i64,
    },
    /// Manage contacts.
    #[command(subcommand)]
    Contact(ContactCommand),
    /// Manage the knowledge base.
    #[command(subcommand)]
    Knowledge(KnowledgeCommand),
    /// Show a contact's interactions and summaries.
    History {
        contact: i64,
    },
}

#[derive(Subcommand, Debug)]
enum ContactCommand {
    /// Create a contact.
    Add {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long, default_value = "new")]
        status: String,
    },
    /// List contacts, newest first.
    List,
}

#[derive(Subcommand, Debug)]
enum KnowledgeCommand {
    /// Embed and store a document.
    Add {
        content: String,
        /// Metadata as key=value; repeatable.
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },
    /// Search documents by similarity.
    Search {
        query: String,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => crm_config::load_and_validate_path(path),
        None => crm_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            crm_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: crm_config::CrmConfig) -> Result<(), crm_core::CrmError> {
    let app = app::App::open(config).await?;

    let result = match command {
        Commands::Chat { contact } => chat::run_chat(&app, contact).await,
        Commands::Contact(ContactCommand::Add {
            name,
            email,
            company,
            status,
        }) => commands::add_contact(&app, name, email, company, status).await,
        Commands::Contact(ContactCommand::List) => commands::list_contacts(&app).await,
        Commands::Knowledge(KnowledgeCommand::Add { content, meta }) => {
            commands::add_knowledge(&app, &content, &meta).await
        }
        Commands::Knowledge(KnowledgeCommand::Search { query, limit }) => {
            commands::search_knowledge(&app, &query, limit).await
        }
        Commands::History { contact } => commands::show_history(&app, contact).await,
    };

    app.close().await?;
    result
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crm={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

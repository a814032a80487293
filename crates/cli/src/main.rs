use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "prompt-library")]
#[command(about = "Save and reuse prompts across chat assistants", long_about = None)]
struct Cli {
    /// Base URL of the prompt store (overrides PROMPT_LIBRARY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Directory for the session and offline prompts (overrides PROMPT_LIBRARY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Use the offline prompt list even when signed in
    #[arg(long, global = true)]
    local: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a bearer token for the prompt store
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// Show session and configuration
    Status,
    /// Print saved prompts, newest first, as JSON
    List,
    /// Save a new prompt
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// Replace the title, content and tag of a prompt
    Edit {
        id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// Delete a prompt
    Delete {
        id: String,
        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.api_url, cli.data_dir)?;

    match cli.command {
        Commands::Login { token } => commands::session::login(&config, &token)?,
        Commands::Logout => commands::session::logout(&config)?,
        Commands::Status => commands::session::status(&config)?,
        Commands::List => commands::prompts::list(&config, cli.local).await?,
        Commands::Add { title, content, tag } => {
            commands::prompts::add(&config, cli.local, &title, &content, &tag).await?;
        },
        Commands::Edit { id, title, content, tag } => {
            commands::prompts::edit(&config, cli.local, &id, &title, &content, &tag).await?;
        },
        Commands::Delete { id, yes } => commands::prompts::delete(&config, cli.local, &id, yes).await?,
    }

    Ok(())
}

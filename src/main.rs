//! slack-sim - a simulated team-chat workspace in the terminal
//!
//! Synthesizes a company's channels, DMs and history from a profile, then
//! keeps the workspace alive with ambient activity.

mod commands;
mod config;
mod content;
mod models;
mod profile;
mod sim;
mod tui;
mod view;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::Workspace;
use sim::{ActivitySimulator, Engine};

#[derive(Parser)]
#[command(name = "slack-sim")]
#[command(about = "Simulated team-chat workspace for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory with company.json, people.json and theme.json
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface (default)
    Tui,

    /// List the workspace's channels and DMs
    Conversations,

    /// Print a synthesized conversation history
    History {
        /// Conversation ID (from `conversations` output)
        id: String,

        /// Maximum number of messages to show
        #[arg(short, long, default_value = "30")]
        limit: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run ambient activity headless and print each post
    Simulate {
        /// Number of ambient ticks
        #[arg(short, long, default_value = "20")]
        ticks: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the embed cards detected in a piece of text
    Embeds {
        /// Text containing links
        text: String,
    },

    /// Show the company outline derived from the profile
    Profile,

    /// Write a default config file
    InitConfig,
}

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its logs go to the debug pane instead.
    let log_buffer = matches!(command, Commands::Tui).then(tui::LogBuffer::default);
    match &log_buffer {
        Some(buffer) => tracing_subscriber::registry()
            .with(env_filter(cli.verbose))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(buffer.clone()),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(env_filter(cli.verbose))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    if let Commands::InitConfig = command {
        return commands::init_config();
    }

    let ws = Workspace::load(cli.profile_dir)?;
    match command {
        Commands::Tui => {
            let (store, picker) = ws.bootstrap(None);
            let activity = ActivitySimulator::new(ws.library.clone(), ws.config.simulation.clone());
            let engine = Engine::start(activity, store, picker);
            tui::run(engine, ws.library.clone(), log_buffer.unwrap_or_default()).await?;
        }
        Commands::Conversations => commands::list_conversations(&ws),
        Commands::History { id, limit, seed } => commands::show_history(&ws, &id, limit, seed)?,
        Commands::Simulate { ticks, seed } => commands::simulate(&ws, ticks, seed)?,
        Commands::Embeds { text } => commands::show_embeds(&ws, &text),
        Commands::Profile => commands::show_profile(&ws),
        Commands::InitConfig => {}
    }

    Ok(())
}

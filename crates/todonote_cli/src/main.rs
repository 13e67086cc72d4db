//! `todonote` command-line renderer.
//!
//! # Responsibility
//! - Turn one command line into one intent on a freshly built `AppContext`.
//! - Re-read the store afterwards and print the board.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todonote_core::{render_board, AppConfig, Backend, Dispatch, Intent, NoteId, Priority};

mod bootstrap;

#[derive(Parser)]
#[command(name = "todonote")]
#[command(version)]
#[command(about = "To-do list client for a remote service or a local database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Note backend (remote|local); overrides TODONOTE_BACKEND
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// Remote service address; overrides TODONOTE_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Data directory (database and logs); overrides TODONOTE_HOME
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Log in and save the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show all notes
    List,
    /// Add a note
    Add {
        text: String,
        /// 0 = low, 1 = medium, 2 = high
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
        priority: u8,
        /// Body text (local backend only)
        #[arg(long)]
        details: Option<String>,
    },
    /// Remove a note by id
    Remove { id: String },
    /// Mark a note done, or undone again
    Toggle { id: String },
}

impl Commands {
    fn into_intent(self) -> Result<Option<Intent>> {
        let intent = match self {
            Self::Login { email, password } => Intent::Login { email, password },
            Self::Logout => Intent::Logout,
            Self::List => return Ok(None),
            Self::Add {
                text,
                priority,
                details,
            } => Intent::SubmitNote {
                text,
                priority: Priority::try_from(priority)?,
                details,
            },
            Self::Remove { id } => Intent::RemoveNote {
                id: NoteId::parse(&id),
            },
            Self::Toggle { id } => Intent::ToggleNote {
                id: NoteId::parse(&id),
            },
        };
        Ok(Some(intent))
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("failed to resolve configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(home) = &cli.home {
        config.home_dir = std::path::absolute(home)
            .with_context(|| format!("invalid data directory `{}`", home.display()))?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let app = bootstrap::build_app(&config).await?;

    if let Some(intent) = cli.command.clone().into_intent()? {
        match app.dispatch(intent).await? {
            Dispatch::Applied => {}
            Dispatch::Ignored => eprintln!("Nothing to do: input was empty."),
        }
    }

    if config.backend == Backend::Remote && !app.is_authenticated() {
        println!("Not logged in. Run `todonote login --email <EMAIL> --password <PASSWORD>`.");
        return Ok(());
    }
    print!("{}", render_board(&app.board()));
    Ok(())
}

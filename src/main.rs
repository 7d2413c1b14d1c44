//! Scratchpad - CLI
//!
//! Manage workspace-local markdown notes from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use scratchpad::commands::Scratchpad;
use scratchpad::events::{EventBus, NoteEventKind};
use scratchpad::notes::{tree, Note, PendingOpen, RemoveOutcome, TreeItem};
use scratchpad::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scratchpad")]
#[command(about = "Workspace-local markdown scratchpad notes")]
struct Cli {
    /// Workspace directory (overrides config.yaml and SCRATCHPAD_WORKSPACE)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Path to the YAML config file
    #[arg(short, long, global = true, env = "SCRATCHPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a note and open it
    Add {
        /// Note title (prompted for when omitted)
        title: Option<String>,
    },

    /// List notes
    List {
        /// Print tree items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a note in the editor
    Open {
        /// Note filename, e.g. todo-list.md
        name: String,
    },

    /// Print a note's content
    Show {
        /// Note filename
        name: String,
    },

    /// Delete a note
    Remove {
        /// Note filename
        name: String,
    },

    /// Pick a note from a list and open it
    Search,

    /// Print the listing every time the notes directory changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing (stderr, so stdout stays scriptable)
    let default_filter = if cli.verbose {
        "info,scratchpad=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;
    if let Some(workspace) = cli.workspace {
        config.workspace_path = workspace;
    }
    tracing::debug!(notes = %config.notes_path().display(), "Using notes directory");

    let bus = EventBus::default();
    let mut pad = Scratchpad::local(&config, Arc::new(bus.clone()));

    match cli.command {
        Commands::Add { title } => finish_open(pad.add(title).await?).await,
        Commands::List { json } => run_list(&pad, json).await,
        Commands::Open { name } => finish_open(pad.open(Some(&Note::new(name))).await?).await,
        Commands::Show { name } => {
            println!("{}", pad.store().read(&name).await?);
            Ok(())
        }
        Commands::Remove { name } => {
            if let RemoveOutcome::Failed(_) = pad.remove(Some(&Note::new(name))).await {
                // Already reported to the user
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Search => finish_open(pad.search().await?).await,
        Commands::Watch => run_watch(&mut pad, &bus).await,
    }
}

/// The process exits right after a command, so wait for the editor here
async fn finish_open(pending: Option<PendingOpen>) -> Result<()> {
    match pending {
        Some(pending) => pending.wait().await,
        None => Ok(()),
    }
}

async fn run_list(pad: &Scratchpad, json: bool) -> Result<()> {
    let notes = tree::children(pad.store(), None).await?;
    let items: Vec<TreeItem> = notes.iter().map(TreeItem::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in items {
            println!("{}", item.label);
        }
    }
    Ok(())
}

async fn run_watch(pad: &mut Scratchpad, bus: &EventBus) -> Result<()> {
    let mut rx = bus.subscribe();
    pad.store_mut().watch().await?;
    tracing::info!("Watching for changes, press Ctrl-C to stop");
    print_listing(pad).await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(event) if event.kind == NoteEventKind::DirectoryChanged => {
                    print_listing(pad).await?;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Listener lagged, re-listing");
                    print_listing(pad).await?;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pad.store_mut().dispose();
    Ok(())
}

async fn print_listing(pad: &Scratchpad) -> Result<()> {
    let notes = pad.store().list().await?;
    println!("-- {} note(s) --", notes.len());
    for note in notes {
        println!("{}", note.name);
    }
    Ok(())
}

//! Anamnesis - Context-Following Notes Client
//!
//! Main entry point: runs the context-following session or talks to a
//! running one over its control socket.

use anamnesis_core::{
    error::{AnamnesisError, Result},
    ipc, AnamnesisConfig, BufferSurface, CommandWindowProbe, Context, ContextMonitor,
    ContextSource, HttpNotesStore, NotesStore, NotesSync, Session, SessionEvent,
    WindowContextSource,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "anamnesis", version, about = "Context-following notes client")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true, env = "ANAMNESIS_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the context-following session
    Run {
        /// Override the backend base URL
        #[arg(long)]
        backend_url: Option<String>,

        /// Override the window probe command
        #[arg(long)]
        probe_command: Option<String>,
    },

    /// Fetch and print the notes stored for a context
    Fetch {
        /// Context to fetch notes for
        context: String,
    },

    /// List stored contexts and their note counts
    Contexts {
        /// Only show contexts containing this substring
        filter: Option<String>,
    },

    /// Toggle the context lock of a running session
    Lock,

    /// Re-resolve the current context in a running session
    Refresh,

    /// Replace the notes for the currently displayed context
    Note {
        /// New note content
        content: String,
    },

    /// Delete a single note, or every note of a context
    Delete {
        /// Context to delete from
        context: String,

        /// Backend id of the note to delete; omitted, the whole context is
        /// cleared
        #[arg(long)]
        note_id: Option<i64>,
    },

    /// Show status of a running session
    Status,

    /// Stop a running session
    Stop,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Route logs to stderr so command output stays clean on stdout.
    let filter = EnvFilter::new(format!("anamnesis={}", cli.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Anamnesis v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = AnamnesisConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            backend_url,
            probe_command,
        } => {
            let mut config = config;
            if let Some(url) = backend_url {
                config.backend_base_url = url;
            }
            if let Some(command) = probe_command {
                config.window_probe_command = Some(command);
            }
            run_session(config).await
        }
        Commands::Fetch { context } => fetch_notes(&config, &context).await,
        Commands::Contexts { filter } => list_contexts(&config, filter.as_deref()).await,
        Commands::Lock => acknowledge(&config, &ipc::IpcCommand::ToggleLock).await,
        Commands::Refresh => acknowledge(&config, &ipc::IpcCommand::Refresh).await,
        Commands::Note { content } => {
            acknowledge(&config, &ipc::IpcCommand::Note { content }).await
        }
        Commands::Delete { context, note_id } => delete_notes(&config, &context, note_id).await,
        Commands::Status => show_status(&config).await,
        Commands::Stop => acknowledge(&config, &ipc::IpcCommand::Shutdown).await,
    }
}

/// Wire up the session loop, monitor, and control server, then run until
/// shutdown or Ctrl-C.
async fn run_session(config: AnamnesisConfig) -> Result<()> {
    let probe_command = config.window_probe_command.clone().ok_or_else(|| {
        AnamnesisError::Other(
            "window_probe_command is not configured; set it in the config file or pass --probe-command".to_string(),
        )
    })?;

    let store: Arc<dyn NotesStore> = Arc::new(HttpNotesStore::new(&config.backend_base_url));
    let source: Arc<dyn ContextSource> =
        Arc::new(WindowContextSource::new(CommandWindowProbe::new(probe_command)));

    let (event_tx, event_rx) = mpsc::channel(64);
    let (completion_tx, completion_rx) = mpsc::channel(64);

    let sync = NotesSync::new(
        store,
        Arc::clone(&source),
        BufferSurface::default(),
        config.ignore_list(),
        completion_tx,
    );

    ipc::start_ipc_server(config.socket_path.clone(), event_tx.clone()).await?;
    ContextMonitor::new(source, config.poll_interval()).spawn(event_tx.clone());

    // Load initial notes before the first poll lands.
    event_tx
        .send(SessionEvent::ContextChanged(config.initial_context.clone()))
        .await
        .map_err(|_| AnamnesisError::Other("session loop is gone".to_string()))?;

    let session = Session::new(sync, event_rx, completion_rx);
    tokio::select! {
        _ = session.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; shutting down");
        }
    }

    Ok(())
}

async fn fetch_notes(config: &AnamnesisConfig, context: &str) -> Result<()> {
    let store = HttpNotesStore::new(&config.backend_base_url);
    let notes = store.fetch_notes(&Context::from(context)).await?;

    if notes.is_empty() {
        println!("No notes stored for context: {}", context);
        return Ok(());
    }
    for note in &notes {
        println!("{}", note.content);
    }
    Ok(())
}

async fn list_contexts(config: &AnamnesisConfig, filter: Option<&str>) -> Result<()> {
    let store = HttpNotesStore::new(&config.backend_base_url);
    let mut all = store.list_all().await?;

    if let Some(filter) = filter {
        let filter = filter.to_lowercase();
        all.retain(|entry| entry.context.as_str().to_lowercase().contains(&filter));
    }

    if all.is_empty() {
        println!("No stored contexts");
        return Ok(());
    }
    for entry in &all {
        println!("{} ({} note(s))", entry.context, entry.notes.len());
    }
    Ok(())
}

async fn delete_notes(
    config: &AnamnesisConfig,
    context: &str,
    note_id: Option<i64>,
) -> Result<()> {
    let store = HttpNotesStore::new(&config.backend_base_url);
    let context = Context::from(context);

    match note_id {
        Some(id) => {
            store.delete_note(&context, id).await?;
            println!("Deleted note {} from context: {}", id, context);
        }
        None => {
            // Clearing a context is an update with an empty note list.
            store.save_notes(&context, &[]).await?;
            println!("Cleared all notes for context: {}", context);
        }
    }
    Ok(())
}

async fn acknowledge(config: &AnamnesisConfig, command: &ipc::IpcCommand) -> Result<()> {
    match ipc::send_command(&config.socket_path, command).await? {
        ipc::IpcReply::Ack => Ok(()),
        ipc::IpcReply::Error { message } => Err(AnamnesisError::Ipc(message)),
        ipc::IpcReply::Status(_) => Ok(()),
    }
}

async fn show_status(config: &AnamnesisConfig) -> Result<()> {
    let status = ipc::query_status(&config.socket_path).await?;

    let locked = match &status.locked_context {
        Some(context) => format!("locked on {}", context),
        None => "unlocked".to_string(),
    };
    let active = status
        .active_context
        .as_ref()
        .map(Context::as_str)
        .unwrap_or("none");
    let last_valid = status
        .last_valid_context
        .as_ref()
        .map(Context::as_str)
        .unwrap_or("none");

    println!("Session started: {}", status.started_at.to_rfc3339());
    println!("Lock:            {}", locked);
    println!("Active context:  {}", active);
    println!("Last valid:      {}", last_valid);
    Ok(())
}

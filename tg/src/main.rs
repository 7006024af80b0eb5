//! TravelGPT - conversational travel planner
//!
//! CLI entry point: chat with the planning agent, inspect the stored
//! plan, and export it to Excel.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use schedcore::{EXPORT_FILENAME, ExcelExporter, sample_schedule};
use travelgpt::agent::TravelAgent;
use travelgpt::chat::{self, ChatSession};
use travelgpt::cli::{Cli, Command, View};
use travelgpt::config::Config;
use travelgpt::llm::create_client;
use travelgpt::prompts::PromptLoader;
use travelgpt::render;

use planstore::PlanStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelgpt")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Log level priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            other => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("travelgpt.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("TravelGPT loaded config: model={}", config.llm.model());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Send { query }) => cmd_send(&config, &query).await,
        Some(Command::Show { view }) => cmd_show(&config, view),
        Some(Command::Export { output, sample }) => cmd_export(&config, output.as_deref(), sample),
        Some(Command::Chat) | None => cmd_chat(&config).await,
    }
}

/// Open the store, creating its parent directory on first run.
fn open_store(config: &Config) -> Result<PlanStore> {
    let db_path = &config.store.db_path;
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("Failed to create store directory")?;
    }
    Ok(PlanStore::open(db_path)?)
}

/// Build a full session: store, LLM client, agent.
fn build_session(config: &Config) -> Result<ChatSession> {
    config.validate()?;

    let store = open_store(config)?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(std::env::current_dir()?);

    Ok(ChatSession::new(store, TravelAgent::new(llm, prompts)))
}

/// Run the interactive chat loop
async fn cmd_chat(config: &Config) -> Result<()> {
    debug!("cmd_chat: called");
    let mut session = build_session(config)?;
    chat::run_repl(&mut session).await
}

/// Send one query and print the reply
async fn cmd_send(config: &Config, query: &str) -> Result<()> {
    debug!(query_len = query.len(), "cmd_send: called");
    let mut session = build_session(config)?;

    let reply = session.send(query).await?;
    println!("{}\n", reply.conversation.green());
    println!("{}", render::render_list(&reply.plan, true));
    Ok(())
}

/// Render the latest stored plan
fn cmd_show(config: &Config, view: View) -> Result<()> {
    debug!(?view, "cmd_show: called");
    let store = open_store(config)?;
    let activities = chat::latest_plan_activities(&store)?;

    let rendered = match view {
        View::List => render::render_list(&activities, true),
        View::Calendar => render::render_calendar(&activities, true),
    };
    println!("{rendered}");
    Ok(())
}

/// Export the latest plan (or the built-in sample) to Excel
fn cmd_export(config: &Config, output: Option<&Path>, sample: bool) -> Result<()> {
    debug!(?output, sample, "cmd_export: called");

    let activities = if sample {
        sample_schedule()
    } else {
        let store = open_store(config)?;
        chat::latest_plan_activities(&store)?
    };

    if activities.is_empty() {
        println!("No plan to export yet. Chat first, or use --sample.");
        return Ok(());
    }

    let path = output.unwrap_or(Path::new(EXPORT_FILENAME));
    ExcelExporter::to_file(&activities, path)?;
    println!("Exported {} activities to {}", activities.len(), path.display());
    Ok(())
}

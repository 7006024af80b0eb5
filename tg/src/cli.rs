//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// TravelGPT - conversational travel planner
#[derive(Parser)]
#[command(
    name = "tg",
    about = "Conversational travel planner with calendar and Excel export",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive planning chat (default)
    Chat,

    /// Send a single query and print the agent's reply
    Send {
        /// The travel request
        query: String,
    },

    /// Show the latest plan
    Show {
        /// Which view to render
        #[arg(short, long, value_enum, default_value_t = View::List)]
        view: View,
    },

    /// Export the latest plan to an Excel workbook
    Export {
        /// Output path (defaults to travel_schedule.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export a built-in sample itinerary instead of the stored plan
        #[arg(long)]
        sample: bool,
    },
}

/// Plan rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    List,
    Calendar,
}

//! CLI argument parsing for MathBud.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MathBud study notebook
///
/// Files solved math problems into per-topic notes and a searchable history.
#[derive(Parser, Debug)]
#[command(name = "mathbud")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/mathbud/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// File a solved problem from a recorded model response
    Solve {
        /// Picture of the problem
        image: PathBuf,

        /// File holding the model's raw answer
        #[arg(short, long)]
        response: PathBuf,
    },

    /// List solved problems, newest first
    History {
        /// Only problems whose explanation or steps contain this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only problems of this type ("all" for every type)
        #[arg(short, long)]
        topic: Option<String>,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show one solved problem in full
    Show {
        /// History item id
        id: String,
    },

    /// List topic notes
    Notes {
        /// Only topics whose name or concepts contain this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show the note for one topic
    Note {
        /// Exact topic name
        topic: String,
    },

    /// Rename a topic
    Rename {
        /// Current topic name
        old: String,

        /// New topic name
        new: String,
    },

    /// Show totals across all notes
    Stats,

    /// Tutoring chat transcript
    #[command(subcommand)]
    Chat(ChatCommands),
}

/// Chat subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatCommands {
    /// Print the transcript
    Show,

    /// Ask the tutor a question using a recorded reply
    Ask {
        /// The question
        message: String,

        /// File holding the tutor's recorded reply
        #[arg(short, long)]
        reply: PathBuf,
    },

    /// Forget the transcript
    Clear,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

//! MathBud
//!
//! Files solved math problems into per-topic notes and a searchable history.
//!
//! # Usage
//!
//! ```bash
//! mathbud solve problem.png --response answer.json
//! mathbud notes [--search TERM]
//! mathbud history [--search TERM] [--topic TYPE]
//! mathbud rename OLD NEW
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/mathbud/config.toml)
//! 3. Environment variables (MATHBUD_*)
//! 4. CLI flags

use std::io::{self, Write};

use anyhow::Result;

use mathbud::{
    close_session, handle_chat, handle_history, handle_note, handle_notes, handle_rename,
    handle_show, handle_solve, handle_stats, init_logging, load_settings, open_session, Cli,
    Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.log_level.as_deref(),
        cli.db_path.as_deref(),
    )?;
    init_logging(&settings)?;

    let mut session = open_session(&settings)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Solve { image, response } => {
            handle_solve(&mut session, &image, &response, &mut out)?;
        }
        Commands::History {
            search,
            topic,
            limit,
        } => {
            handle_history(&session, &search, topic.as_deref(), limit, &mut out)?;
        }
        Commands::Show { id } => {
            handle_show(&session, &id, &mut out)?;
        }
        Commands::Notes { search } => {
            handle_notes(&session, &search, &mut out)?;
        }
        Commands::Note { topic } => {
            handle_note(&session, &topic, &mut out)?;
        }
        Commands::Rename { old, new } => {
            handle_rename(&mut session, &old, &new, &mut out)?;
        }
        Commands::Stats => {
            handle_stats(&session, &mut out)?;
        }
        Commands::Chat(command) => {
            handle_chat(&mut session, command, &mut out)?;
        }
    }

    out.flush()?;
    close_session(session)
}

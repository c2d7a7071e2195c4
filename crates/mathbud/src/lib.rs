//! MathBud CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations
//! - `relay`: Seams to the external solve and chat relays
//! - `session`: The state-owning study session

pub mod cli;
pub mod commands;
pub mod relay;
pub mod session;

pub use cli::{ChatCommands, Cli, Commands};
pub use commands::{
    close_session, handle_chat, handle_history, handle_note, handle_notes, handle_rename,
    handle_show, handle_solve, handle_stats, init_logging, load_settings, open_session,
};
pub use relay::{ChatRelay, ProblemImage, RelayError, ReplayRelay, SolveRelay};
pub use session::{SolveOutcome, StudySession};

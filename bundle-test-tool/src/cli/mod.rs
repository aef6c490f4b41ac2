//! CLI command definitions and handlers
//!
//! - [`commands`] - Subcommand and option definitions
//! - [`handlers`] - Command execution handlers
//! - [`messages`] - Fixed texts printed by the subcommands

mod commands;
mod handlers;
pub(crate) mod messages;

pub use commands::*;
pub use handlers::*;

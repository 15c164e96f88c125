//! Subcommand implementations.

pub mod config;
pub mod index;
pub mod links;
pub mod move_note;
pub mod open;
pub mod rank;
pub mod resolve;
pub mod search;
pub mod status;
pub mod targets;
pub mod watch;

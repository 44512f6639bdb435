//! Qibla CLI library.
//!
//! Argument parsing, configuration and the subcommands behind the `qibla`
//! binary.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LocationArgs, TimetableArgs, WhenArgs};
pub use config::{Config, TimesConfig};

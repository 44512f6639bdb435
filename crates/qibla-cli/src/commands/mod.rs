//! CLI subcommand implementations.

pub mod align;
pub mod direction;
pub mod next;
pub mod schedule;
pub mod util;
pub mod venues;

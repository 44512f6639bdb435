//! Next command: the upcoming event after a reference time.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use qibla_core::NextEvent;

use super::util;
use crate::Config;
use crate::cli::{LocationArgs, TimetableArgs, WhenArgs};

/// Arguments for the `next` subcommand.
#[derive(Debug, Clone, Args)]
pub struct NextArgs {
    #[command(flatten)]
    pub timetable: TimetableArgs,

    #[command(flatten)]
    pub location: LocationArgs,

    #[command(flatten)]
    pub when: WhenArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &NextArgs, config: &Config) -> Result<()> {
    let observer = util::resolve_observer(&args.location, config)?;
    let moment = util::resolve_moment(&args.when, &config.season);
    let table = util::load_timetable(&args.timetable, observer.as_ref(), moment.date, config)?;

    let next = table
        .next_event(moment.time, &config.event_order)
        .context("failed to resolve the next event")?;
    tracing::debug!(now = %moment.time, next = %next.name, "resolved next event");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&next)?)?;
    } else {
        writeln!(writer, "{}", format_next(&next))?;
    }
    Ok(())
}

/// One-line summary such as `Next: asr at 15:40 (in 3h 25m)`.
pub fn format_next(next: &NextEvent) -> String {
    let day = if next.is_tomorrow { " tomorrow" } else { "" };
    format!(
        "Next: {} at {}{day} (in {})",
        next.name,
        next.time,
        util::format_minutes(next.minutes_until)
    )
}

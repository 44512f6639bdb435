//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qibla_core::{ClockTime, EventName, SecondaryTimeRule};

use crate::commands::align::AlignArgs;
use crate::commands::next::NextArgs;
use crate::commands::schedule::ScheduleArgs;

/// Qibla direction and prayer schedule.
///
/// Computes the direction to the Kaaba, resolves the next prayer with iqama
/// times, and tracks compass alignment from a stream of headings.
#[derive(Debug, Parser)]
#[command(name = "qibla", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the direction and distance to the Kaaba.
    Direction {
        #[command(flatten)]
        location: LocationArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the next event after a given time.
    Next(NextArgs),

    /// Show a day's schedule with iqama times.
    Schedule(ScheduleArgs),

    /// Read compass headings from stdin and report alignment per sample.
    Align(AlignArgs),

    /// List configured venues.
    Venues {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Where the observer is.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Observer latitude in degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Observer longitude in degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Use a configured venue's location (and rules, where relevant).
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub venue: Option<String>,
}

/// Where the day's adhan times come from.
#[derive(Debug, Clone, Default, Args)]
pub struct TimetableArgs {
    /// Adhan times as name=HH:MM pairs (e.g., fajr=05:00,dhuhr=12:15).
    #[arg(long, value_delimiter = ',', value_parser = parse_event_time)]
    pub times: Vec<(EventName, ClockTime)>,

    /// JSON file mapping event names to HH:MM.
    #[arg(long, conflicts_with = "times")]
    pub timetable: Option<PathBuf>,

    /// Fetch times from the timings service for the observer's location.
    #[arg(long, conflicts_with_all = ["times", "timetable"])]
    pub fetch: bool,
}

/// The reference moment and season.
#[derive(Debug, Clone, Default, Args)]
pub struct WhenArgs {
    /// Reference time (HH:MM). Defaults to the local clock.
    #[arg(long)]
    pub at: Option<ClockTime>,

    /// Calendar date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,

    /// Force summer rules regardless of date.
    #[arg(long, conflicts_with = "winter")]
    pub summer: bool,

    /// Force winter rules regardless of date.
    #[arg(long)]
    pub winter: bool,
}

/// Parses `name=HH:MM`.
pub fn parse_event_time(s: &str) -> Result<(EventName, ClockTime), String> {
    let (name, time) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=HH:MM, got `{s}`"))?;
    let name = EventName::new(name).map_err(|e| e.to_string())?;
    let time = time.parse().map_err(|e: qibla_core::EngineError| e.to_string())?;
    Ok((name, time))
}

/// Parses `name=RULE` where RULE is `HH:MM`, `+N`, `-N` or `SUMMER/WINTER`.
pub fn parse_event_rule(s: &str) -> Result<(EventName, SecondaryTimeRule), String> {
    let (name, rule) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=RULE, got `{s}`"))?;
    let name = EventName::new(name).map_err(|e| e.to_string())?;
    let rule = rule.parse().map_err(|e: qibla_core::EngineError| e.to_string())?;
    Ok((name, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_event_time_accepts_pairs() {
        let (name, time) = parse_event_time("Fajr=05:00").unwrap();
        assert_eq!(name.as_str(), "fajr");
        assert_eq!(time.to_string(), "05:00");
        assert!(parse_event_time("fajr").is_err());
        assert!(parse_event_time("fajr=25:00").is_err());
        assert!(parse_event_time("=05:00").is_err());
    }

    #[test]
    fn test_parse_event_rule_accepts_compact_rules() {
        let (name, rule) = parse_event_rule("jumuah=13:40/12:40").unwrap();
        assert_eq!(name.as_str(), "jumuah");
        assert_eq!(rule.to_string(), "13:40/12:40");
        assert!(parse_event_rule("fajr=soon").is_err());
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = Cli::try_parse_from([
            "qibla",
            "direction",
            "--lat",
            "-36.85",
            "--lon",
            "174.76",
        ])
        .unwrap();
        let Some(Commands::Direction { location, .. }) = cli.command else {
            panic!("expected direction command");
        };
        assert!((location.lat.unwrap() + 36.85).abs() < 1e-9);
    }

    #[test]
    fn test_venue_conflicts_with_coordinates() {
        let result = Cli::try_parse_from([
            "qibla", "direction", "--venue", "Hall", "--lat", "1", "--lon", "2",
        ]);
        assert!(result.is_err());
    }
}

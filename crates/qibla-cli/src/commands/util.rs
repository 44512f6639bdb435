//! Helpers shared by the subcommands: resolving the observer, the moment and
//! the day's timetable from arguments and config.

use std::fs;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use qibla_core::{ClockTime, Coordinate, EventTimeTable, SeasonPolicy, Venue, find_venue};

use crate::cli::{LocationArgs, TimetableArgs, WhenArgs};
use crate::Config;

/// Where the command is being run for.
#[derive(Debug, Clone, Copy)]
pub struct Observer<'a> {
    pub location: Coordinate,
    /// Set when the location came from `--venue`.
    pub venue: Option<&'a Venue>,
}

/// Reference date, time of day and season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub is_summer: bool,
}

pub fn resolve_venue<'a>(config: &'a Config, name: &str) -> Result<&'a Venue> {
    find_venue(&config.venues, name)
        .with_context(|| format!("unknown venue `{name}` (see `qibla venues`)"))
}

/// Resolves `--venue` or `--lat/--lon`. Returns `None` when neither is given.
pub fn resolve_observer<'a>(
    args: &LocationArgs,
    config: &'a Config,
) -> Result<Option<Observer<'a>>> {
    if let Some(name) = &args.venue {
        let venue = resolve_venue(config, name)?;
        return Ok(Some(Observer {
            location: venue.location,
            venue: Some(venue),
        }));
    }

    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let location = Coordinate::new(lat, lon).context("invalid --lat/--lon")?;
            Ok(Some(Observer {
                location,
                venue: None,
            }))
        }
        _ => Ok(None),
    }
}

pub fn require_observer<'a>(args: &LocationArgs, config: &'a Config) -> Result<Observer<'a>> {
    resolve_observer(args, config)?
        .context("a location is required: pass --venue or --lat and --lon")
}

/// Fills in the local date and clock for anything not given explicitly.
pub fn resolve_moment(args: &WhenArgs, policy: &SeasonPolicy) -> Moment {
    let now = Local::now().naive_local();
    let date = args.date.unwrap_or_else(|| now.date());
    let time = args.at.unwrap_or_else(|| ClockTime::from(now.time()));

    Moment {
        date,
        time,
        is_summer: resolve_season(policy, date, args.summer, args.winter),
    }
}

/// `--summer` and `--winter` override the configured season policy.
pub fn resolve_season(
    policy: &SeasonPolicy,
    date: NaiveDate,
    force_summer: bool,
    force_winter: bool,
) -> bool {
    if force_summer {
        true
    } else if force_winter {
        false
    } else {
        policy.is_summer(date)
    }
}

/// Loads the day's adhan times from `--times`, `--timetable` or `--fetch`.
pub fn load_timetable(
    args: &TimetableArgs,
    observer: Option<&Observer<'_>>,
    date: NaiveDate,
    config: &Config,
) -> Result<EventTimeTable> {
    if args.fetch {
        let observer =
            observer.context("--fetch needs a location: pass --venue or --lat and --lon")?;
        return fetch_timetable(config, observer.location, date);
    }

    if let Some(path) = &args.timetable {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("invalid timetable in {}", path.display()));
    }

    if args.times.is_empty() {
        bail!("no adhan times given: pass --times, --timetable or --fetch");
    }
    EventTimeTable::from_entries(args.times.iter().cloned()).context("invalid --times")
}

fn fetch_timetable(config: &Config, location: Coordinate, date: NaiveDate) -> Result<EventTimeTable> {
    let client = qibla_times::Client::new(config.times.base_url.clone())
        .context("failed to create timings client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime
        .block_on(client.fetch_day(date, location, config.times.method))
        .context("failed to fetch prayer timings")
}

/// Formats a minute count as `3h 25m`, or `25m` under an hour.
pub fn format_minutes(total_minutes: i64) -> String {
    if total_minutes < 0 {
        return "0m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

//! Schedule command: a day's adhan and iqama times.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use qibla_core::{DaySchedule, EventName, RuleSet, SecondaryTimeRule};

use super::next::format_next;
use super::util::{self, Observer};
use crate::Config;
use crate::cli::{LocationArgs, TimetableArgs, WhenArgs, parse_event_rule};

/// Arguments for the `schedule` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub timetable: TimetableArgs,

    #[command(flatten)]
    pub location: LocationArgs,

    #[command(flatten)]
    pub when: WhenArgs,

    /// Iqama rules as name=RULE (e.g., fajr=+20,dhuhr=13:30,asr=16:30/15:30).
    /// Overrides the venue's rule for the same event.
    #[arg(long, value_delimiter = ',', value_parser = parse_event_rule)]
    pub iqama: Vec<(EventName, SecondaryTimeRule)>,

    /// Jumuah rule (HH:MM, +N, -N or SUMMER/WINTER), anchored on dhuhr.
    #[arg(long)]
    pub jumuah: Option<SecondaryTimeRule>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ScheduleArgs, config: &Config) -> Result<()> {
    let observer = util::resolve_observer(&args.location, config)?;
    let moment = util::resolve_moment(&args.when, &config.season);
    let table = util::load_timetable(&args.timetable, observer.as_ref(), moment.date, config)?;
    let rules = effective_rules(args, observer.as_ref());

    let schedule = DaySchedule::build(
        &table,
        &rules,
        &config.event_order,
        moment.time,
        moment.is_summer,
    )
    .context("failed to build schedule")?;
    tracing::debug!(
        entries = schedule.entries.len(),
        is_summer = schedule.is_summer,
        "built day schedule"
    );

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&schedule)?)?;
    } else {
        let title = title(observer.as_ref(), moment.date, schedule.is_summer);
        write!(writer, "{}", format_schedule(&title, &schedule))?;
    }
    Ok(())
}

/// Venue rules with command-line rules layered on top.
fn effective_rules(args: &ScheduleArgs, observer: Option<&Observer<'_>>) -> RuleSet {
    let base = observer
        .and_then(|observer| observer.venue)
        .map(|venue| venue.rules.clone())
        .unwrap_or_default();

    let rules = args
        .iqama
        .iter()
        .fold(base, |rules, (name, rule)| rules.with_rule(name.clone(), *rule));

    match args.jumuah {
        Some(rule) => rules.with_jumuah(rule),
        None => rules,
    }
}

fn title(observer: Option<&Observer<'_>>, date: NaiveDate, is_summer: bool) -> String {
    let place = match observer {
        Some(Observer {
            venue: Some(venue), ..
        }) => venue.name.clone(),
        Some(observer) => observer.location.to_string(),
        None => "Schedule".to_string(),
    };
    let season = if is_summer { "summer" } else { "winter" };
    format!("{place} on {date} ({season})")
}

pub fn format_schedule(title: &str, schedule: &DaySchedule) -> String {
    let mut output = String::new();
    writeln!(output, "{title}").unwrap();

    for entry in &schedule.entries {
        write!(output, "  {:<8} {}", entry.name.as_str(), entry.adhan).unwrap();
        if let Some(iqama) = entry.iqama {
            write!(output, "  iqama {iqama}").unwrap();
        }
        writeln!(output).unwrap();
    }

    if let Some(jumuah) = schedule.jumuah {
        writeln!(output, "Jumuah: {jumuah}").unwrap();
    }
    writeln!(output, "{}", format_next(&schedule.next)).unwrap();
    output
}

//! Venues command: list configured venues with their qibla direction.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use qibla_core::{DirectionReport, RuleSet, Venue};
use serde::Serialize;

use crate::Config;

#[derive(Debug, Serialize)]
struct VenueSummary<'a> {
    name: &'a str,
    direction: DirectionReport,
    rules: &'a RuleSet,
}

pub fn run<W: Write>(writer: &mut W, json: bool, config: &Config) -> Result<()> {
    if json {
        let summaries: Vec<VenueSummary<'_>> = config
            .venues
            .iter()
            .map(|venue| VenueSummary {
                name: &venue.name,
                direction: venue.direction(),
                rules: &venue.rules,
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&summaries)?)?;
        return Ok(());
    }

    write!(writer, "{}", format_venues(&config.venues))?;
    Ok(())
}

pub fn format_venues(venues: &[Venue]) -> String {
    let mut output = String::new();
    if venues.is_empty() {
        writeln!(output, "No venues configured.").unwrap();
        writeln!(output, "Hint: add [[venues]] entries to config.toml").unwrap();
        return output;
    }

    writeln!(output, "Venues:").unwrap();
    for venue in venues {
        let direction = venue.direction();
        write!(
            output,
            "- {} ({}): qibla {} {}, {:.0} km",
            venue.name, venue.location, direction.bearing, direction.cardinal, direction.distance_km
        )
        .unwrap();
        if venue.rules.jumuah().is_some() {
            write!(output, ", jumuah").unwrap();
        }
        writeln!(output).unwrap();
    }
    output
}

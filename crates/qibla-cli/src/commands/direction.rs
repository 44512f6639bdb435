//! Direction command: bearing and distance to the Kaaba.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use qibla_core::DirectionReport;

use super::util;
use crate::Config;
use crate::cli::LocationArgs;

pub fn run<W: Write>(
    writer: &mut W,
    location: &LocationArgs,
    json: bool,
    config: &Config,
) -> Result<()> {
    let observer = util::require_observer(location, config)?;
    let report = DirectionReport::for_observer(observer.location);
    tracing::debug!(
        bearing = report.bearing.degrees(),
        distance_km = report.distance_km,
        "computed qibla direction"
    );

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let venue = observer.venue.map(|venue| venue.name.as_str());
        write!(writer, "{}", format_direction(&report, venue))?;
    }
    Ok(())
}

pub fn format_direction(report: &DirectionReport, venue: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(name) = venue {
        writeln!(output, "Venue:     {name}").unwrap();
    }
    writeln!(output, "Observer:  {}", report.observer).unwrap();
    writeln!(output, "Qibla:     {} ({})", report.bearing, report.cardinal).unwrap();
    writeln!(output, "Distance:  {:.0} km", report.distance_km).unwrap();
    output
}

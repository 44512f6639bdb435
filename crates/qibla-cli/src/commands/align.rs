//! Align command: compass alignment for a stream of heading samples.
//!
//! Headings are read one per line. Each valid sample produces one JSON line
//! on the output; rejected lines are reported on the error stream and do not
//! stop the run.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use qibla_core::alignment::{self, AlignmentState};
use qibla_core::{Bearing, Coordinate, EngineError, geo};
use serde::Serialize;

use super::util;
use crate::Config;
use crate::cli::LocationArgs;

/// Arguments for the `align` subcommand.
#[derive(Debug, Clone, Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Target bearing in degrees, instead of the qibla from a location.
    #[arg(long, conflicts_with_all = ["lat", "lon", "venue"])]
    pub target: Option<f64>,

    /// Half-width of the aligned window in degrees. Defaults to the config value.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Read all samples first and evaluate them in parallel.
    #[arg(long)]
    pub batch: bool,
}

#[derive(Debug, Serialize)]
struct AlignmentLine {
    #[serde(flatten)]
    state: AlignmentState,
    needle_rotation: Bearing,
}

impl From<AlignmentState> for AlignmentLine {
    fn from(state: AlignmentState) -> Self {
        Self {
            state,
            needle_rotation: state.needle_rotation(),
        }
    }
}

/// Counts reported once input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignSummary {
    pub samples: usize,
    pub rejected: usize,
}

pub fn run<R: BufRead, W: Write, E: Write>(
    input: R,
    writer: &mut W,
    errors: &mut E,
    args: &AlignArgs,
    config: &Config,
) -> Result<AlignSummary> {
    let target = resolve_target(args, config)?;
    let tolerance = alignment::check_tolerance(args.tolerance.unwrap_or(config.tolerance_degrees))
        .context("invalid --tolerance")?;
    tracing::debug!(target = target.degrees(), tolerance, batch = args.batch, "starting alignment");

    let mut summary = AlignSummary::default();
    if args.batch {
        let mut samples = Vec::new();
        for (line_no, line) in numbered_lines(input) {
            let line = line.context("failed to read input")?;
            match parse_sample(&line) {
                Some(Ok(heading)) => samples.push((line_no, heading)),
                Some(Err(message)) => report(errors, &mut summary, line_no, &message)?,
                None => {}
            }
        }

        let headings: Vec<f64> = samples.iter().map(|&(_, heading)| heading).collect();
        let states = alignment::track(target, &headings, tolerance);
        for ((line_no, _), state) in samples.into_iter().zip(states) {
            emit(writer, errors, &mut summary, line_no, state)?;
        }
    } else {
        for (line_no, line) in numbered_lines(input) {
            let line = line.context("failed to read input")?;
            match parse_sample(&line) {
                Some(Ok(heading)) => {
                    let state = alignment::update(target, heading, tolerance);
                    emit(writer, errors, &mut summary, line_no, state)?;
                    writer.flush()?;
                }
                Some(Err(message)) => report(errors, &mut summary, line_no, &message)?,
                None => {}
            }
        }
    }

    tracing::debug!(
        samples = summary.samples,
        rejected = summary.rejected,
        "alignment input exhausted"
    );
    Ok(summary)
}

fn resolve_target(args: &AlignArgs, config: &Config) -> Result<Bearing> {
    if let Some(target) = args.target {
        return Bearing::new(target).context("invalid --target");
    }
    match util::resolve_observer(&args.location, config)? {
        Some(observer) => Ok(geo::bearing(observer.location, Coordinate::KAABA)),
        None => bail!("pass --target, --venue or --lat and --lon"),
    }
}

fn numbered_lines<R: BufRead>(input: R) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    input.lines().enumerate().map(|(index, line)| (index + 1, line))
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
fn parse_sample(line: &str) -> Option<Result<f64, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(
        line.parse::<f64>()
            .map_err(|_| format!("`{line}` is not a heading")),
    )
}

fn emit<W: Write, E: Write>(
    writer: &mut W,
    errors: &mut E,
    summary: &mut AlignSummary,
    line_no: usize,
    state: Result<AlignmentState, EngineError>,
) -> Result<()> {
    match state {
        Ok(state) => {
            summary.samples += 1;
            let line = AlignmentLine::from(state);
            writeln!(writer, "{}", serde_json::to_string(&line)?)?;
            Ok(())
        }
        Err(err) => report(errors, summary, line_no, &err.to_string()),
    }
}

fn report<E: Write>(
    errors: &mut E,
    summary: &mut AlignSummary,
    line_no: usize,
    message: &str,
) -> Result<()> {
    summary.rejected += 1;
    writeln!(errors, "line {line_no}: {message}")?;
    Ok(())
}

//! Parser for the markdown-like experiment file format
//!
//! ```text
//! <Experiment name>
//! =================
//!
//! <free-form description paragraph>
//!
//! Network Parameters
//! ------------------
//! - <param>: <float>  [optional trailing comment]
//!
//! Units
//! -----
//! - <unit_name>
//!
//! Activations
//! -----------
//! - <unit_name>
//!     - [<start_ms>, <stop_ms>] at <level>
//!
//! Plots
//! -----
//! - <unit_name>
//!     - [<start_ms>, <stop_ms>]
//! ```
//!
//! `at <level>` is optional and defaults to 1.0. A `[start, stop]` item
//! under `Activations` schedules `activate_unit(name, level, stop - start)`
//! at `start` milliseconds from experiment start.

use memnet_core::Time;

use crate::error::{CliError, CliResult};
use crate::experiment::{Experiment, PlotWindow, ScheduledActivation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Parameters,
    Units,
    Activations,
    Plots,
}

/// Whether a line is a ruler made of `ch` characters
fn is_ruler(line: &str, ch: char) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == ch)
}

/// Detect a section header: a known title followed by a dashed ruler
fn section_at(lines: &[&str], i: usize) -> Option<Section> {
    let section = match lines[i].trim() {
        "Network Parameters" => Section::Parameters,
        "Units" => Section::Units,
        "Activations" => Section::Activations,
        "Plots" => Section::Plots,
        _ => return None,
    };
    if i + 1 < lines.len() && is_ruler(lines[i + 1], '-') {
        Some(section)
    } else {
        None
    }
}

/// Strip a `- ` list marker, returning the item text
fn list_item(line: &str) -> Option<&str> {
    line.trim().strip_prefix("- ").map(str::trim)
}

/// Parse a `[start, stop]` period with an optional trailing `at <level>`
fn parse_period(item: &str, line_no: usize) -> CliResult<(Time, Time, f64)> {
    let rest = item
        .strip_prefix('[')
        .ok_or_else(|| CliError::parse(line_no, "expected a [start, stop] interval"))?;
    let (inside, after) = rest
        .split_once(']')
        .ok_or_else(|| CliError::parse(line_no, "unterminated [start, stop] interval"))?;
    let (start, stop) = inside
        .split_once(',')
        .ok_or_else(|| CliError::parse(line_no, "expected two comma-separated times"))?;

    let start: u64 = start
        .trim()
        .parse()
        .map_err(|_| CliError::parse(line_no, format!("invalid start time {:?}", start.trim())))?;
    let stop: u64 = stop
        .trim()
        .parse()
        .map_err(|_| CliError::parse(line_no, format!("invalid stop time {:?}", stop.trim())))?;
    if stop < start {
        return Err(CliError::parse(line_no, "interval ends before it starts"));
    }

    let after = after.trim();
    let level = if after.is_empty() {
        1.0
    } else {
        let value = after
            .strip_prefix("at ")
            .ok_or_else(|| CliError::parse(line_no, format!("unexpected trailing {:?}", after)))?;
        value
            .trim()
            .parse()
            .map_err(|_| CliError::parse(line_no, format!("invalid level {:?}", value.trim())))?
    };

    Ok((Time::from_millis(start), Time::from_millis(stop), level))
}

/// Parse an experiment description
pub fn parse(input: &str) -> CliResult<Experiment> {
    let lines: Vec<&str> = input.lines().collect();
    let mut experiment = Experiment::default();

    // title and double ruler
    let mut i = 0;
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    if i >= lines.len() {
        return Err(CliError::parse(1, "empty experiment description"));
    }
    experiment.name = lines[i].trim().to_string();
    i += 1;
    if i >= lines.len() || !is_ruler(lines[i], '=') {
        return Err(CliError::parse(
            i + 1,
            "expected a ruler of '=' under the experiment name",
        ));
    }
    i += 1;

    let mut section: Option<Section> = None;
    let mut description = Vec::new();
    let mut current_unit: Option<String> = None;

    while i < lines.len() {
        if let Some(s) = section_at(&lines, i) {
            section = Some(s);
            current_unit = None;
            i += 2;
            continue;
        }

        let line_no = i + 1;
        let line = lines[i].trim();
        i += 1;
        if line.is_empty() {
            continue;
        }

        match section {
            None => description.push(line),
            Some(Section::Parameters) => {
                let item = list_item(line)
                    .ok_or_else(|| CliError::parse(line_no, "expected '- <param>: <value>'"))?;
                let (name, rest) = item.split_once(':').ok_or_else(|| {
                    CliError::parse(line_no, "expected ':' between parameter name and value")
                })?;
                let value_text = rest.trim().split_whitespace().next().ok_or_else(|| {
                    CliError::parse(line_no, format!("missing value for parameter {:?}", name))
                })?;
                let value: f64 = value_text.parse().map_err(|_| {
                    CliError::parse(line_no, format!("invalid value {:?}", value_text))
                })?;
                experiment.parameters.push((name.trim().to_string(), value));
            }
            Some(Section::Units) => {
                let item = list_item(line)
                    .ok_or_else(|| CliError::parse(line_no, "expected '- <unit_name>'"))?;
                let name = item.trim_end_matches(':').trim();
                if !experiment.units.iter().any(|u| u == name) {
                    experiment.units.push(name.to_string());
                }
            }
            Some(Section::Activations) => {
                let item = list_item(line)
                    .ok_or_else(|| CliError::parse(line_no, "expected a list item"))?;
                if item.starts_with('[') {
                    let unit = current_unit.clone().ok_or_else(|| {
                        CliError::parse(line_no, "activation interval outside a unit block")
                    })?;
                    let (start, stop, level) = parse_period(item, line_no)?;
                    experiment.activations.push(ScheduledActivation {
                        unit,
                        start,
                        duration: stop - start,
                        level,
                    });
                } else {
                    current_unit = Some(item.trim_end_matches(':').trim().to_string());
                }
            }
            Some(Section::Plots) => {
                let item = list_item(line)
                    .ok_or_else(|| CliError::parse(line_no, "expected a list item"))?;
                if item.starts_with('[') {
                    let unit = current_unit.clone().ok_or_else(|| {
                        CliError::parse(line_no, "plot interval outside a unit block")
                    })?;
                    let (start, stop, _) = parse_period(item, line_no)?;
                    experiment.plots.push(PlotWindow { unit, start, stop });
                } else {
                    current_unit = Some(item.trim_end_matches(':').trim().to_string());
                }
            }
        }
    }

    experiment.description = description.join("\n");
    Ok(experiment)
}

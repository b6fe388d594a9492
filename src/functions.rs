//! Roll line-level metrics up to function-level summaries using the
//! declared function ranges.

use crate::error::{ProfileError, Result};
use crate::model::{FileProfile, FunctionRange, Profile};
use serde::Serialize;

/// Aggregated metrics for one declared function range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    /// Sum of interpreted, native, and system CPU over the range.
    pub cpu_percent_total: f64,
    /// Sum of interpreted and native allocation over the range.
    pub memory_mb_total: f64,
    /// Number of sampled lines folded into the sums.
    pub line_count: usize,
}

fn summarize(file: &FileProfile, range: &FunctionRange) -> FunctionSummary {
    let mut cpu_percent_total = 0.0;
    let mut memory_mb_total = 0.0;
    let mut line_count = 0;

    for line in &file.lines {
        if line.line_number >= range.start_line && line.line_number <= range.end_line {
            cpu_percent_total += line.cpu_percent_total();
            memory_mb_total += line.memory_total_mb();
            line_count += 1;
        }
    }

    FunctionSummary {
        name: range.name.clone(),
        file: file.path.clone(),
        start_line: range.start_line,
        end_line: range.end_line,
        cpu_percent_total,
        memory_mb_total,
        line_count,
    }
}

/// Smallest-span range with the given name, ties to the first declared.
fn best_range<'a>(file: &'a FileProfile, name: &str) -> Option<&'a FunctionRange> {
    file.function_ranges
        .iter()
        .filter(|r| r.name == name)
        .min_by_key(|r| r.end_line - r.start_line)
}

/// Summarize one function by name.
///
/// When `file` is given, only that file is searched. Otherwise the first
/// file in ascending path order containing a matching range wins; this is
/// deterministic but caller-visible ambiguity when the same name is declared
/// in several files; pass `file` to disambiguate. Within a file, nested
/// same-named ranges resolve to the smallest enclosing span.
///
/// Returns [`ProfileError::FunctionNotFound`] when no range matches anywhere,
/// so callers can distinguish "function absent" from "function present but
/// inactive" (the latter yields an all-zero summary).
pub fn get_function_summary(
    profile: &Profile,
    function_name: &str,
    file: Option<&str>,
) -> Result<FunctionSummary> {
    let matched = match file {
        Some(path) => profile
            .files
            .get(path)
            .and_then(|f| best_range(f, function_name).map(|r| (f, r))),
        None => profile
            .files
            .values()
            .find_map(|f| best_range(f, function_name).map(|r| (f, r))),
    };

    match matched {
        Some((file, range)) => Ok(summarize(file, range)),
        None => Err(ProfileError::FunctionNotFound(function_name.to_string())),
    }
}

/// Summaries for every declared function range: files in ascending path
/// order, ranges in declaration order. Zero-activity functions are included
/// with all-zero aggregates.
pub fn get_all_function_summaries(profile: &Profile) -> Vec<FunctionSummary> {
    profile
        .files
        .values()
        .flat_map(|file| file.function_ranges.iter().map(|r| summarize(file, r)))
        .collect()
}

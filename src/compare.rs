//! Before/after comparison of two profiles.
//!
//! Lines are matched by `(file, line)`; each tracked metric gets a delta and
//! a percent-change, and the line is classified as regression, improvement,
//! unchanged, added, or removed. Neither input profile is mutated.

use crate::model::{LineMetrics, MetricKind, Profile};
use serde::Serialize;
use std::collections::BTreeSet;

/// Default regression/improvement tolerance, in percent.
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 10.0;

/// Percent-change of a metric between two runs.
///
/// Growth from a zero baseline has no finite percentage; it is carried as
/// the [`FromZero`](PercentChange::FromZero) sentinel rather than a numeric
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentChange {
    Finite(f64),
    FromZero,
}

impl PercentChange {
    /// The finite percentage, if there is one.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            PercentChange::Finite(pc) => Some(pc),
            PercentChange::FromZero => None,
        }
    }
}

/// Classification of one matched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Regression,
    Improvement,
    Unchanged,
    Added,
    Removed,
}

/// Before/after values for one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub before: f64,
    pub after: f64,
    pub delta: f64,
    pub percent_change: PercentChange,
}

impl Delta {
    fn new(before: f64, after: f64) -> Self {
        let percent_change = if before != 0.0 {
            PercentChange::Finite((after - before) / before * 100.0)
        } else if after != 0.0 {
            PercentChange::FromZero
        } else {
            PercentChange::Finite(0.0)
        };
        Delta {
            before,
            after,
            delta: after - before,
            percent_change,
        }
    }

    /// Did this quantity rise beyond the tolerance?
    fn regressed(&self, tolerance_percent: f64) -> bool {
        match self.percent_change {
            PercentChange::Finite(pc) => pc > tolerance_percent,
            // Fresh appearance from zero is a regression when it grew.
            PercentChange::FromZero => self.delta > 0.0,
        }
    }

    /// Did this quantity fall beyond the tolerance?
    fn improved(&self, tolerance_percent: f64) -> bool {
        match self.percent_change {
            PercentChange::Finite(pc) => pc < -tolerance_percent,
            PercentChange::FromZero => self.delta < 0.0,
        }
    }
}

/// One tracked metric's delta on a matched line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta {
    pub metric: MetricKind,
    #[serde(flatten)]
    pub delta: Delta,
}

/// Comparison of one `(file, line)` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineComparison {
    pub file: String,
    pub line: u32,
    pub status: LineStatus,
    pub metrics: Vec<MetricDelta>,
}

/// Run-level deltas between the two profile summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryComparison {
    pub elapsed_time_sec: Delta,
    pub peak_memory_mb: Delta,
    pub average_memory_mb: Delta,
    pub memory_growth_rate_mb_per_sec: Delta,
}

/// Full result of comparing two profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub before_id: String,
    pub after_id: String,
    pub tolerance_percent: f64,
    /// Every `(file, line)` present in either profile, ascending.
    pub lines: Vec<LineComparison>,
    pub summary: SummaryComparison,
}

fn metric_deltas(before: Option<&LineMetrics>, after: Option<&LineMetrics>) -> Vec<MetricDelta> {
    MetricKind::ALL
        .iter()
        .map(|&metric| {
            let b = before.map_or(0.0, |l| l.metric_value(metric));
            let a = after.map_or(0.0, |l| l.metric_value(metric));
            MetricDelta {
                metric,
                delta: Delta::new(b, a),
            }
        })
        .collect()
}

fn classify(metrics: &[MetricDelta], tolerance_percent: f64) -> LineStatus {
    let regressed = metrics
        .iter()
        .any(|m| m.delta.regressed(tolerance_percent));
    if regressed {
        return LineStatus::Regression;
    }
    let improved = metrics.iter().any(|m| m.delta.improved(tolerance_percent));
    if improved {
        LineStatus::Improvement
    } else {
        LineStatus::Unchanged
    }
}

/// Compare two profiles line by line.
///
/// A line is a regression when any tracked metric rose beyond
/// `tolerance_percent`, an improvement when any fell beyond it and none
/// regressed, otherwise unchanged. Lines present in only one profile are
/// added/removed. Output order is ascending `(file, line)`.
pub fn compare(before: &Profile, after: &Profile, tolerance_percent: f64) -> ComparisonResult {
    let mut keys: BTreeSet<(&str, u32)> = BTreeSet::new();
    for (path, line) in before.lines() {
        keys.insert((path, line.line_number));
    }
    for (path, line) in after.lines() {
        keys.insert((path, line.line_number));
    }

    let lines = keys
        .into_iter()
        .map(|(path, lineno)| {
            let b = before.files.get(path).and_then(|f| f.line(lineno));
            let a = after.files.get(path).and_then(|f| f.line(lineno));
            let metrics = metric_deltas(b, a);
            let status = match (b, a) {
                (None, Some(_)) => LineStatus::Added,
                (Some(_), None) => LineStatus::Removed,
                _ => classify(&metrics, tolerance_percent),
            };
            LineComparison {
                file: path.to_string(),
                line: lineno,
                status,
                metrics,
            }
        })
        .collect();

    let summary = SummaryComparison {
        elapsed_time_sec: Delta::new(
            before.summary.elapsed_time_sec,
            after.summary.elapsed_time_sec,
        ),
        peak_memory_mb: Delta::new(before.summary.peak_memory_mb, after.summary.peak_memory_mb),
        average_memory_mb: Delta::new(
            before.summary.average_memory_mb,
            after.summary.average_memory_mb,
        ),
        memory_growth_rate_mb_per_sec: Delta::new(
            before.summary.memory_growth_rate_mb_per_sec,
            after.summary.memory_growth_rate_mb_per_sec,
        ),
    };

    ComparisonResult {
        before_id: before.profile_id.clone(),
        after_id: after.profile_id.clone(),
        tolerance_percent,
        lines,
        summary,
    }
}

//! Hotspot ranking and bottleneck scoring for a single profile.
//!
//! Both analyses are pure, deterministic functions over an immutable
//! [`Profile`]: the same inputs always produce bit-identical output, and an
//! empty result is a valid outcome, never an error.

use crate::model::{MetricKind, Profile};
use serde::Serialize;
use std::cmp::Ordering;

/// Default threshold for CPU-kind hotspot metrics, in percent.
pub const DEFAULT_CPU_THRESHOLD: f64 = 1.0;
/// Default threshold for the memory hotspot metric, in MB.
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 10.0;
/// Default threshold for the GPU hotspot metric, in percent.
pub const DEFAULT_GPU_THRESHOLD: f64 = 1.0;

/// A ranked line exceeding a metric threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub metric_kind: MetricKind,
    pub file: String,
    pub line: u32,
    pub value: f64,
    /// 1-based rank; ties broken by ascending `(file, line)`.
    pub rank: usize,
}

/// A line exceeding one or more thresholds, with a normalized severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub file: String,
    pub line: u32,
    /// Metric kinds whose value exceeded their threshold.
    pub exceeded: Vec<MetricKind>,
    /// Normalized score in `[0, 1]`.
    pub severity: f64,
}

/// Descending by value, ties ascending `(file, line)`.
fn by_value_desc(a: &(String, u32, f64), b: &(String, u32, f64)) -> Ordering {
    b.2.partial_cmp(&a.2)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
        .then_with(|| a.1.cmp(&b.1))
}

/// Rank the lines whose `metric_kind` value exceeds `threshold`.
///
/// Output is sorted strictly descending by value, ties broken by ascending
/// `(file, line)`, truncated to `top_n`. An empty profile or no line over
/// the threshold yields an empty vector.
pub fn get_hotspots(
    profile: &Profile,
    metric_kind: MetricKind,
    top_n: usize,
    threshold: f64,
) -> Vec<Hotspot> {
    let mut candidates: Vec<(String, u32, f64)> = profile
        .lines()
        .filter_map(|(path, line)| {
            let value = line.metric_value(metric_kind);
            (value > threshold).then(|| (path.to_string(), line.line_number, value))
        })
        .collect();

    candidates.sort_by(by_value_desc);
    candidates.truncate(top_n);

    candidates
        .into_iter()
        .enumerate()
        .map(|(i, (file, line, value))| Hotspot {
            metric_kind,
            file,
            line,
            value,
            rank: i + 1,
        })
        .collect()
}

/// Severity contribution of one exceeded metric.
///
/// Percentage metrics normalize the headroom above the threshold; unbounded
/// metrics (memory) normalize against the threshold itself. Either way the
/// score is clipped into `[0, 1]`.
fn severity_score(kind: MetricKind, value: f64, threshold: f64) -> f64 {
    let raw = if kind.is_percentage() {
        (value - threshold) / (100.0 - threshold)
    } else {
        value / threshold
    };
    raw.clamp(0.0, 1.0)
}

/// Find every line exceeding at least one of the supplied thresholds.
///
/// Each CPU kind is checked against `cpu_threshold`, total memory against
/// `memory_threshold`, and GPU time against `gpu_threshold`. Severity is the
/// maximum per-kind score. Output is sorted descending by severity, ties
/// ascending `(file, line)`.
pub fn get_bottlenecks(
    profile: &Profile,
    cpu_threshold: f64,
    memory_threshold: f64,
    gpu_threshold: f64,
) -> Vec<Bottleneck> {
    let mut bottlenecks: Vec<Bottleneck> = profile
        .lines()
        .filter_map(|(path, line)| {
            let mut exceeded = Vec::new();
            let mut severity: f64 = 0.0;

            for kind in MetricKind::ALL {
                let threshold = match kind {
                    MetricKind::Memory => memory_threshold,
                    MetricKind::Gpu => gpu_threshold,
                    _ => cpu_threshold,
                };
                let value = line.metric_value(kind);
                if value > threshold {
                    exceeded.push(kind);
                    severity = severity.max(severity_score(kind, value, threshold));
                }
            }

            (!exceeded.is_empty()).then(|| Bottleneck {
                file: path.to_string(),
                line: line.line_number,
                exceeded,
                severity,
            })
        })
        .collect();

    bottlenecks.sort_by(|a, b| {
        b.severity
            .partial_cmp(&a.severity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });

    bottlenecks
}

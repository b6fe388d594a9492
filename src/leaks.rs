//! Velocity-based memory-leak detection.
//!
//! A line leaks when it allocates faster than it frees, sustained across the
//! run. Velocity is net allocation divided by elapsed time; lines with fewer
//! than two temporal observations are excluded outright rather than reported
//! as zero-velocity, since a single sample carries no growth evidence.

use crate::model::Profile;
use serde::Serialize;
use std::cmp::Ordering;

/// Velocity cutoffs, in MB/s, separating noise from leak confidence tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct LeakThresholds {
    /// At or below this velocity a line is not reported at all.
    pub noise_floor_mb_s: f64,
    /// Above the noise floor up to here: low confidence.
    pub medium_mb_s: f64,
    /// Above `medium_mb_s` up to here: medium confidence; beyond: high.
    pub high_mb_s: f64,
}

impl Default for LeakThresholds {
    fn default() -> Self {
        LeakThresholds {
            noise_floor_mb_s: 0.01,
            medium_mb_s: 0.1,
            high_mb_s: 1.0,
        }
    }
}

/// Confidence that a reported line is a genuine leak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakConfidence {
    Low,
    Medium,
    High,
}

/// A line whose net allocation velocity exceeds the noise floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryLeakCandidate {
    pub file: String,
    pub line: u32,
    pub velocity_mb_per_sec: f64,
    pub confidence: LeakConfidence,
}

/// Detect leak candidates with the default thresholds.
pub fn get_memory_leaks(profile: &Profile) -> Vec<MemoryLeakCandidate> {
    get_memory_leaks_with(profile, &LeakThresholds::default())
}

/// Detect leak candidates with explicit thresholds.
///
/// Output is sorted descending by velocity, ties broken by ascending
/// `(file, line)`. Negative velocity (net shrinkage) is never reported.
pub fn get_memory_leaks_with(
    profile: &Profile,
    thresholds: &LeakThresholds,
) -> Vec<MemoryLeakCandidate> {
    let elapsed = profile.summary.elapsed_time_sec;

    let mut candidates: Vec<MemoryLeakCandidate> = profile
        .lines()
        .filter_map(|(path, line)| {
            // A single allocation observation is insufficient temporal
            // evidence; skip the line entirely.
            if line.memory_samples.len() < 2 {
                return None;
            }

            let net_mb = line.memory_total_mb() - line.memory_freed_mb;
            let velocity = net_mb / elapsed;
            if velocity <= thresholds.noise_floor_mb_s {
                return None;
            }

            let confidence = if velocity <= thresholds.medium_mb_s {
                LeakConfidence::Low
            } else if velocity <= thresholds.high_mb_s {
                LeakConfidence::Medium
            } else {
                LeakConfidence::High
            };

            Some(MemoryLeakCandidate {
                file: path.to_string(),
                line: line.line_number,
                velocity_mb_per_sec: velocity,
                confidence,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.velocity_mb_per_sec
            .partial_cmp(&a.velocity_mb_per_sec)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });

    candidates
}

//! Canonical profile model.
//!
//! Every analysis module reads these types and none mutates them: a
//! [`Profile`] is constructed once by the parser ([`crate::scalene`]) and is
//! immutable afterwards, so concurrent read-only analyses over the same
//! instance need no coordination.
//!
//! All numeric line fields default to zero when absent from raw input; the
//! model carries no optional numeric fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric kinds a line can be ranked or compared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    InterpretedCpu,
    NativeCpu,
    SystemCpu,
    /// Total allocated memory (interpreted + native), in MB.
    Memory,
    Gpu,
}

impl MetricKind {
    /// All kinds, in reporting order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::InterpretedCpu,
        MetricKind::NativeCpu,
        MetricKind::SystemCpu,
        MetricKind::Memory,
        MetricKind::Gpu,
    ];

    /// Whether values of this kind are percentages bounded to 0-100.
    pub fn is_percentage(self) -> bool {
        !matches!(self, MetricKind::Memory)
    }
}

/// One temporal allocation observation for a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub timestamp_sec: f64,
    pub footprint_mb: f64,
}

/// Sampled metrics for a single source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub line_number: u32,
    /// Raw source text, may be empty.
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub cpu_percent_interpreted: f64,
    #[serde(default)]
    pub cpu_percent_native: f64,
    #[serde(default)]
    pub cpu_percent_system: f64,
    #[serde(default)]
    pub gpu_percent: f64,
    #[serde(default)]
    pub memory_interpreted_mb: f64,
    #[serde(default)]
    pub memory_native_mb: f64,
    /// Net deallocation attributed to this line.
    #[serde(default)]
    pub memory_freed_mb: f64,
    #[serde(default)]
    pub allocation_count: u64,
    /// Bytes copied by copy-heavy operations, in MB.
    #[serde(default)]
    pub copy_mb: f64,
    /// Temporal allocation observations, ordered by timestamp.
    #[serde(default)]
    pub memory_samples: Vec<MemorySample>,
}

impl LineMetrics {
    /// A zeroed metrics record for the given line.
    pub fn empty(line_number: u32) -> Self {
        LineMetrics {
            line_number,
            source_text: String::new(),
            cpu_percent_interpreted: 0.0,
            cpu_percent_native: 0.0,
            cpu_percent_system: 0.0,
            gpu_percent: 0.0,
            memory_interpreted_mb: 0.0,
            memory_native_mb: 0.0,
            memory_freed_mb: 0.0,
            allocation_count: 0,
            copy_mb: 0.0,
            memory_samples: Vec::new(),
        }
    }

    /// Total CPU percentage across interpreted, native, and system time.
    pub fn cpu_percent_total(&self) -> f64 {
        self.cpu_percent_interpreted + self.cpu_percent_native + self.cpu_percent_system
    }

    /// Total allocated memory in MB (interpreted + native).
    pub fn memory_total_mb(&self) -> f64 {
        self.memory_interpreted_mb + self.memory_native_mb
    }

    /// The value of one metric kind for this line.
    pub fn metric_value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::InterpretedCpu => self.cpu_percent_interpreted,
            MetricKind::NativeCpu => self.cpu_percent_native,
            MetricKind::SystemCpu => self.cpu_percent_system,
            MetricKind::Memory => self.memory_total_mb(),
            MetricKind::Gpu => self.gpu_percent,
        }
    }
}

/// A declared function boundary within a file. Ranges may nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRange {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// One profiled source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProfile {
    pub path: String,
    /// Sampled lines, sorted ascending by line number; line numbers unique.
    pub lines: Vec<LineMetrics>,
    /// Declared function boundaries, in declaration order.
    #[serde(default)]
    pub function_ranges: Vec<FunctionRange>,
}

impl FileProfile {
    /// Look up a line by number.
    pub fn line(&self, line_number: u32) -> Option<&LineMetrics> {
        self.lines
            .binary_search_by_key(&line_number, |l| l.line_number)
            .ok()
            .map(|idx| &self.lines[idx])
    }

    /// Highest sampled line number, or 0 for an empty file.
    pub fn max_line(&self) -> u32 {
        self.lines.last().map_or(0, |l| l.line_number)
    }
}

/// Whole-run aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Wall-clock duration of the profiled run, always positive.
    pub elapsed_time_sec: f64,
    #[serde(default)]
    pub peak_memory_mb: f64,
    #[serde(default)]
    pub average_memory_mb: f64,
    /// Signed; negative means the footprint shrank over the run.
    #[serde(default)]
    pub memory_growth_rate_mb_per_sec: f64,
}

/// One collected call-stack snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSample {
    pub frames: Vec<String>,
    pub count: u64,
}

/// A fully parsed profiling run. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,
    pub summary: ProfileSummary,
    /// Profiled files keyed by path; iteration order is ascending path order.
    pub files: BTreeMap<String, FileProfile>,
    /// Call-stack snapshots, absent when the profiler did not collect them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_samples: Option<Vec<StackSample>>,
}

impl Profile {
    /// Iterate every sampled line as `(path, metrics)`, files in ascending
    /// path order and lines in ascending line order.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &LineMetrics)> {
        self.files
            .values()
            .flat_map(|f| f.lines.iter().map(move |l| (f.path.as_str(), l)))
    }

    /// Total number of sampled lines across all files.
    pub fn line_count(&self) -> usize {
        self.files.values().map(|f| f.lines.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: u32) -> LineMetrics {
        LineMetrics {
            cpu_percent_interpreted: 1.0,
            cpu_percent_native: 2.0,
            cpu_percent_system: 0.5,
            memory_interpreted_mb: 3.0,
            memory_native_mb: 4.0,
            ..LineMetrics::empty(n)
        }
    }

    #[test]
    fn metric_value_dispatch() {
        let l = line(10);
        assert_eq!(l.metric_value(MetricKind::InterpretedCpu), 1.0);
        assert_eq!(l.metric_value(MetricKind::NativeCpu), 2.0);
        assert_eq!(l.metric_value(MetricKind::SystemCpu), 0.5);
        assert_eq!(l.metric_value(MetricKind::Memory), 7.0);
        assert_eq!(l.metric_value(MetricKind::Gpu), 0.0);
        assert_eq!(l.cpu_percent_total(), 3.5);
    }

    #[test]
    fn file_line_lookup() {
        let file = FileProfile {
            path: "a.py".to_string(),
            lines: vec![line(3), line(7), line(12)],
            function_ranges: vec![],
        };
        assert_eq!(file.line(7).unwrap().line_number, 7);
        assert!(file.line(8).is_none());
        assert_eq!(file.max_line(), 12);
    }

    #[test]
    fn profile_lines_iterate_in_path_order() {
        let mut files = BTreeMap::new();
        for path in ["b.py", "a.py"] {
            files.insert(
                path.to_string(),
                FileProfile {
                    path: path.to_string(),
                    lines: vec![line(1)],
                    function_ranges: vec![],
                },
            );
        }
        let profile = Profile {
            profile_id: "p".to_string(),
            summary: ProfileSummary {
                elapsed_time_sec: 1.0,
                peak_memory_mb: 0.0,
                average_memory_mb: 0.0,
                memory_growth_rate_mb_per_sec: 0.0,
            },
            files,
            stack_samples: None,
        };
        let paths: Vec<&str> = profile.lines().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a.py", "b.py"]);
        assert_eq!(profile.line_count(), 2);
    }
}

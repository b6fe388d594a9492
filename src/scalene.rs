//! Parse Scalene's JSON profile output into the canonical model.
//!
//! Scalene's output is quirky: diagnostic text may be interleaved with the
//! JSON payload, numeric fields sometimes arrive as strings or single-element
//! arrays, field names vary across versions, and most fields are simply
//! absent when the corresponding sampler was disabled. All of that tolerance
//! lives here; every downstream module sees only the strongly-typed
//! [`Profile`](crate::model::Profile).
//!
//! Parsing is all-or-nothing: on error no partially populated profile is
//! returned.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! let file = File::open("profile.json").unwrap();
//! let profile = lineprof::scalene::parse_reader(file).unwrap();
//!
//! println!("elapsed: {}s", profile.summary.elapsed_time_sec);
//! println!("files: {}", profile.files.len());
//! ```

use crate::error::{ProfileError, Result};
use crate::model::{
    FileProfile, FunctionRange, LineMetrics, MemorySample, Profile, ProfileSummary, StackSample,
};
use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter backing fresh profile ids; unique for the process lifetime.
static NEXT_PROFILE_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_profile_id() -> String {
    format!("profile-{}", NEXT_PROFILE_ID.fetch_add(1, Ordering::Relaxed))
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse Scalene output from any `Read`-able source.
///
/// Gzip-compressed output is detected by its magic bytes and decompressed
/// transparently.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Profile> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
        parse_str(&text)
    } else {
        parse_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Parse Scalene output, isolating the JSON payload from any interleaved
/// diagnostic text first.
pub fn parse_str(text: &str) -> Result<Profile> {
    let trimmed = text.trim();

    // The common case: the whole input is one JSON value.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return parse_value(&value);
    }

    // Otherwise scan for a balanced top-level object among the noise.
    // Diagnostic text may itself contain braces, so every candidate start
    // is tried until one parses.
    let bytes = trimmed.as_bytes();
    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }
        let Some(len) = balanced_object_len(&trimmed[start..]) else {
            continue;
        };
        let candidate = &trimmed[start..start + len];
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return parse_value(&value);
        }
    }

    Err(ProfileError::OutputBoundary(
        "no JSON object found in profiler output".to_string(),
    ))
}

/// Build a [`Profile`] from an already-parsed JSON tree.
pub fn parse_value(value: &Value) -> Result<Profile> {
    let map = value.as_object().ok_or_else(|| {
        ProfileError::MalformedInput(format!(
            "expected a mapping at the top level, got {}",
            json_type_name(value)
        ))
    })?;

    let summary = parse_summary(map)?;

    let mut files = BTreeMap::new();
    if let Some(raw_files) = map.get("files").and_then(Value::as_object) {
        for (path, entry) in raw_files {
            // Tolerate junk entries; a file record must at least be a mapping.
            if let Some(obj) = entry.as_object() {
                files.insert(path.clone(), parse_file(path, obj));
            }
        }
    }

    let profile_id = match map.get("profile_id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fresh_profile_id(),
    };

    Ok(Profile {
        profile_id,
        summary,
        files,
        stack_samples: parse_stacks(map.get("stacks")),
    })
}

// ============================================================================
// Summary
// ============================================================================

fn parse_summary(map: &Map<String, Value>) -> Result<ProfileSummary> {
    let elapsed = required_f64(map, &["elapsed_time_sec", "elapsed_time_seconds"])?;
    if elapsed <= 0.0 {
        return Err(ProfileError::Validation {
            field: "elapsed_time_sec".to_string(),
            detail: format!("must be positive, got {elapsed}"),
        });
    }

    Ok(ProfileSummary {
        elapsed_time_sec: elapsed,
        peak_memory_mb: non_negative_f64(map, &["max_footprint_mb", "peak_memory_mb"])?,
        average_memory_mb: non_negative_f64(map, &["avg_footprint_mb", "average_memory_mb"])?,
        memory_growth_rate_mb_per_sec: signed_f64(
            map,
            &["growth_rate_mb_s", "memory_growth_rate_mb_per_sec"],
        )?,
    })
}

/// A summary field that must exist and be numeric.
fn required_f64(map: &Map<String, Value>, aliases: &[&str]) -> Result<f64> {
    match lookup(map, aliases) {
        None => Err(ProfileError::Validation {
            field: aliases[0].to_string(),
            detail: "required field is missing".to_string(),
        }),
        Some(v) => coerce_f64(v).ok_or_else(|| ProfileError::Validation {
            field: aliases[0].to_string(),
            detail: format!("expected a number, got {}", json_type_name(v)),
        }),
    }
}

/// A summary field that defaults to 0 but, when present, must be a
/// non-negative number.
fn non_negative_f64(map: &Map<String, Value>, aliases: &[&str]) -> Result<f64> {
    let value = signed_f64(map, aliases)?;
    if value < 0.0 {
        return Err(ProfileError::Validation {
            field: aliases[0].to_string(),
            detail: format!("must be non-negative, got {value}"),
        });
    }
    Ok(value)
}

/// A summary field that defaults to 0 but, when present, must be numeric.
/// Negative values are allowed.
fn signed_f64(map: &Map<String, Value>, aliases: &[&str]) -> Result<f64> {
    match lookup(map, aliases) {
        None => Ok(0.0),
        Some(v) => coerce_f64(v).ok_or_else(|| ProfileError::Validation {
            field: aliases[0].to_string(),
            detail: format!("expected a number, got {}", json_type_name(v)),
        }),
    }
}

// ============================================================================
// Files, lines, and function ranges
// ============================================================================

fn parse_file(path: &str, obj: &Map<String, Value>) -> FileProfile {
    // Rebuild keyed by line number: duplicate records replace earlier ones,
    // keeping line numbers unique and the output sorted.
    let mut lines: BTreeMap<u32, LineMetrics> = BTreeMap::new();
    if let Some(raw_lines) = obj.get("lines").and_then(Value::as_array) {
        for entry in raw_lines {
            if let Some(metrics) = parse_line(entry) {
                lines.insert(metrics.line_number, metrics);
            }
        }
    }
    let lines: Vec<LineMetrics> = lines.into_values().collect();
    let max_line = lines.last().map_or(0, |l| l.line_number);

    let function_ranges = parse_function_ranges(obj.get("functions"), max_line);

    FileProfile {
        path: path.to_string(),
        lines,
        function_ranges,
    }
}

fn parse_line(entry: &Value) -> Option<LineMetrics> {
    let obj = entry.as_object()?;

    // A record without a line number cannot be placed; skip it.
    let line_number = lookup(obj, &["lineno", "line_number"])
        .and_then(coerce_f64)
        .filter(|n| *n >= 0.0)? as u32;

    let source_text = lookup(obj, &["line", "source"])
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    // Scalene reports one allocation total plus the fraction attributable
    // to interpreted code; newer outputs carry the split directly.
    let (memory_interpreted_mb, memory_native_mb) = if obj.contains_key("memory_interpreted_mb")
        || obj.contains_key("memory_native_mb")
    {
        (
            line_f64(obj, &["memory_interpreted_mb"]),
            line_f64(obj, &["memory_native_mb"]),
        )
    } else {
        let total = line_f64(obj, &["n_malloc_mb"]);
        let fraction = line_f64(obj, &["n_python_fraction"]).clamp(0.0, 1.0);
        (total * fraction, total * (1.0 - fraction))
    };

    Some(LineMetrics {
        line_number,
        source_text,
        cpu_percent_interpreted: line_percent(obj, &["n_cpu_percent_python", "cpu_percent_interpreted"]),
        cpu_percent_native: line_percent(obj, &["n_cpu_percent_c", "cpu_percent_native"]),
        cpu_percent_system: line_percent(obj, &["n_sys_percent", "cpu_percent_system"]),
        gpu_percent: line_percent(obj, &["n_gpu_percent", "gpu_percent"]),
        memory_interpreted_mb,
        memory_native_mb,
        memory_freed_mb: line_f64(obj, &["n_free_mb", "memory_freed_mb"]),
        allocation_count: line_f64(obj, &["n_mallocs", "allocation_count"]) as u64,
        copy_mb: line_f64(obj, &["n_copy_mb", "copy_mb"]),
        memory_samples: parse_memory_samples(obj.get("memory_samples")),
    })
}

fn parse_memory_samples(value: Option<&Value>) -> Vec<MemorySample> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Array(pair) if pair.len() == 2 => Some(MemorySample {
                timestamp_sec: coerce_f64(&pair[0])?,
                footprint_mb: coerce_f64(&pair[1])?,
            }),
            Value::Object(obj) => Some(MemorySample {
                timestamp_sec: lookup(obj, &["timestamp_sec", "time"]).and_then(coerce_f64)?,
                footprint_mb: lookup(obj, &["footprint_mb", "mb"]).and_then(coerce_f64)?,
            }),
            _ => None,
        })
        .collect()
}

/// Reconstruct function ranges from whatever boundary hints the raw input
/// provides. A missing end line defaults to the start line of the next
/// declared function in the same file, else the file's last sampled line.
fn parse_function_ranges(value: Option<&Value>, max_line: u32) -> Vec<FunctionRange> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    // First pass: collect declared (name, start, declared end).
    let mut declared: Vec<(String, u32, Option<u32>)> = Vec::new();
    for entry in entries {
        let Some(obj) = entry.as_object() else {
            continue;
        };
        // Scalene reuses "line" for the function name in function records.
        let Some(name) = lookup(obj, &["name", "line"]).and_then(Value::as_str) else {
            continue;
        };
        let Some(start) = lookup(obj, &["lineno", "start_line"])
            .and_then(coerce_f64)
            .filter(|n| *n >= 0.0)
        else {
            continue;
        };
        let end = lookup(obj, &["end_line", "last_line"])
            .and_then(coerce_f64)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u32);
        declared.push((name.to_string(), start as u32, end));
    }

    // Second pass: fill missing ends from the next declaration or EOF.
    (0..declared.len())
        .map(|i| {
            let (name, start, declared_end) = &declared[i];
            let end = declared_end.unwrap_or_else(|| {
                declared
                    .get(i + 1)
                    .map(|(_, next_start, _)| *next_start)
                    .unwrap_or(max_line)
            });
            FunctionRange {
                name: name.clone(),
                start_line: *start,
                end_line: end.max(*start),
            }
        })
        .collect()
}

// ============================================================================
// Stacks
// ============================================================================

fn parse_stacks(value: Option<&Value>) -> Option<Vec<StackSample>> {
    let entries = value?.as_array()?;
    let samples = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(obj) => {
                let frames = obj
                    .get("frames")
                    .and_then(Value::as_array)?
                    .iter()
                    .filter_map(|f| f.as_str().map(String::from))
                    .collect();
                let count = obj.get("count").and_then(coerce_f64).unwrap_or(1.0);
                Some(StackSample {
                    frames,
                    count: count.max(0.0) as u64,
                })
            }
            Value::Array(frames) => Some(StackSample {
                frames: frames
                    .iter()
                    .filter_map(|f| f.as_str().map(String::from))
                    .collect(),
                count: 1,
            }),
            _ => None,
        })
        .collect();
    Some(samples)
}

// ============================================================================
// Scalar normalization
// ============================================================================
//
// Every accepted raw shape for a numeric field funnels through here: a bare
// number, a numeric string, or a single-element array of either. New quirks
// are added in this one place, never inline at a call site.

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) if items.len() == 1 => coerce_f64(&items[0]),
        _ => None,
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| map.get(*key))
}

/// A per-line numeric field: defaulted when absent or uncoercible, clamped
/// to non-negative (line metrics carry no negative values).
fn line_f64(map: &Map<String, Value>, aliases: &[&str]) -> f64 {
    lookup(map, aliases)
        .and_then(coerce_f64)
        .unwrap_or(0.0)
        .max(0.0)
}

/// A per-line percentage field, bounded to 0-100.
fn line_percent(map: &Map<String, Value>, aliases: &[&str]) -> f64 {
    line_f64(map, aliases).min(100.0)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Byte length of the balanced JSON object starting at the first byte of
/// `text` (which must be `{`), accounting for strings and escapes. `None`
/// when the object never closes.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_raw() -> String {
        r#"{
            "elapsed_time_sec": 2.5,
            "max_footprint_mb": 128.0,
            "avg_footprint_mb": 64.0,
            "growth_rate_mb_s": -0.5,
            "files": {
                "app.py": {
                    "lines": [
                        {"lineno": 10, "line": "x = compute()", "n_cpu_percent_python": 12.5,
                         "n_cpu_percent_c": 3.0, "n_sys_percent": 1.0,
                         "n_malloc_mb": 10.0, "n_python_fraction": 0.8,
                         "n_free_mb": 2.0, "n_mallocs": 42}
                    ],
                    "functions": [
                        {"line": "compute", "lineno": 8}
                    ]
                }
            }
        }"#
        .to_string()
    }

    #[test]
    fn parse_minimal_profile() {
        let profile = parse_str(&minimal_raw()).unwrap();

        assert_eq!(profile.summary.elapsed_time_sec, 2.5);
        assert_eq!(profile.summary.peak_memory_mb, 128.0);
        assert_eq!(profile.summary.average_memory_mb, 64.0);
        assert_eq!(profile.summary.memory_growth_rate_mb_per_sec, -0.5);

        let file = &profile.files["app.py"];
        assert_eq!(file.lines.len(), 1);
        let line = &file.lines[0];
        assert_eq!(line.line_number, 10);
        assert_eq!(line.source_text, "x = compute()");
        assert_eq!(line.cpu_percent_interpreted, 12.5);
        assert_eq!(line.cpu_percent_native, 3.0);
        assert_eq!(line.cpu_percent_system, 1.0);
        assert_eq!(line.allocation_count, 42);
        assert_eq!(line.memory_freed_mb, 2.0);
        assert!(profile.stack_samples.is_none());
    }

    #[test]
    fn malloc_fraction_splits_memory() {
        let profile = parse_str(&minimal_raw()).unwrap();
        let line = &profile.files["app.py"].lines[0];

        assert!((line.memory_interpreted_mb - 8.0).abs() < 1e-9);
        assert!((line.memory_native_mb - 2.0).abs() < 1e-9);
        assert!((line.memory_total_mb() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_memory_split_wins_over_malloc_total() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 1, "memory_interpreted_mb": 5.0, "memory_native_mb": 1.0, "n_malloc_mb": 99.0}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        let line = &profile.files["a.py"].lines[0];
        assert_eq!(line.memory_interpreted_mb, 5.0);
        assert_eq!(line.memory_native_mb, 1.0);
    }

    #[test]
    fn coerces_heterogeneous_scalar_shapes() {
        let raw = r#"{
            "elapsed_time_sec": "3.5",
            "max_footprint_mb": [100],
            "files": {"a.py": {"lines": [
                {"lineno": "7", "n_cpu_percent_python": ["2.5"], "n_mallocs": "9"}
            ]}}
        }"#;
        let profile = parse_str(raw).unwrap();
        assert_eq!(profile.summary.elapsed_time_sec, 3.5);
        assert_eq!(profile.summary.peak_memory_mb, 100.0);
        let line = &profile.files["a.py"].lines[0];
        assert_eq!(line.line_number, 7);
        assert_eq!(line.cpu_percent_interpreted, 2.5);
        assert_eq!(line.allocation_count, 9);
    }

    #[test]
    fn missing_elapsed_time_is_validation_error() {
        let result = parse_str(r#"{"files": {}}"#);
        assert!(matches!(
            result,
            Err(ProfileError::Validation { field, .. }) if field == "elapsed_time_sec"
        ));
    }

    #[test]
    fn non_positive_elapsed_time_is_validation_error() {
        let result = parse_str(r#"{"elapsed_time_sec": 0.0}"#);
        assert!(matches!(
            result,
            Err(ProfileError::Validation { field, .. }) if field == "elapsed_time_sec"
        ));
    }

    #[test]
    fn negative_peak_memory_is_validation_error() {
        let result = parse_str(r#"{"elapsed_time_sec": 1.0, "max_footprint_mb": -4.0}"#);
        assert!(matches!(
            result,
            Err(ProfileError::Validation { field, .. }) if field == "max_footprint_mb"
        ));
    }

    #[test]
    fn non_numeric_summary_field_is_validation_error() {
        let result = parse_str(r#"{"elapsed_time_sec": 1.0, "avg_footprint_mb": {"oops": 1}}"#);
        assert!(matches!(
            result,
            Err(ProfileError::Validation { field, .. }) if field == "avg_footprint_mb"
        ));
    }

    #[test]
    fn non_mapping_top_level_is_malformed_input() {
        assert!(matches!(
            parse_str("[1, 2, 3]"),
            Err(ProfileError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_str("42"),
            Err(ProfileError::MalformedInput(_))
        ));
    }

    #[test]
    fn isolates_payload_from_interleaved_diagnostics() {
        let raw = format!(
            "Scalene: warming up sampler {{rate=0.01}}\n{}\nScalene: done.\n",
            minimal_raw()
        );
        let profile = parse_str(&raw).unwrap();
        assert_eq!(profile.summary.elapsed_time_sec, 2.5);
        assert_eq!(profile.files.len(), 1);
    }

    #[test]
    fn pure_diagnostic_text_is_output_boundary_error() {
        let result = parse_str("Scalene: error launching target\nno output produced\n");
        assert!(matches!(result, Err(ProfileError::OutputBoundary(_))));
    }

    #[test]
    fn truncated_payload_is_output_boundary_error() {
        let result = parse_str(r#"{"elapsed_time_sec": 1.0, "files": {"a.py""#);
        assert!(matches!(result, Err(ProfileError::OutputBoundary(_))));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [{"lineno": 3}]}}}"#;
        let profile = parse_str(raw).unwrap();
        let line = &profile.files["a.py"].lines[0];
        assert_eq!(line.cpu_percent_interpreted, 0.0);
        assert_eq!(line.memory_total_mb(), 0.0);
        assert_eq!(line.allocation_count, 0);
        assert_eq!(line.copy_mb, 0.0);
        assert_eq!(line.source_text, "");
        assert_eq!(profile.summary.peak_memory_mb, 0.0);
    }

    #[test]
    fn negative_line_values_clamp_to_zero() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 1, "n_cpu_percent_python": -5.0, "n_malloc_mb": -1.0}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        let line = &profile.files["a.py"].lines[0];
        assert_eq!(line.cpu_percent_interpreted, 0.0);
        assert_eq!(line.memory_total_mb(), 0.0);
    }

    #[test]
    fn duplicate_line_records_keep_the_last() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 5, "n_cpu_percent_python": 1.0},
            {"lineno": 5, "n_cpu_percent_python": 9.0}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        let file = &profile.files["a.py"];
        assert_eq!(file.lines.len(), 1);
        assert_eq!(file.lines[0].cpu_percent_interpreted, 9.0);
    }

    #[test]
    fn lines_are_sorted_by_line_number() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 30}, {"lineno": 2}, {"lineno": 17}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        let numbers: Vec<u32> = profile.files["a.py"]
            .lines
            .iter()
            .map(|l| l.line_number)
            .collect();
        assert_eq!(numbers, vec![2, 17, 30]);
    }

    #[test]
    fn function_end_defaults_to_next_function_start() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {
            "lines": [{"lineno": 40}],
            "functions": [
                {"line": "first", "lineno": 5},
                {"line": "second", "lineno": 20}
            ]
        }}}"#;
        let profile = parse_str(raw).unwrap();
        let ranges = &profile.files["a.py"].function_ranges;
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].name, "first");
        assert_eq!(ranges[0].start_line, 5);
        assert_eq!(ranges[0].end_line, 20);
        // Last function extends to the end of the file.
        assert_eq!(ranges[1].start_line, 20);
        assert_eq!(ranges[1].end_line, 40);
    }

    #[test]
    fn declared_end_line_is_respected() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {
            "functions": [{"name": "f", "start_line": 3, "end_line": 9}]
        }}}"#;
        let profile = parse_str(raw).unwrap();
        let ranges = &profile.files["a.py"].function_ranges;
        assert_eq!(
            ranges[0],
            FunctionRange {
                name: "f".to_string(),
                start_line: 3,
                end_line: 9
            }
        );
    }

    #[test]
    fn parses_stack_samples() {
        let raw = r#"{"elapsed_time_sec": 1.0, "stacks": [
            {"frames": ["main", "compute"], "count": 7},
            ["main", "io_wait"]
        ]}"#;
        let profile = parse_str(raw).unwrap();
        let stacks = profile.stack_samples.unwrap();
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].frames, vec!["main", "compute"]);
        assert_eq!(stacks[0].count, 7);
        assert_eq!(stacks[1].count, 1);
    }

    #[test]
    fn raw_profile_id_is_preserved() {
        let raw = r#"{"elapsed_time_sec": 1.0, "profile_id": "run-42"}"#;
        let profile = parse_str(raw).unwrap();
        assert_eq!(profile.profile_id, "run-42");
    }

    #[test]
    fn fresh_profile_ids_are_unique() {
        let a = parse_str(r#"{"elapsed_time_sec": 1.0}"#).unwrap();
        let b = parse_str(r#"{"elapsed_time_sec": 1.0}"#).unwrap();
        assert_ne!(a.profile_id, b.profile_id);
        assert!(a.profile_id.starts_with("profile-"));
    }

    #[test]
    fn parses_memory_samples_pairs() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 1, "memory_samples": [[0.1, 5.0], [0.9, 9.0], "garbage"]}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        let samples = &profile.files["a.py"].lines[0].memory_samples;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_sec, 0.1);
        assert_eq!(samples[1].footprint_mb, 9.0);
    }

    #[test]
    fn gzip_input_is_decompressed() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(minimal_raw().as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let profile = parse_reader(compressed.as_slice()).unwrap();
        assert_eq!(profile.summary.elapsed_time_sec, 2.5);
    }

    #[test]
    fn percentages_are_bounded_to_one_hundred() {
        let raw = r#"{"elapsed_time_sec": 1.0, "files": {"a.py": {"lines": [
            {"lineno": 1, "n_cpu_percent_python": 250.0}
        ]}}}"#;
        let profile = parse_str(raw).unwrap();
        assert_eq!(profile.files["a.py"].lines[0].cpu_percent_interpreted, 100.0);
    }
}

//! Analysis engine for Scalene line-level profiling data.
//!
//! This crate parses the JSON output of the [Scalene] Python profiler into an
//! immutable canonical model and runs deterministic analyses over it.
//!
//! # Modules
//!
//! - [`model`] - the canonical profile model every analysis reads
//! - [`scalene`] - parser from raw Scalene output to the model
//! - [`analysis`] - hotspot ranking and bottleneck severity scoring
//! - [`leaks`] - velocity-based memory-leak detection
//! - [`functions`] - line-to-function metric rollups
//! - [`compare`] - before/after comparison of two profiles
//! - [`store`] - the `get`/`put` storage boundary
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use lineprof::model::MetricKind;
//!
//! let profile = lineprof::scalene::parse_reader(File::open("profile.json").unwrap()).unwrap();
//!
//! for spot in lineprof::analysis::get_hotspots(&profile, MetricKind::InterpretedCpu, 10, 1.0) {
//!     println!("#{} {}:{} {:.1}%", spot.rank, spot.file, spot.line, spot.value);
//! }
//! ```
//!
//! [Scalene]: https://github.com/plasma-umass/scalene

pub mod analysis;
pub mod compare;
pub mod error;
pub mod functions;
pub mod leaks;
pub mod model;
pub mod scalene;
pub mod store;

pub use error::{ProfileError, Result};
pub use model::{MetricKind, Profile};

//! Compare two Scalene profiles and emit an NDJSON diff.
//!
//! Emits a `header`, one `delta` record per `(file, line)` present in either
//! run, and a run-level `summary` record.
//!
//! # Usage
//!
//! ```bash
//! profile_diff before.json after.json --tolerance 10 -o diff.ndjson
//! ```

use clap::Parser;
use lineprof::compare::{DEFAULT_TOLERANCE_PERCENT, ComparisonResult, compare};
use lineprof::scalene::parse_reader;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "profile_diff")]
#[command(about = "Compare two Scalene profiles for regressions and improvements")]
#[command(version)]
struct Args {
    /// Baseline profile (before the change)
    before: PathBuf,

    /// Target profile (after the change)
    after: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Percent change a metric must exceed to count as a regression
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE_PERCENT)]
    tolerance: f64,
}

fn write_diff<W: Write>(result: &ComparisonResult, mut writer: W) -> std::io::Result<()> {
    let header = serde_json::json!({
        "type": "header",
        "format": "profile-diff",
        "version": "0.1",
        "before": result.before_id,
        "after": result.after_id,
        "tolerance_percent": result.tolerance_percent,
    });
    writeln!(writer, "{header}")?;

    for line in &result.lines {
        let record = serde_json::json!({
            "type": "delta",
            "file": line.file,
            "line": line.line,
            "status": line.status,
            "metrics": line.metrics,
        });
        writeln!(writer, "{record}")?;
    }

    let summary = serde_json::json!({
        "type": "summary",
        "elapsed_time_sec": result.summary.elapsed_time_sec,
        "peak_memory_mb": result.summary.peak_memory_mb,
        "average_memory_mb": result.summary.average_memory_mb,
        "memory_growth_rate_mb_per_sec": result.summary.memory_growth_rate_mb_per_sec,
    });
    writeln!(writer, "{summary}")?;

    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Loading baseline: {}", args.before.display());
    let before = parse_reader(BufReader::new(File::open(&args.before)?))?;
    eprintln!("  {} files, {} lines", before.files.len(), before.line_count());

    eprintln!("Loading target: {}", args.after.display());
    let after = parse_reader(BufReader::new(File::open(&args.after)?))?;
    eprintln!("  {} files, {} lines", after.files.len(), after.line_count());

    let result = compare(&before, &after, args.tolerance);

    let regressions = result
        .lines
        .iter()
        .filter(|l| matches!(l.status, lineprof::compare::LineStatus::Regression))
        .count();
    eprintln!(
        "Compared {} lines, {} regressions",
        result.lines.len(),
        regressions
    );

    match &args.output {
        Some(path) => {
            let out = BufWriter::new(File::create(path)?);
            write_diff(&result, out)?;
            eprintln!("Wrote diff to {}", path.display());
        }
        None => {
            write_diff(&result, std::io::stdout())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Analyze one Scalene profile and emit an NDJSON report.
//!
//! Records emitted, one per line: a `header`, ranked `hotspot` records per
//! metric kind, `bottleneck` records, `leak` records, and `function`
//! rollups.
//!
//! # Usage
//!
//! ```bash
//! profile_report profile.json -o report.ndjson
//! ```

use clap::Parser;
use lineprof::analysis::{
    DEFAULT_CPU_THRESHOLD, DEFAULT_GPU_THRESHOLD, DEFAULT_MEMORY_THRESHOLD, get_bottlenecks,
    get_hotspots,
};
use lineprof::functions::get_all_function_summaries;
use lineprof::leaks::get_memory_leaks;
use lineprof::model::{MetricKind, Profile};
use lineprof::scalene::parse_reader;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "profile_report")]
#[command(about = "Analyze a Scalene profile for hotspots, bottlenecks, and leaks")]
#[command(version)]
struct Args {
    /// Scalene JSON output (gzip-compressed input is detected)
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum hotspots to report per metric kind
    #[arg(short = 'n', long, default_value = "10")]
    top: usize,

    /// CPU threshold in percent
    #[arg(long, default_value_t = DEFAULT_CPU_THRESHOLD)]
    cpu_threshold: f64,

    /// Memory threshold in MB
    #[arg(long, default_value_t = DEFAULT_MEMORY_THRESHOLD)]
    memory_threshold: f64,

    /// GPU threshold in percent
    #[arg(long, default_value_t = DEFAULT_GPU_THRESHOLD)]
    gpu_threshold: f64,
}

fn write_report<W: Write>(args: &Args, profile: &Profile, mut writer: W) -> std::io::Result<()> {
    let header = serde_json::json!({
        "type": "header",
        "format": "profile-report",
        "version": "0.1",
        "profile_id": profile.profile_id,
        "elapsed_time_sec": profile.summary.elapsed_time_sec,
        "peak_memory_mb": profile.summary.peak_memory_mb,
        "files": profile.files.len(),
        "lines": profile.line_count(),
    });
    writeln!(writer, "{header}")?;

    for kind in MetricKind::ALL {
        let threshold = match kind {
            MetricKind::Memory => args.memory_threshold,
            MetricKind::Gpu => args.gpu_threshold,
            _ => args.cpu_threshold,
        };
        for spot in get_hotspots(profile, kind, args.top, threshold) {
            let record = serde_json::json!({
                "type": "hotspot",
                "metric": spot.metric_kind,
                "file": spot.file,
                "line": spot.line,
                "value": spot.value,
                "rank": spot.rank,
            });
            writeln!(writer, "{record}")?;
        }
    }

    for bottleneck in get_bottlenecks(
        profile,
        args.cpu_threshold,
        args.memory_threshold,
        args.gpu_threshold,
    ) {
        let record = serde_json::json!({
            "type": "bottleneck",
            "file": bottleneck.file,
            "line": bottleneck.line,
            "exceeded": bottleneck.exceeded,
            "severity": bottleneck.severity,
        });
        writeln!(writer, "{record}")?;
    }

    for leak in get_memory_leaks(profile) {
        let record = serde_json::json!({
            "type": "leak",
            "file": leak.file,
            "line": leak.line,
            "velocity_mb_per_sec": leak.velocity_mb_per_sec,
            "confidence": leak.confidence,
        });
        writeln!(writer, "{record}")?;
    }

    for summary in get_all_function_summaries(profile) {
        let record = serde_json::json!({
            "type": "function",
            "name": summary.name,
            "file": summary.file,
            "start_line": summary.start_line,
            "end_line": summary.end_line,
            "cpu_percent_total": summary.cpu_percent_total,
            "memory_mb_total": summary.memory_mb_total,
            "line_count": summary.line_count,
        });
        writeln!(writer, "{record}")?;
    }

    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Loading profile: {}", args.input.display());
    let file = File::open(&args.input)?;
    let profile = parse_reader(BufReader::new(file))?;
    eprintln!(
        "  {} files, {} lines, {:.2}s elapsed",
        profile.files.len(),
        profile.line_count(),
        profile.summary.elapsed_time_sec
    );

    match &args.output {
        Some(path) => {
            let out = BufWriter::new(File::create(path)?);
            write_report(&args, &profile, out)?;
            eprintln!("Wrote report to {}", path.display());
        }
        None => {
            write_report(&args, &profile, std::io::stdout())?;
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

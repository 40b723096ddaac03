use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use tracing::Level;

use raw_core::{compress_file, decompress_file, SampleWidth};
use raw_engines::{engine_by_id, engine_from_name};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "raw_codec",
    about = "Compress and decompress raw, big-endian, unsigned integer samples",
    version
)]
struct Cli {
    /// Whether to compress raw samples or decompress a bitstream
    mode: Mode,
    /// Number of bytes per sample: 1, 2 or 4
    #[arg(value_parser = parse_width)]
    bytes_per_sample: SampleWidth,
    /// Original samples (compress) or compressed bitstream (decompress)
    input_path: PathBuf,
    /// Where the bitstream (compress) or reconstructed samples (decompress) go
    output_path: PathBuf,
    /// Engine used when compressing: rice | zstd | lz4 | passthrough
    #[arg(short, long, default_value = "rice")]
    engine: String,
    /// Zstd compression level (1–22, only used with --engine zstd)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=22))]
    zstd_level: i32,
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Compress,
    Decompress,
}

fn parse_width(s: &str) -> Result<SampleWidth, String> {
    let bytes: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of bytes", s))?;
    SampleWidth::try_from(bytes).map_err(|e| e.to_string())
}

/// Parse arguments, exiting with status 1 on any usage error.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            // Value errors are reported without the usage line.
            if !e.to_string().contains("Usage:") {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

// ── Mode implementations ───────────────────────────────────────────────────

fn run_compress(cli: &Cli) -> anyhow::Result<()> {
    let engine = engine_from_name(&cli.engine, cli.zstd_level)?;

    let t0 = Instant::now();
    let stats = compress_file(
        &cli.input_path,
        &cli.output_path,
        cli.bytes_per_sample,
        engine.as_ref(),
    )
    .with_context(|| format!("compressing {:?}", cli.input_path))?;
    let elapsed = t0.elapsed();

    eprintln!("  engine      : {}", engine.name());
    eprintln!("  width       : {} byte(s)", cli.bytes_per_sample);
    eprintln!("  samples     : {}", stats.samples);
    eprintln!("  raw size    : {}", human_bytes(stats.raw_bytes));
    eprintln!("  compressed  : {}", human_bytes(stats.compressed_bytes));
    eprintln!("  ratio       : {:.2}x", stats.ratio());
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(cli: &Cli) -> anyhow::Result<()> {
    let t0 = Instant::now();
    let stats = decompress_file(
        &cli.input_path,
        &cli.output_path,
        cli.bytes_per_sample,
        engine_by_id,
    )
    .with_context(|| format!("decompressing {:?}", cli.input_path))?;
    let elapsed = t0.elapsed();

    eprintln!("  engine      : {}", stats.engine);
    eprintln!("  width       : {} byte(s)", cli.bytes_per_sample);
    eprintln!("  samples     : {}", stats.samples);
    eprintln!("  compressed  : {}", human_bytes(stats.compressed_bytes));
    eprintln!("  raw size    : {}", human_bytes(stats.raw_bytes));
    eprintln!("  ratio       : {:.2}x", stats.ratio());
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbose);
    match cli.mode {
        Mode::Compress => run_compress(&cli),
        Mode::Decompress => run_decompress(&cli),
    }
}

use cartpack::io_utils::{byte_range, init_tracing, CliError};
use cartpack::{compress, Mode};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Compress a byte range of a file into a terminated block.
#[derive(Parser)]
struct Args {
    /// Input file
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// First byte of the range to compress
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Number of bytes to compress (defaults to the rest of the file)
    #[arg(long)]
    len: Option<usize>,
    /// Encoding strategy
    #[arg(long, value_enum, default_value_t = Mode::Optimal)]
    mode: Mode,
    /// Compress the compressed block a second time
    #[arg(long)]
    twice: bool,
    /// Print a JSON summary on stdout
    #[arg(long)]
    json: bool,
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let start_time = Instant::now();
    let data =
        fs::read(&args.input).map_err(|e| CliError::io("reading input file", &args.input, e))?;
    let range = byte_range(&data, args.offset, args.len)
        .map_err(|e| CliError::codec("selecting input range", e))?;

    let inner = compress(range, args.mode).map_err(|e| CliError::codec("compressing", e))?;
    let (packed, inner_len) = if args.twice {
        let outer =
            compress(&inner, args.mode).map_err(|e| CliError::codec("compressing", e))?;
        let inner_len = inner.len();
        (outer, Some(inner_len))
    } else {
        (inner, None)
    };

    fs::write(&args.output, &packed)
        .map_err(|e| CliError::io("writing output file", &args.output, e))?;

    let elapsed = start_time.elapsed();
    if args.json {
        let summary = serde_json::json!({
            "mode": args.mode,
            "input_bytes": range.len(),
            "compressed_bytes": packed.len(),
            "inner_bytes": inner_len,
            "elapsed_ms": elapsed.as_millis(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!(
            "{} -> {} bytes ({}) in {:.2?}",
            range.len(),
            packed.len(),
            args.mode,
            elapsed
        );
        if let Some(inner) = inner_len {
            eprintln!("inner block: {inner} bytes");
        }
    }
    Ok(())
}

//! Prints the segments of a compressed block, its probed length and per
//! opcode statistics. Used for debugging ROM blocks.

use cartpack::io_utils::{init_tracing, CliError};
use cartpack::{Segment, SegmentReader, SegmentStats};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// File containing the compressed block
    input: PathBuf,
    /// Position of the block inside the input file
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Print statistics as JSON instead of a segment listing
    #[arg(long)]
    json: bool,
}

fn describe(segment: &Segment) -> String {
    match *segment {
        Segment::Literal(bytes) => format!("literal   x{:<3} {}", bytes.len(), hex::encode(bytes)),
        Segment::ByteFill { value, count } => format!("byte      x{count:<3} {value:02x}"),
        Segment::PairFill { pair, count } => format!("pair      x{count:<3} {}", hex::encode(pair)),
        Segment::IncrementFill { seed, count } => format!("increment x{count:<3} {seed:02x}"),
        Segment::AbsoluteCopy { address, count } => {
            format!("absolute  x{count:<3} @{address:#06x}")
        }
        Segment::RelativeCopy { distance, count } => format!("relative  x{count:<3} -{distance}"),
    }
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
    let data =
        fs::read(&args.input).map_err(|e| CliError::io("reading input file", &args.input, e))?;
    let stats = SegmentStats::from_stream(&data, args.offset)
        .map_err(|e| CliError::codec("reading block", e))?;

    if args.json {
        let mut json = serde_json::to_value(&stats)?;
        json["ratio"] = serde_json::json!(stats.ratio());
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let reader = SegmentReader::at(&data, args.offset)
        .map_err(|e| CliError::codec("reading block", e))?;
    for segment in reader {
        println!("{}", describe(&segment));
    }
    println!(
        "{} segments, {} -> {} bytes, ratio {:.3}{}",
        stats.segments(),
        stats.encoded_bytes,
        stats.decoded_bytes,
        stats.ratio(),
        if stats.terminated { "" } else { " (unterminated)" }
    );
    Ok(())
}

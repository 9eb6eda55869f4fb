use cartpack::io_utils::{init_tracing, CliError};
use cartpack::{decompress, decompress_bounded};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Decompress the block starting at an offset of a file.
#[derive(Parser)]
struct Args {
    /// File containing the compressed block
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Position of the block inside the input file
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Stop after producing this many bytes
    #[arg(long)]
    limit: Option<usize>,
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
    let decompressed = match args.limit {
        Some(limit) => decompress_bounded(&data, args.offset, limit),
        None => decompress(&data, args.offset),
    }
    .map_err(|e| CliError::codec("decompressing", e))?;
    fs::write(&args.output, &decompressed)
        .map_err(|e| CliError::io("writing output file", &args.output, e))?;
    Ok(())
}

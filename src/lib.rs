//! Compression codec for cartridge game resources.
//!
//! Graphics tiles and 128×128 track maps are stored as blocks of segments:
//! literal runs, byte/pair/incrementing fills and window copies that reuse
//! already decompressed output. This crate decodes such blocks, measures how
//! many bytes a block occupies without materializing it, and re-encodes data
//! with either a greedy or a minimal-length encoder.
//!
//! ```
//! use cartpack::{compress, compressed_len, decompress, Mode};
//!
//! let data = b"AAAAAAAAtile";
//! let packed = compress(data, Mode::Optimal).unwrap();
//! assert_eq!(compressed_len(&packed, 0).unwrap(), packed.len());
//! assert_eq!(decompress(&packed, 0).unwrap(), data);
//! ```

mod codec;
mod config;
mod decode;
mod error;
mod fast;
pub mod io_utils;
mod matcher;
mod optimal;
mod segment;
mod stats;
mod stream;
mod suffix;

pub use codec::{
    compress, compress_twice, compress_with, compressed_len, decompress, decompress_bounded,
    decompress_track_map, decompress_twice, Mode, TRACK_MAP_LEN,
};
pub use config::{Config, DEFAULT_SEARCH_DEPTH};
pub use decode::{apply_segment, decode, probe_length, SegmentReader, StreamEnd};
pub use error::CartpackError;
pub use fast::{encode_fast, encode_fast_with_depth, plan_fast};
pub use matcher::{MatchCandidates, MatchFinder, WindowMatch, MAX_ADDRESS, MAX_DISTANCE, MIN_MATCH};
pub use optimal::{encode_optimal, plan_optimal};
pub use segment::{
    extended_count, header_len, segment_cost, split_control, EncodingPlan, Opcode, Segment,
    INLINE_MAX, MAX_COUNT, TERMINATOR,
};
pub use stats::{OpcodeTally, SegmentStats};
pub use stream::{CompressedStream, OutputBuffer, FILLER};
pub use suffix::SuffixIndex;

//! Entry points used by ROM loaders and track importers.
//!
//! Every function is a pure transformation of caller-owned bytes. The encoder
//! is chosen per call through [`Mode`], so concurrent callers can use
//! different strategies without interfering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::decode::{decode, probe_length};
use crate::fast::encode_fast_with_depth;
use crate::optimal::encode_optimal;
use crate::CartpackError;

/// Decompressed size of a 128×128 track map.
pub const TRACK_MAP_LEN: usize = 128 * 128;

/// Encoding strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single greedy pass.
    Fast,
    /// Shortest-path search for the minimal encoding.
    #[default]
    Optimal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Fast => f.write_str("fast"),
            Mode::Optimal => f.write_str("optimal"),
        }
    }
}

impl FromStr for Mode {
    type Err = CartpackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Mode::Fast),
            "optimal" => Ok(Mode::Optimal),
            other => Err(CartpackError::Config(format!("unknown mode '{other}'"))),
        }
    }
}

/// Decompress the block at `offset` until its terminator.
pub fn decompress(source: &[u8], offset: usize) -> Result<Vec<u8>, CartpackError> {
    decode(source, offset, None)
}

/// Decompress the block at `offset`, producing at most `max_len` bytes.
pub fn decompress_bounded(
    source: &[u8],
    offset: usize,
    max_len: usize,
) -> Result<Vec<u8>, CartpackError> {
    decode(source, offset, Some(max_len))
}

/// Bytes of `source` occupied by the block at `offset`.
pub fn compressed_len(source: &[u8], offset: usize) -> Result<usize, CartpackError> {
    probe_length(source, offset)
}

/// Compress `data` into a standalone, terminated block.
pub fn compress(data: &[u8], mode: Mode) -> Result<Vec<u8>, CartpackError> {
    compress_with(
        data,
        &Config {
            mode,
            ..Config::default()
        },
    )
}

/// Compress `data` using the strategy and search depth in `config`.
pub fn compress_with(data: &[u8], config: &Config) -> Result<Vec<u8>, CartpackError> {
    config.validate()?;
    let out = match config.mode {
        Mode::Fast => encode_fast_with_depth(data, config.search_depth)?,
        Mode::Optimal => encode_optimal(data, true)?,
    };
    debug!(mode = %config.mode, input = data.len(), output = out.len(), "compressed block");
    Ok(out)
}

/// Compress `data`, then compress the result again.
pub fn compress_twice(data: &[u8], mode: Mode) -> Result<Vec<u8>, CartpackError> {
    let inner = compress(data, mode)?;
    compress(&inner, mode)
}

/// Undo [`compress_twice`]: the outer pass is bounded to `inner_len` bytes,
/// the inner pass to `output_len`.
pub fn decompress_twice(
    source: &[u8],
    offset: usize,
    inner_len: usize,
    output_len: usize,
) -> Result<Vec<u8>, CartpackError> {
    let inner = decompress_bounded(source, offset, inner_len)?;
    decompress_bounded(&inner, 0, output_len)
}

/// Decompress a track map, stopping at exactly [`TRACK_MAP_LEN`] bytes.
pub fn decompress_track_map(source: &[u8], offset: usize) -> Result<Vec<u8>, CartpackError> {
    decompress_bounded(source, offset, TRACK_MAP_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("FAST".parse::<Mode>().unwrap(), Mode::Fast);
        assert_eq!("optimal".parse::<Mode>().unwrap(), Mode::Optimal);
        assert!(matches!("best".parse::<Mode>(), Err(CartpackError::Config(_))));
        assert_eq!(Mode::Fast.to_string(), "fast");
    }

    #[test]
    fn both_modes_round_trip() {
        let data: Vec<u8> = (0..300u16).map(|i| (i / 3) as u8).collect();
        for mode in [Mode::Fast, Mode::Optimal] {
            let packed = compress(&data, mode).unwrap();
            assert_eq!(compressed_len(&packed, 0).unwrap(), packed.len());
            assert_eq!(decompress(&packed, 0).unwrap(), data);
        }
    }

    #[test]
    fn compress_with_checks_config() {
        let shallow = Config {
            mode: Mode::Fast,
            search_depth: 1,
        };
        let data = b"abcdabcdXabcdabcd";
        let packed = compress_with(data, &shallow).unwrap();
        assert_eq!(decompress(&packed, 0).unwrap(), data);
        let broken = Config {
            search_depth: 0,
            ..shallow
        };
        assert!(matches!(
            compress_with(data, &broken),
            Err(CartpackError::Config(_))
        ));
    }

    #[test]
    fn track_map_is_bounded() {
        let mut map = vec![0x00u8; TRACK_MAP_LEN];
        map[TRACK_MAP_LEN - 1] = 0x7F;
        let mut packed = compress(&map, Mode::Optimal).unwrap();
        packed.pop();
        packed.extend([0x3F, 0x11]);
        let out = decompress_track_map(&packed, 0).unwrap();
        assert_eq!(out, map);
    }
}

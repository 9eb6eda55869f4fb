//! Segment statistics for a block or a plan.
//!
//! `SegmentStats` only counts; printing is left to the caller.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::decode::{SegmentReader, StreamEnd};
use crate::segment::{EncodingPlan, Opcode, Segment};
use crate::CartpackError;

/// Counts for a single opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpcodeTally {
    pub segments: u64,
    pub encoded_bytes: u64,
    pub decoded_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    pub by_opcode: BTreeMap<Opcode, OpcodeTally>,
    /// Serialized size, terminator included when one was read or requested.
    pub encoded_bytes: u64,
    pub decoded_bytes: u64,
    pub terminated: bool,
}

impl SegmentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, segment: &Segment) {
        let encoded = segment.encoded_len() as u64;
        let decoded = segment.count() as u64;
        let tally = self.by_opcode.entry(segment.opcode()).or_default();
        tally.segments += 1;
        tally.encoded_bytes += encoded;
        tally.decoded_bytes += decoded;
        self.encoded_bytes += encoded;
        self.decoded_bytes += decoded;
    }

    /// Statistics of a plan as it would be serialized.
    pub fn from_plan(plan: &EncodingPlan, terminate: bool) -> Self {
        let mut stats = Self::new();
        for segment in plan.segments() {
            stats.record(segment);
        }
        stats.terminated = terminate;
        stats.encoded_bytes = plan.encoded_len(terminate) as u64;
        stats
    }

    /// Statistics of the block at `offset`, walking it the way the decoder
    /// does.
    ///
    /// Counts are nominal: window copies are tallied at their full count even
    /// if decoding would stop early. `encoded_bytes` is the probed length.
    pub fn from_stream(source: &[u8], offset: usize) -> Result<Self, CartpackError> {
        let mut reader = SegmentReader::at(source, offset)?;
        let mut stats = Self::new();
        for segment in reader.by_ref() {
            stats.record(&segment);
        }
        stats.terminated = reader.end() == Some(StreamEnd::Terminator);
        stats.encoded_bytes = reader.consumed() as u64;
        Ok(stats)
    }

    pub fn segments(&self) -> u64 {
        self.by_opcode.values().map(|t| t.segments).sum()
    }

    /// Encoded size over decoded size, or `0.0` for an empty block.
    pub fn ratio(&self) -> f64 {
        if self.decoded_bytes == 0 {
            0.0
        } else {
            self.encoded_bytes as f64 / self.decoded_bytes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::TERMINATOR;

    #[test]
    fn stream_and_plan_agree() {
        let mut plan = EncodingPlan::new();
        plan.push_literal(b"xyz");
        plan.push(Segment::ByteFill { value: 0, count: 40 });
        plan.push(Segment::RelativeCopy { distance: 3, count: 3 });
        let bytes = plan.to_bytes(true).unwrap();

        let from_plan = SegmentStats::from_plan(&plan, true);
        let from_stream = SegmentStats::from_stream(&bytes, 0).unwrap();
        assert_eq!(from_plan, from_stream);
        assert_eq!(from_stream.segments(), 3);
        assert_eq!(from_stream.decoded_bytes, 46);
        assert_eq!(from_stream.encoded_bytes, bytes.len() as u64);
        assert_eq!(from_stream.by_opcode[&Opcode::ByteFill].encoded_bytes, 3);
        let expected = bytes.len() as f64 / 46.0;
        assert!((from_stream.ratio() - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_block_has_zero_ratio() {
        let stats = SegmentStats::from_stream(&[TERMINATOR], 0).unwrap();
        assert_eq!(stats.ratio(), 0.0);
        assert_eq!(stats.segments(), 0);
    }

    #[test]
    fn unterminated_stream_is_flagged() {
        let stats = SegmentStats::from_stream(&[0x22, 0x01], 0).unwrap();
        assert!(!stats.terminated);
        let stats = SegmentStats::from_stream(&[0x22, 0x01, TERMINATOR], 0).unwrap();
        assert!(stats.terminated);
        assert_eq!(stats.encoded_bytes, 3);
    }

    #[test]
    fn serializes_opcode_names() {
        let stats = SegmentStats::from_stream(&[0x61, 0x05, TERMINATOR], 0).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"increment_fill\""));
    }
}

//! Segment vocabulary shared by the decoder and both encoders.
//!
//! A compressed block is a sequence of segments followed by a terminator. Each
//! segment starts with a control byte using the following MSB-first layout:
//!
//! ```text
//! [opcode(3)][count(5)]
//! ```
//!
//! * **opcode** selects one of the six operations in [`Opcode`].
//! * **count** is the repeat count `1..=31`. The reserved value `0` means a
//!   second byte `e` follows and the count is `e + 32`, giving `32..=287`.
//!
//! The parameters follow the count: the raw bytes of a literal, one fill byte,
//! two pair bytes, one incrementing seed, or a little-endian 16-bit address or
//! distance for window copies. The control byte [`TERMINATOR`] ends the block.

use serde::{Deserialize, Serialize};

use crate::CartpackError;

/// Largest count stored directly in the control byte.
pub const INLINE_MAX: usize = 0x1F;
/// Largest count any single segment can carry.
pub const MAX_COUNT: usize = INLINE_MAX + 1 + 0xFF;
/// Control byte ending a compressed block.
pub const TERMINATOR: u8 = 0xFF;

const OPCODE_SHIFT: u8 = 5;
const COUNT_MASK: u8 = 0x1F;

/// Operation selected by the top three bits of a control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Opcode {
    Literal = 0,
    ByteFill = 1,
    PairFill = 2,
    IncrementFill = 3,
    AbsoluteCopy = 4,
    RelativeCopy = 5,
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Opcode::Literal,
        Opcode::ByteFill,
        Opcode::PairFill,
        Opcode::IncrementFill,
        Opcode::AbsoluteCopy,
        Opcode::RelativeCopy,
    ];

    /// Map the three opcode bits to an operation. `6` and `7` are reserved.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Opcode::Literal),
            1 => Some(Opcode::ByteFill),
            2 => Some(Opcode::PairFill),
            3 => Some(Opcode::IncrementFill),
            4 => Some(Opcode::AbsoluteCopy),
            5 => Some(Opcode::RelativeCopy),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Number of parameter bytes following the count for `count` output bytes.
    pub fn param_len(self, count: usize) -> usize {
        match self {
            Opcode::Literal => count,
            Opcode::ByteFill | Opcode::IncrementFill => 1,
            Opcode::PairFill | Opcode::AbsoluteCopy | Opcode::RelativeCopy => 2,
        }
    }
}

/// Bytes used by the control byte plus the optional extended count.
pub fn header_len(count: usize) -> usize {
    if count > INLINE_MAX {
        2
    } else {
        1
    }
}

/// Exact serialized size of a segment with the given opcode and count.
pub fn segment_cost(opcode: Opcode, count: usize) -> usize {
    header_len(count) + opcode.param_len(count)
}

/// Split a control byte into its opcode bits and inline count.
pub fn split_control(control: u8) -> (u8, u8) {
    (control >> OPCODE_SHIFT, control & COUNT_MASK)
}

/// Count carried by an extended-count byte.
pub fn extended_count(byte: u8) -> usize {
    byte as usize + INLINE_MAX + 1
}

/// One decoded unit of the compressed grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Raw bytes copied verbatim.
    Literal(&'a [u8]),
    /// One byte repeated `count` times.
    ByteFill { value: u8, count: usize },
    /// Two bytes alternating for `count` total bytes.
    PairFill { pair: [u8; 2], count: usize },
    /// `seed`, `seed + 1`, ... modulo 256 for `count` bytes.
    IncrementFill { seed: u8, count: usize },
    /// Copy from an absolute position of the decompressed output.
    AbsoluteCopy { address: u16, count: usize },
    /// Copy from `distance` bytes behind the write cursor.
    RelativeCopy { distance: u16, count: usize },
}

impl<'a> Segment<'a> {
    pub fn opcode(&self) -> Opcode {
        match self {
            Segment::Literal(_) => Opcode::Literal,
            Segment::ByteFill { .. } => Opcode::ByteFill,
            Segment::PairFill { .. } => Opcode::PairFill,
            Segment::IncrementFill { .. } => Opcode::IncrementFill,
            Segment::AbsoluteCopy { .. } => Opcode::AbsoluteCopy,
            Segment::RelativeCopy { .. } => Opcode::RelativeCopy,
        }
    }

    /// Number of decompressed bytes this segment produces.
    pub fn count(&self) -> usize {
        match *self {
            Segment::Literal(bytes) => bytes.len(),
            Segment::ByteFill { count, .. }
            | Segment::PairFill { count, .. }
            | Segment::IncrementFill { count, .. }
            | Segment::AbsoluteCopy { count, .. }
            | Segment::RelativeCopy { count, .. } => count,
        }
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        segment_cost(self.opcode(), self.count())
    }

    /// Append the wire form of this segment to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), CartpackError> {
        let opcode = self.opcode();
        let count = self.count();
        if count == 0 || count > MAX_COUNT {
            return Err(CartpackError::InvalidCount { opcode, count });
        }
        if matches!(self, Segment::RelativeCopy { distance: 0, .. }) {
            return Err(CartpackError::InvalidSegment(
                "relative copy distance must be at least 1".into(),
            ));
        }
        let bits = opcode.bits() << OPCODE_SHIFT;
        if count > INLINE_MAX {
            out.push(bits);
            out.push((count - INLINE_MAX - 1) as u8);
        } else {
            out.push(bits | count as u8);
        }
        match *self {
            Segment::Literal(bytes) => out.extend_from_slice(bytes),
            Segment::ByteFill { value, .. } => out.push(value),
            Segment::PairFill { pair, .. } => out.extend_from_slice(&pair),
            Segment::IncrementFill { seed, .. } => out.push(seed),
            Segment::AbsoluteCopy { address, .. } => out.extend_from_slice(&address.to_le_bytes()),
            Segment::RelativeCopy { distance, .. } => {
                out.extend_from_slice(&distance.to_le_bytes())
            }
        }
        Ok(())
    }
}

/// Ordered segments covering an input exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingPlan<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> EncodingPlan<'a> {
    pub fn new() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    /// Push `bytes` as literal segments of at most [`MAX_COUNT`] bytes each.
    pub fn push_literal(&mut self, bytes: &'a [u8]) {
        for chunk in bytes.chunks(MAX_COUNT) {
            self.segments.push(Segment::Literal(chunk));
        }
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total decompressed length described by the plan.
    pub fn decoded_len(&self) -> usize {
        self.segments.iter().map(Segment::count).sum()
    }

    /// Serialized length, counting the terminator when `terminate` is set.
    pub fn encoded_len(&self, terminate: bool) -> usize {
        let body: usize = self.segments.iter().map(Segment::encoded_len).sum();
        body + terminate as usize
    }

    /// Serialize every segment, optionally followed by [`TERMINATOR`].
    pub fn to_bytes(&self, terminate: bool) -> Result<Vec<u8>, CartpackError> {
        let mut out = Vec::with_capacity(self.encoded_len(terminate));
        for segment in &self.segments {
            segment.encode(&mut out)?;
        }
        if terminate {
            out.push(TERMINATOR);
        }
        Ok(out)
    }
}

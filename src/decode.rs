//! Decoder and length probe.
//!
//! Both walk the same control-byte grammar through [`SegmentReader`], so the
//! number of bytes the probe reports is always the number the decoder reads.

use tracing::debug;

use crate::segment::{extended_count, split_control, Opcode, Segment, TERMINATOR};
use crate::stream::{CompressedStream, OutputBuffer};
use crate::CartpackError;

/// Why a [`SegmentReader`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The `0xFF` control byte.
    Terminator,
    /// A control byte using a reserved opcode.
    Reserved(u8),
    /// The input ran out before a terminator.
    Exhausted,
}

/// Iterator over the segments of a compressed block.
///
/// Truncated trailing segments are yielded with whatever parameters were
/// present (a shortened literal) or dropped when nothing usable remains.
#[derive(Debug, Clone)]
pub struct SegmentReader<'a> {
    stream: CompressedStream<'a>,
    end: Option<StreamEnd>,
}

impl<'a> SegmentReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            stream: CompressedStream::from_slice(data),
            end: None,
        }
    }

    pub fn at(source: &'a [u8], offset: usize) -> Result<Self, CartpackError> {
        Ok(Self {
            stream: CompressedStream::at(source, offset)?,
            end: None,
        })
    }

    /// Stream bytes consumed so far, terminator included once reached.
    pub fn consumed(&self) -> usize {
        self.stream.position()
    }

    /// Set once iteration has finished.
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }

    fn read_segment(&mut self) -> Result<Segment<'a>, StreamEnd> {
        let control = self.stream.read_u8().ok_or(StreamEnd::Exhausted)?;
        if control == TERMINATOR {
            return Err(StreamEnd::Terminator);
        }
        let (bits, inline) = split_control(control);
        let opcode = Opcode::from_bits(bits).ok_or(StreamEnd::Reserved(control))?;
        let count = if inline == 0 {
            extended_count(self.stream.read_u8().ok_or(StreamEnd::Exhausted)?)
        } else {
            inline as usize
        };
        let exhausted = StreamEnd::Exhausted;
        let segment = match opcode {
            Opcode::Literal => {
                let bytes = self.stream.read_slice(count);
                if bytes.is_empty() {
                    return Err(exhausted);
                }
                Segment::Literal(bytes)
            }
            Opcode::ByteFill => Segment::ByteFill {
                value: self.stream.read_u8().ok_or(exhausted)?,
                count,
            },
            Opcode::PairFill => Segment::PairFill {
                pair: self.stream.read_array::<2>().ok_or(exhausted)?,
                count,
            },
            Opcode::IncrementFill => Segment::IncrementFill {
                seed: self.stream.read_u8().ok_or(exhausted)?,
                count,
            },
            Opcode::AbsoluteCopy => Segment::AbsoluteCopy {
                address: self.stream.read_u16_le().ok_or(exhausted)?,
                count,
            },
            Opcode::RelativeCopy => Segment::RelativeCopy {
                distance: self.stream.read_u16_le().ok_or(exhausted)?,
                count,
            },
        };
        Ok(segment)
    }
}

impl<'a> Iterator for SegmentReader<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }
        match self.read_segment() {
            Ok(segment) => Some(segment),
            Err(end) => {
                self.end = Some(end);
                None
            }
        }
    }
}

/// Materialize one segment into `out`, stopping early if `out` fills up.
pub fn apply_segment(segment: &Segment, out: &mut OutputBuffer) {
    match *segment {
        Segment::Literal(bytes) => out.extend(bytes),
        Segment::ByteFill { value, count } => {
            for _ in 0..count {
                if !out.push(value) {
                    break;
                }
            }
        }
        Segment::PairFill { pair, count } => {
            for k in 0..count {
                if !out.push(pair[k & 1]) {
                    break;
                }
            }
        }
        Segment::IncrementFill { seed, count } => {
            for k in 0..count {
                if !out.push(seed.wrapping_add(k as u8)) {
                    break;
                }
            }
        }
        Segment::AbsoluteCopy { address, count } => out.copy_window(address as isize, count),
        Segment::RelativeCopy { distance, count } => {
            let start = out.len() as isize - distance as isize;
            out.copy_window(start, count)
        }
    }
}

/// Decompress the block starting at `offset` of `source`.
///
/// With `limit` set, decoding stops as soon as that many bytes exist. Corrupt
/// window copies read [`FILLER`](crate::FILLER) instead of failing;
/// the only error is an `offset` past the end of `source`.
pub fn decode(source: &[u8], offset: usize, limit: Option<usize>) -> Result<Vec<u8>, CartpackError> {
    let mut reader = SegmentReader::at(source, offset)?;
    let mut out = match limit {
        Some(cap) => OutputBuffer::bounded(cap),
        None => OutputBuffer::new(),
    };
    while !out.is_full() {
        let Some(segment) = reader.next() else {
            break;
        };
        apply_segment(&segment, &mut out);
    }
    if out.filler_reads() > 0 {
        debug!(
            offset,
            filler_reads = out.filler_reads(),
            "window copy referenced unwritten output"
        );
    }
    Ok(out.into_vec())
}

/// Number of bytes the block at `offset` occupies, terminator included.
pub fn probe_length(source: &[u8], offset: usize) -> Result<usize, CartpackError> {
    let mut reader = SegmentReader::at(source, offset)?;
    for _ in reader.by_ref() {}
    Ok(reader.consumed())
}

//! Byte cursors used by the decoder.
//!
//! [`CompressedStream`] never reads past the end of its slice and
//! [`OutputBuffer`] never writes past its capacity; both report exhaustion
//! instead of panicking so corrupt blocks decode deterministically.

use crate::CartpackError;

/// Value read from output positions that have not been written yet.
pub const FILLER: u8 = 0x00;

/// Read cursor over a compressed block.
#[derive(Debug, Clone)]
pub struct CompressedStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CompressedStream<'a> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading `source` at `offset`.
    pub fn at(source: &'a [u8], offset: usize) -> Result<Self, CartpackError> {
        if offset > source.len() {
            return Err(CartpackError::OffsetOutOfRange {
                offset,
                len: source.len(),
            });
        }
        Ok(Self::from_slice(&source[offset..]))
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read a little-endian word. A lone trailing byte is consumed and `None`
    /// returned.
    pub fn read_u16_le(&mut self) -> Option<u16> {
        let pair = self.read_array::<2>()?;
        Some(u16::from_le_bytes(pair))
    }

    /// Read exactly `N` bytes, or consume the rest of the stream and return
    /// `None` when fewer are left.
    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            self.pos = self.data.len();
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Some(out)
    }

    /// Read up to `n` bytes; shorter only at the end of the stream.
    pub fn read_slice(&mut self, n: usize) -> &'a [u8] {
        let end = self.pos + n.min(self.remaining());
        let slice = &self.data[self.pos..end];
        self.pos = end;
        slice
    }
}

/// Decompressed output with an optional hard capacity.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    capacity: Option<usize>,
    filler_reads: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output that refuses writes once `capacity` bytes exist.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            filler_reads: 0,
        }
    }

    /// Write cursor.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.bytes.len() >= cap)
    }

    /// Number of reads that fell outside the written output.
    pub fn filler_reads(&self) -> usize {
        self.filler_reads
    }

    /// Append one byte. Returns `false` once the capacity is reached.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.bytes.push(byte);
        true
    }

    /// Append bytes until the slice or the capacity runs out.
    pub fn extend(&mut self, bytes: &[u8]) {
        let room = match self.capacity {
            Some(cap) => cap.saturating_sub(self.bytes.len()),
            None => bytes.len(),
        };
        self.bytes.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }

    /// Byte at `pos`, or [`FILLER`] if that position is unwritten.
    pub fn read(&mut self, pos: isize) -> u8 {
        match usize::try_from(pos).ok().and_then(|p| self.bytes.get(p)) {
            Some(&byte) => byte,
            None => {
                self.filler_reads += 1;
                FILLER
            }
        }
    }

    /// Copy `count` bytes one at a time starting at `start`, so a source that
    /// overlaps the bytes being written repeats them.
    pub fn copy_window(&mut self, start: isize, count: usize) {
        for k in 0..count {
            let byte = self.read(start + k as isize);
            if !self.push(byte) {
                break;
            }
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

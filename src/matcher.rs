//! Hash-chain index of earlier input positions.
//!
//! Window copies reproduce bytes the decoder has already written, and those
//! bytes are exactly the input bytes before the current position. Positions
//! are chained by a hash of their first [`MIN_MATCH`] bytes:
//!
//! 1. `head` maps a hash to the most recent position with that hash
//! 2. `prev` links each position to the previous one with the same hash
//! 3. a search walks the chain from newest to oldest, verifying each match
//!
//! An unlimited walk finds the longest match but can be quadratic on long
//! repeats. The greedy encoder caps the walk depth; the optimal encoder uses
//! [`SuffixIndex`](crate::SuffixIndex) instead.

use crate::segment::MAX_COUNT;

/// Shortest match worth reporting. A two byte copy never beats a literal.
pub const MIN_MATCH: usize = 3;
/// Largest backward distance a relative copy can encode.
pub const MAX_DISTANCE: usize = u16::MAX as usize;
/// Largest output position an absolute copy can encode.
pub const MAX_ADDRESS: usize = u16::MAX as usize;

const HASH_BITS: u32 = 15;
const NIL: u32 = u32::MAX;

#[inline(always)]
fn hash3(data: &[u8], pos: usize) -> usize {
    let key = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], 0]);
    (key.wrapping_mul(2654435761) >> (32 - HASH_BITS)) as usize
}

/// Number of equal bytes at `earlier` and `pos`, at most `limit`.
#[inline]
fn count_match(data: &[u8], earlier: usize, pos: usize, limit: usize) -> usize {
    data[pos..]
        .iter()
        .zip(&data[earlier..])
        .take(limit)
        .take_while(|(a, b)| a == b)
        .count()
}

/// A run of input that repeats bytes starting at `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMatch {
    pub source: usize,
    pub len: usize,
}

/// Longest matches usable by each window-copy opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCandidates {
    /// Source within [`MAX_DISTANCE`] bytes behind the position.
    pub relative: Option<WindowMatch>,
    /// Source at an address no larger than [`MAX_ADDRESS`].
    pub absolute: Option<WindowMatch>,
}

fn longer(current: Option<WindowMatch>, len: usize) -> bool {
    current.map_or(true, |m| len > m.len)
}

/// Incremental hash-chain index over one input.
#[derive(Debug, Clone)]
pub struct MatchFinder<'a> {
    data: &'a [u8],
    head: Vec<u32>,
    prev: Vec<u32>,
    inserted: usize,
    max_depth: Option<usize>,
}

impl<'a> MatchFinder<'a> {
    /// Index that walks whole chains, so every reported match is the longest.
    pub fn exhaustive(data: &'a [u8]) -> Self {
        Self {
            data,
            head: vec![NIL; 1 << HASH_BITS],
            prev: vec![NIL; data.len()],
            inserted: 0,
            max_depth: None,
        }
    }

    /// Index that inspects at most `depth` chain entries per search.
    pub fn with_depth(data: &'a [u8], depth: usize) -> Self {
        Self {
            max_depth: Some(depth.max(1)),
            ..Self::exhaustive(data)
        }
    }

    /// Index every position before `pos`.
    fn insert_until(&mut self, pos: usize) {
        let last = self.data.len().saturating_sub(MIN_MATCH - 1);
        while self.inserted < pos.min(last) {
            let p = self.inserted;
            let h = hash3(self.data, p);
            self.prev[p] = self.head[h];
            self.head[h] = p as u32;
            self.inserted += 1;
        }
    }

    /// Longest earlier occurrences of the bytes at `pos`, capped at
    /// [`MAX_COUNT`] and the end of input.
    ///
    /// Searches must be issued with non-decreasing `pos`.
    pub fn find(&mut self, pos: usize) -> MatchCandidates {
        self.insert_until(pos);
        let mut found = MatchCandidates::default();
        let limit = (self.data.len() - pos.min(self.data.len())).min(MAX_COUNT);
        if limit < MIN_MATCH {
            return found;
        }

        let mut cursor = self.head[hash3(self.data, pos)];
        let mut steps = 0usize;
        while cursor != NIL {
            if self.max_depth.is_some_and(|depth| steps >= depth) {
                break;
            }
            steps += 1;
            let earlier = cursor as usize;
            let in_reach = pos - earlier <= MAX_DISTANCE;
            let len = count_match(self.data, earlier, pos, limit);
            if len >= MIN_MATCH {
                let m = WindowMatch { source: earlier, len };
                if in_reach && longer(found.relative, len) {
                    found.relative = Some(m);
                }
                if earlier <= MAX_ADDRESS && longer(found.absolute, len) {
                    found.absolute = Some(m);
                }
            }
            let relative_done = !in_reach || found.relative.is_some_and(|m| m.len == limit);
            let absolute_done = found.absolute.is_some_and(|m| m.len == limit);
            if relative_done && absolute_done {
                break;
            }
            cursor = self.prev[earlier];
        }
        found
    }
}

//! Exact longest-match index over a suffix array.
//!
//! Two suffixes share a prefix exactly as long as the smallest LCP entry
//! between their ranks. Among any set of earlier positions, the longest match
//! for a suffix therefore sits at its nearest neighbour in rank order on one
//! side or the other. A search is two ordered-set lookups and two range
//! minimum queries, independent of how often a prefix repeats.

use std::collections::BTreeSet;

use crate::matcher::{MatchCandidates, WindowMatch, MAX_ADDRESS, MAX_DISTANCE, MIN_MATCH};
use crate::segment::MAX_COUNT;

fn inverse(sa: &[i32]) -> Vec<u32> {
    let mut rank = vec![0u32; sa.len()];
    for (r, &pos) in sa.iter().enumerate() {
        rank[pos as usize] = r as u32;
    }
    rank
}

/// `lcp[r]` is the common prefix length of the suffixes ranked `r - 1` and
/// `r`, built in linear time by walking suffixes in text order.
fn lcp_array(data: &[u8], sa: &[i32], rank: &[u32]) -> Vec<u32> {
    let mut lcp = vec![0u32; data.len()];
    let mut len = 0usize;
    for (pos, &r) in rank.iter().enumerate() {
        if r == 0 {
            len = 0;
            continue;
        }
        let prev = sa[r as usize - 1] as usize;
        len += data[pos + len..]
            .iter()
            .zip(&data[prev + len..])
            .take_while(|(a, b)| a == b)
            .count();
        lcp[r as usize] = len as u32;
        len = len.saturating_sub(1);
    }
    lcp
}

/// Sparse table answering minimum queries over a fixed array.
#[derive(Debug, Clone)]
struct RangeMin {
    levels: Vec<Vec<u32>>,
}

impl RangeMin {
    fn new(values: Vec<u32>) -> Self {
        let n = values.len();
        let mut levels = vec![values];
        let mut width = 1;
        while width * 2 <= n {
            let next: Vec<u32> = {
                let prev = &levels[levels.len() - 1];
                (0..prev.len() - width)
                    .map(|i| prev[i].min(prev[i + width]))
                    .collect()
            };
            levels.push(next);
            width *= 2;
        }
        Self { levels }
    }

    /// Minimum of `values[lo..=hi]`.
    fn min(&self, lo: usize, hi: usize) -> u32 {
        let span = hi - lo + 1;
        let k = (usize::BITS - 1 - span.leading_zeros()) as usize;
        let level = &self.levels[k];
        level[lo].min(level[hi + 1 - (1 << k)])
    }
}

/// Incremental exact match index over one input.
///
/// Like [`MatchFinder`](crate::MatchFinder), searches must be issued with
/// non-decreasing positions; every earlier position is visible to a search.
#[derive(Debug, Clone)]
pub struct SuffixIndex<'a> {
    data: &'a [u8],
    sa: Vec<i32>,
    rank: Vec<u32>,
    lcp: RangeMin,
    /// Ranks of positions within relative reach.
    window: BTreeSet<u32>,
    /// Ranks of positions an absolute address can name.
    addressable: BTreeSet<u32>,
    inserted: usize,
    evicted: usize,
}

impl<'a> SuffixIndex<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let mut sa = vec![0i32; data.len()];
        if !data.is_empty() {
            divsufsort::sort_in_place(data, &mut sa);
        }
        let rank = inverse(&sa);
        let lcp = RangeMin::new(lcp_array(data, &sa, &rank));
        Self {
            data,
            sa,
            rank,
            lcp,
            window: BTreeSet::new(),
            addressable: BTreeSet::new(),
            inserted: 0,
            evicted: 0,
        }
    }

    fn advance_to(&mut self, pos: usize) {
        while self.inserted < pos.min(self.data.len()) {
            let r = self.rank[self.inserted];
            self.window.insert(r);
            if self.inserted <= MAX_ADDRESS {
                self.addressable.insert(r);
            }
            self.inserted += 1;
        }
        while self.evicted < self.inserted && self.evicted + MAX_DISTANCE < pos {
            self.window.remove(&self.rank[self.evicted]);
            self.evicted += 1;
        }
    }

    /// Length of the common prefix of the suffixes ranked `a` and `b`.
    fn common_prefix(&self, a: u32, b: u32) -> usize {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.lcp.min(lo as usize + 1, hi as usize) as usize
    }

    fn longest_in(&self, set: &BTreeSet<u32>, rank: u32, limit: usize) -> Option<WindowMatch> {
        let below = set.range(..rank).next_back();
        let above = set.range(rank + 1..).next();
        below
            .into_iter()
            .chain(above)
            .map(|&other| WindowMatch {
                source: self.sa[other as usize] as usize,
                len: self.common_prefix(other, rank).min(limit),
            })
            .filter(|m| m.len >= MIN_MATCH)
            .fold(None, |best: Option<WindowMatch>, m| match best {
                Some(b) if b.len > m.len || (b.len == m.len && b.source > m.source) => Some(b),
                _ => Some(m),
            })
    }

    /// Longest earlier occurrences of the bytes at `pos`, capped at
    /// [`MAX_COUNT`] and the end of input. Ties go to the nearer source.
    pub fn find(&mut self, pos: usize) -> MatchCandidates {
        self.advance_to(pos);
        let limit = (self.data.len() - pos.min(self.data.len())).min(MAX_COUNT);
        if limit < MIN_MATCH {
            return MatchCandidates::default();
        }
        let rank = self.rank[pos];
        MatchCandidates {
            relative: self.longest_in(&self.window, rank, limit),
            absolute: self.longest_in(&self.addressable, rank, limit),
        }
    }
}

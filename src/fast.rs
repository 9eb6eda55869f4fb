//! Greedy single-pass encoder.
//!
//! At every position the encoder measures each fill pattern and the best
//! window match it can find within a bounded chain walk, then commits to the
//! candidate with the lowest serialized cost per decoded byte. Positions where
//! no candidate beats copying raw bytes join a pending literal run. Choices
//! are never revisited.

use tracing::{debug, trace};

use crate::config::DEFAULT_SEARCH_DEPTH;
use crate::matcher::MatchFinder;
use crate::segment::{EncodingPlan, Segment, MAX_COUNT};
use crate::CartpackError;

fn run_while(data: &[u8], pos: usize, holds: impl Fn(usize) -> bool) -> usize {
    let end = data.len().min(pos + MAX_COUNT);
    (pos + 1..end).take_while(|&k| holds(k)).count() + 1
}

fn byte_run(data: &[u8], pos: usize) -> usize {
    run_while(data, pos, |k| data[k] == data[pos])
}

fn pair_run(data: &[u8], pos: usize) -> usize {
    run_while(data, pos, |k| k < pos + 2 || data[k] == data[k - 2])
}

fn increment_run(data: &[u8], pos: usize) -> usize {
    run_while(data, pos, |k| data[k] == data[pos].wrapping_add((k - pos) as u8))
}

/// `a` costs less per decoded byte than `b`; the longer one wins a tie.
fn cheaper(a: &Segment, b: &Segment) -> bool {
    let (a_len, a_cost) = (a.count(), a.encoded_len());
    let (b_len, b_cost) = (b.count(), b.encoded_len());
    let lhs = a_cost * b_len;
    let rhs = b_cost * a_len;
    lhs < rhs || (lhs == rhs && a_len > b_len)
}

fn best_candidate<'a>(data: &'a [u8], pos: usize, finder: &mut MatchFinder) -> Option<Segment<'a>> {
    let value = data[pos];
    let byte = byte_run(data, pos);
    let pair = pair_run(data, pos);
    let second = data.get(pos + 1).copied().unwrap_or(value);
    let increment = increment_run(data, pos);
    let found = finder.find(pos);

    let mut candidates = vec![
        Segment::ByteFill { value, count: byte },
        Segment::PairFill { pair: [value, second], count: pair },
        Segment::IncrementFill { seed: value, count: increment },
    ];
    if let Some(m) = found.relative {
        candidates.push(Segment::RelativeCopy {
            distance: (pos - m.source) as u16,
            count: m.len,
        });
    }
    if let Some(m) = found.absolute {
        candidates.push(Segment::AbsoluteCopy {
            address: m.source as u16,
            count: m.len,
        });
    }

    candidates
        .into_iter()
        .filter(|s| s.count() > s.encoded_len())
        .fold(None, |best: Option<Segment<'a>>, s| match best {
            Some(b) if !cheaper(&s, &b) => Some(b),
            _ => Some(s),
        })
}

/// Greedy segmentation of `data`, walking at most `depth` chain entries per
/// match search.
pub fn plan_fast(data: &[u8], depth: usize) -> EncodingPlan<'_> {
    let mut plan = EncodingPlan::new();
    let mut finder = MatchFinder::with_depth(data, depth);
    let mut pos = 0;
    let mut literal_start = 0;
    while pos < data.len() {
        match best_candidate(data, pos, &mut finder) {
            Some(segment) => {
                plan.push_literal(&data[literal_start..pos]);
                trace!(pos, ?segment, "greedy segment");
                pos += segment.count();
                plan.push(segment);
                literal_start = pos;
            }
            None => pos += 1,
        }
    }
    plan.push_literal(&data[literal_start..]);
    plan
}

/// Compress `data` with the greedy strategy, terminator included.
pub fn encode_fast(data: &[u8]) -> Result<Vec<u8>, CartpackError> {
    encode_fast_with_depth(data, DEFAULT_SEARCH_DEPTH)
}

/// [`encode_fast`] with an explicit match search depth.
pub fn encode_fast_with_depth(data: &[u8], depth: usize) -> Result<Vec<u8>, CartpackError> {
    if data.is_empty() {
        return Err(CartpackError::EmptyInput);
    }
    let plan = plan_fast(data, depth);
    let out = plan.to_bytes(true)?;
    debug!(
        input = data.len(),
        output = out.len(),
        segments = plan.len(),
        "greedy encode"
    );
    Ok(out)
}

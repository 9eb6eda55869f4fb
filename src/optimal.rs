//! Minimal-length encoder.
//!
//! Compression is treated as a shortest path over input positions `0..=n`.
//! An edge `i -> i + len` exists for every segment that can reproduce
//! `data[i..i + len]`, weighted by its serialized size. Because edges only
//! point forward the graph is acyclic and one backward sweep solves it:
//!
//! ```text
//! best[n] = 0
//! best[i] = min over segments s at i of cost(s) + best[i + len(s)]
//! ```
//!
//! Candidate lengths are every length of every fill run, every length of the
//! longest relative and absolute window match, and every literal length up to
//! [`MAX_COUNT`]. Matches come from a [`SuffixIndex`], which sees every
//! earlier position, so the result is minimal for this segment grammar.
//!
//! Ties keep the first candidate examined: literals from shortest to longest,
//! then window copies, then fills, both from longest to shortest.

use tracing::debug;

use crate::matcher::{MatchCandidates, MIN_MATCH};
use crate::segment::{segment_cost, EncodingPlan, Opcode, Segment, MAX_COUNT};
use crate::suffix::SuffixIndex;
use crate::CartpackError;

/// Length of each fill pattern starting at every position, uncapped.
#[derive(Debug, Clone)]
struct FillRuns {
    byte: Vec<usize>,
    pair: Vec<usize>,
    increment: Vec<usize>,
}

impl FillRuns {
    fn scan(data: &[u8]) -> Self {
        let n = data.len();
        let mut byte = vec![1; n];
        let mut pair = vec![1; n];
        let mut increment = vec![1; n];
        for i in (0..n).rev() {
            if i + 1 < n {
                if data[i + 1] == data[i] {
                    byte[i] = byte[i + 1] + 1;
                }
                if data[i + 1] == data[i].wrapping_add(1) {
                    increment[i] = increment[i + 1] + 1;
                }
            }
            pair[i] = if i + 2 < n && data[i + 2] == data[i] {
                pair[i + 1] + 1
            } else {
                (n - i).min(2)
            };
        }
        Self {
            byte,
            pair,
            increment,
        }
    }
}

/// Edge chosen out of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Literal,
    ByteFill,
    PairFill,
    IncrementFill,
    Absolute(usize),
    Relative(usize),
}

impl Step {
    fn opcode(self) -> Opcode {
        match self {
            Step::Literal => Opcode::Literal,
            Step::ByteFill => Opcode::ByteFill,
            Step::PairFill => Opcode::PairFill,
            Step::IncrementFill => Opcode::IncrementFill,
            Step::Absolute(_) => Opcode::AbsoluteCopy,
            Step::Relative(_) => Opcode::RelativeCopy,
        }
    }

    fn segment(self, data: &[u8], pos: usize, len: usize) -> Segment<'_> {
        let value = data[pos];
        match self {
            Step::Literal => Segment::Literal(&data[pos..pos + len]),
            Step::ByteFill => Segment::ByteFill { value, count: len },
            Step::PairFill => Segment::PairFill {
                pair: [value, data.get(pos + 1).copied().unwrap_or(value)],
                count: len,
            },
            Step::IncrementFill => Segment::IncrementFill { seed: value, count: len },
            Step::Absolute(source) => Segment::AbsoluteCopy {
                address: source as u16,
                count: len,
            },
            Step::Relative(source) => Segment::RelativeCopy {
                distance: (pos - source) as u16,
                count: len,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    cost: usize,
    step: Step,
    len: usize,
}

/// Cheapest edge out of one position given the solved suffix costs.
struct Relaxation<'b> {
    best: &'b [usize],
    pos: usize,
    edge: Edge,
}

impl Relaxation<'_> {
    fn cost(&self, step: Step, len: usize) -> usize {
        segment_cost(step.opcode(), len) + self.best[self.pos + len]
    }

    fn offer(&mut self, step: Step, len: usize) {
        let cost = self.cost(step, len);
        if cost < self.edge.cost {
            self.edge = Edge { cost, step, len };
        }
    }

    fn offer_down_to(&mut self, step: Step, longest: usize, shortest: usize) {
        for len in (shortest..=longest.min(MAX_COUNT)).rev() {
            self.offer(step, len);
        }
    }
}

fn relax(
    data: &[u8],
    pos: usize,
    best: &[usize],
    runs: &FillRuns,
    matches: &MatchCandidates,
) -> Edge {
    let single = segment_cost(Opcode::Literal, 1) + best[pos + 1];
    let mut r = Relaxation {
        best,
        pos,
        edge: Edge {
            cost: single,
            step: Step::Literal,
            len: 1,
        },
    };
    for len in 2..=(data.len() - pos).min(MAX_COUNT) {
        r.offer(Step::Literal, len);
    }
    if let Some(m) = matches.relative {
        r.offer_down_to(Step::Relative(m.source), m.len, MIN_MATCH);
    }
    if let Some(m) = matches.absolute {
        r.offer_down_to(Step::Absolute(m.source), m.len, MIN_MATCH);
    }
    r.offer_down_to(Step::ByteFill, runs.byte[pos], 1);
    r.offer_down_to(Step::PairFill, runs.pair[pos], 1);
    r.offer_down_to(Step::IncrementFill, runs.increment[pos], 1);
    r.edge
}

/// Minimal-cost segmentation of `data`.
pub fn plan_optimal(data: &[u8]) -> EncodingPlan<'_> {
    let n = data.len();
    let runs = FillRuns::scan(data);
    let mut index = SuffixIndex::new(data);
    let matches: Vec<MatchCandidates> = (0..n).map(|pos| index.find(pos)).collect();

    let mut best = vec![0usize; n + 1];
    let mut chosen: Vec<Option<Edge>> = vec![None; n];
    for pos in (0..n).rev() {
        let edge = relax(data, pos, &best, &runs, &matches[pos]);
        best[pos] = edge.cost;
        chosen[pos] = Some(edge);
    }

    let mut plan = EncodingPlan::new();
    let mut pos = 0;
    while let Some(Some(edge)) = chosen.get(pos) {
        plan.push(edge.step.segment(data, pos, edge.len));
        pos += edge.len;
    }
    plan
}

/// Compress `data` to its minimal encoding, appending the terminator when
/// `terminate` is set.
pub fn encode_optimal(data: &[u8], terminate: bool) -> Result<Vec<u8>, CartpackError> {
    if data.is_empty() {
        return Err(CartpackError::EmptyInput);
    }
    let plan = plan_optimal(data);
    let out = plan.to_bytes(terminate)?;
    debug!(
        input = data.len(),
        output = out.len(),
        segments = plan.len(),
        terminate,
        "optimal encode"
    );
    Ok(out)
}

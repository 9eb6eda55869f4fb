use cartpack::{
    decompress, segment_cost, EncodingPlan, Opcode, Segment, SegmentReader, MAX_COUNT,
};
use quickcheck::quickcheck;

fn clamp(count: u16) -> usize {
    (count as usize % MAX_COUNT) + 1
}

quickcheck! {
    fn fill_cost_is_exact(value: u8, count: u16) -> bool {
        let count = clamp(count);
        let segment = Segment::ByteFill { value, count };
        let mut out = Vec::new();
        segment.encode(&mut out).is_ok() && out.len() == segment_cost(Opcode::ByteFill, count)
    }

    fn reader_returns_encoded_segment(pair: (u8, u8), count: u16, distance: u16) -> bool {
        let count = clamp(count);
        let distance = distance.max(1);
        let segments = [
            Segment::PairFill { pair: [pair.0, pair.1], count },
            Segment::IncrementFill { seed: pair.0, count },
            Segment::AbsoluteCopy { address: distance, count },
            Segment::RelativeCopy { distance, count },
        ];
        let mut plan = EncodingPlan::new();
        for segment in segments {
            plan.push(segment);
        }
        let bytes = plan.to_bytes(true).unwrap();
        let mut reader = SegmentReader::new(&bytes);
        let read: Vec<Segment> = reader.by_ref().collect();
        read == segments && reader.consumed() == bytes.len()
    }

    fn pair_fill_alternates(a: u8, b: u8, count: u16) -> bool {
        let count = clamp(count);
        let mut plan = EncodingPlan::new();
        plan.push(Segment::PairFill { pair: [a, b], count });
        let out = decompress(&plan.to_bytes(true).unwrap(), 0).unwrap();
        out.len() == count && out.iter().enumerate().all(|(i, &v)| v == if i % 2 == 0 { a } else { b })
    }

    fn literals_survive_any_bytes(bytes: Vec<u8>) -> bool {
        let mut plan = EncodingPlan::new();
        plan.push_literal(&bytes);
        let encoded = plan.to_bytes(true).unwrap();
        decompress(&encoded, 0).unwrap() == bytes
    }
}

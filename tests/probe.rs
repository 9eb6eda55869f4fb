use cartpack::{compress, compressed_len, decompress, decompress_bounded, Mode, SegmentStats};
use proptest::prelude::*;

proptest! {
    #[test]
    fn probe_matches_encoded_length(
        data in proptest::collection::vec(0u8..4, 1..400),
        mode in prop_oneof![Just(Mode::Fast), Just(Mode::Optimal)],
    ) {
        let packed = compress(&data, mode).unwrap();
        prop_assert_eq!(compressed_len(&packed, 0).unwrap(), packed.len());
    }

    #[test]
    fn probe_inside_larger_buffer(
        data in proptest::collection::vec(any::<u8>(), 1..200),
        prefix in proptest::collection::vec(any::<u8>(), 0..32),
        suffix in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let packed = compress(&data, Mode::Optimal).unwrap();
        let mut rom = prefix.clone();
        rom.extend(&packed);
        rom.extend(&suffix);
        let offset = prefix.len();
        let len = compressed_len(&rom, offset).unwrap();
        prop_assert_eq!(len, packed.len());
        prop_assert_eq!(&rom[offset..offset + len], &packed[..]);
        prop_assert_eq!(decompress(&rom, offset).unwrap(), data);
    }
}

#[test]
fn consecutive_blocks_are_found_by_probing() {
    let blocks: [&[u8]; 3] = [b"first tile first tile", &[0u8; 300], b"\x01\x02\x03\x04"];
    let mut rom = vec![0xEA; 5];
    for block in blocks {
        rom.extend(compress(block, Mode::Fast).unwrap());
    }
    let mut offset = 5;
    for block in blocks {
        assert_eq!(decompress(&rom, offset).unwrap(), block);
        offset += compressed_len(&rom, offset).unwrap();
    }
    assert_eq!(offset, rom.len());
}

#[test]
fn stats_agree_with_probe() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i % 37 / 4) as u8).collect();
    let packed = compress(&data, Mode::Optimal).unwrap();
    let stats = SegmentStats::from_stream(&packed, 0).unwrap();
    assert!(stats.terminated);
    assert_eq!(stats.encoded_bytes as usize, compressed_len(&packed, 0).unwrap());
    assert_eq!(stats.decoded_bytes as usize, data.len());
    let half = decompress_bounded(&packed, 0, data.len() / 2).unwrap();
    assert_eq!(half, &data[..data.len() / 2]);
}

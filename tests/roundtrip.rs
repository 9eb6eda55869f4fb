use cartpack::{compress, decompress, encode_fast, encode_optimal, Mode};
use proptest::prelude::*;

fn tiles() -> impl Strategy<Value = Vec<u8>> {
    // Short runs over a small alphabet, the shape of 2bpp tile data.
    proptest::collection::vec((0u8..6, 1usize..40), 1..40).prop_map(|runs| {
        let mut out = Vec::new();
        for (value, len) in runs {
            match value {
                0..=2 => out.extend(std::iter::repeat(value).take(len)),
                3 => out.extend((0..len).map(|i| (i as u8).wrapping_add(0xF0))),
                4 => out.extend((0..len).map(|i| if i % 2 == 0 { 0x11 } else { 0x22 })),
                _ => {
                    let start = out.len().saturating_sub(len);
                    let copy: Vec<u8> = out[start..].to_vec();
                    out.extend(copy);
                }
            }
        }
        if out.is_empty() {
            out.push(0);
        }
        out
    })
}

proptest! {
    #[test]
    fn fast_roundtrip(data in proptest::collection::vec(any::<u8>(), 1..600)) {
        let packed = encode_fast(&data).unwrap();
        prop_assert_eq!(decompress(&packed, 0).unwrap(), data);
    }

    #[test]
    fn optimal_roundtrip_unterminated(data in proptest::collection::vec(any::<u8>(), 1..600)) {
        let mut packed = encode_optimal(&data, false).unwrap();
        packed.push(0xFF);
        prop_assert_eq!(decompress(&packed, 0).unwrap(), data);
    }

    #[test]
    fn structured_roundtrip(data in tiles()) {
        for mode in [Mode::Fast, Mode::Optimal] {
            let packed = compress(&data, mode).unwrap();
            prop_assert_eq!(decompress(&packed, 0).unwrap(), data.clone());
        }
    }

    #[test]
    fn optimal_never_longer_than_fast(data in tiles()) {
        let fast = encode_fast(&data).unwrap();
        let optimal = encode_optimal(&data, false).unwrap();
        prop_assert!(optimal.len() <= fast.len());
    }
}

fn track_map(rows: usize) -> Vec<u8> {
    (0..128 * rows)
        .map(|i: usize| {
            let (x, y) = (i % 128, i / 128);
            if (x / 16 + y / 16) % 3 == 0 {
                0x40
            } else {
                (x % 7) as u8
            }
        })
        .collect()
}

#[test]
fn full_track_map_roundtrip_fast() {
    let map = track_map(128);
    let packed = compress(&map, Mode::Fast).unwrap();
    assert!(packed.len() < map.len() / 4);
    assert_eq!(decompress(&packed, 0).unwrap(), map);
}

#[test]
fn full_track_map_roundtrip_optimal() {
    let strip = track_map(128);
    let fast = compress(&strip, Mode::Fast).unwrap();
    let optimal = compress(&strip, Mode::Optimal).unwrap();
    assert!(optimal.len() <= fast.len());
    assert_eq!(decompress(&optimal, 0).unwrap(), strip);
}

use cartpack::{compress, compressed_len, decompress, decompress_bounded, Mode, TERMINATOR};
use proptest::prelude::*;
use rand::Rng;

#[test]
fn corrupt_absolute_copy_golden() {
    // "AB", then copies from unwritten addresses and from the last byte.
    let stream = [
        0x02, b'A', b'B', // literal
        0x84, 0x10, 0x00, // absolute copy x4 from 0x0010
        0x84, 0x01, 0x00, // absolute copy x4 from 0x0001
        0xA3, 0x00, 0x01, // relative copy x3 from 256 bytes back
        TERMINATOR,
    ];
    let expected = [b'A', b'B', 0, 0, 0, 0, b'B', 0, 0, 0, 0, 0, 0];
    let first = decompress(&stream, 0).unwrap();
    assert_eq!(first, expected);
    assert_eq!(decompress(&stream, 0).unwrap(), first);
    assert_eq!(compressed_len(&stream, 0).unwrap(), stream.len());
}

#[test]
fn truncated_blocks_decode_a_prefix() {
    let data: Vec<u8> = (0..200u32).map(|i| (i * i % 17) as u8).collect();
    let packed = compress(&data, Mode::Optimal).unwrap();
    for cut in 0..packed.len() {
        let head = &packed[..cut];
        let out = decompress(head, 0).unwrap();
        assert_eq!(compressed_len(head, 0).unwrap(), cut);
        assert!(data.starts_with(&out));
    }
}

#[test]
fn random_bit_flips_never_panic() {
    let data: Vec<u8> = (0..512u32).map(|i| ((i / 9) ^ (i % 5)) as u8).collect();
    let packed = compress(&data, Mode::Fast).unwrap();
    let total_bits = packed.len() * 8;
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let mut buf = packed.clone();
        for _ in 0..rng.gen_range(1..4) {
            let bit = rng.gen_range(0..total_bits);
            buf[bit / 8] ^= 1u8 << (7 - (bit % 8));
        }
        let len = compressed_len(&buf, 0).unwrap();
        assert!(len <= buf.len());
        let _ = decompress_bounded(&buf, 0, 1 << 16).unwrap();
    }
}

#[test]
fn offset_past_end_is_an_error() {
    assert!(decompress(&[TERMINATOR], 2).is_err());
    assert_eq!(decompress(&[TERMINATOR], 1).unwrap(), Vec::<u8>::new());
}

proptest! {
    #[test]
    fn arbitrary_bytes_decode_deterministically(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        offset in 0usize..8,
    ) {
        let offset = offset.min(bytes.len());
        let a = decompress(&bytes, offset).unwrap();
        let b = decompress(&bytes, offset).unwrap();
        prop_assert_eq!(&a, &b);
        let consumed = compressed_len(&bytes, offset).unwrap();
        prop_assert!(offset + consumed <= bytes.len());
        let bounded = decompress_bounded(&bytes, offset, 64).unwrap();
        prop_assert_eq!(&bounded[..], &a[..a.len().min(64)]);
    }
}

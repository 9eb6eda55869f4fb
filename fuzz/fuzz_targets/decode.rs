use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(consumed) = cartpack::compressed_len(data, 0) else {
                return;
            };
            assert!(consumed <= data.len());
            let _ = cartpack::decompress_bounded(data, 0, cartpack::TRACK_MAP_LEN);
        });
    }
}

use cartpack::{compress, decompress, Mode};
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() || data.len() > 4096 {
                return;
            }
            for mode in [Mode::Fast, Mode::Optimal] {
                let packed = compress(data, mode).expect("non-empty input");
                assert_eq!(decompress(&packed, 0).expect("offset 0"), data);
            }
        });
    }
}

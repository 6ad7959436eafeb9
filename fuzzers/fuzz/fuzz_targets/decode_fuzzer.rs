#![no_main]
use gfstream::{Deserializer, SliceInputStream};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

fuzz_target!(|data: &[u8]| {
    // Raw size decoding must never panic, whatever the bytes.
    let mut stream = SliceInputStream::new(data);
    let _ = gfstream::size::read(&mut stream);

    // Full decode path through a representative nested shape.
    let mut stream = SliceInputStream::new(data);
    if let Ok(mut de) = Deserializer::new(&mut stream) {
        let _ = de.decode::<BTreeMap<String, Vec<(u64, Option<i32>)>>>();
    }

    // Scalar-by-scalar reads until the stream runs dry.
    let mut stream = SliceInputStream::new(data);
    if let Ok(mut de) = Deserializer::new(&mut stream) {
        loop {
            if de.read_bool().is_err() || de.read_u32().is_err() {
                break;
            }
        }
    }
});

use gfstream::{Deserializer, SliceInputStream};
use honggfuzz::fuzz;
use std::collections::BTreeMap;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut stream = SliceInputStream::new(data);
            let _ = gfstream::size::read(&mut stream);

            let mut stream = SliceInputStream::new(data);
            if let Ok(mut de) = Deserializer::new(&mut stream) {
                let _ = de.decode::<BTreeMap<String, Vec<(u64, Option<i32>)>>>();
            }
        });
    }
}

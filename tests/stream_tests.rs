use std::collections::BTreeMap;

use gfstream::*;
use tempfile::tempdir;

#[test]
fn archive_through_file_stream() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level.gf");

    let mut output = FileOutputStream::create(&path);
    assert!(output.is_open());
    let mut serializer = Serializer::with_version(&mut output, 3).unwrap();
    serializer.encode(&String::from("overworld")).unwrap();
    serializer.encode(&vec![1u32, 2, 3]).unwrap();
    drop(serializer);
    drop(output);

    let mut input = FileInputStream::open(&path);
    assert!(input.is_open());
    let mut deserializer = Deserializer::new(&mut input).unwrap();
    assert_eq!(deserializer.version(), 3);
    assert_eq!(deserializer.decode::<String>().unwrap(), "overworld");
    assert_eq!(deserializer.decode::<Vec<u32>>().unwrap(), vec![1, 2, 3]);
    drop(deserializer);
    assert!(input.finished());
}

#[test]
fn buffered_file_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("buffered.gf");

    let mut file = FileOutputStream::create(&path);
    {
        let mut buffered = BufferedOutputStream::new(&mut file);
        let mut serializer = Serializer::new(&mut buffered).unwrap();
        for i in 0..1000u32 {
            serializer.encode(&i).unwrap();
        }
        drop(serializer);
        buffered.finish().unwrap();
    }
    drop(file);

    let mut file = FileInputStream::open(&path);
    let mut buffered = BufferedInputStream::new(&mut file);
    let mut deserializer = Deserializer::new(&mut buffered).unwrap();
    for i in 0..1000u32 {
        assert_eq!(deserializer.decode::<u32>().unwrap(), i);
    }
}

#[test]
fn compressed_file_archive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("compressed.gf");
    let payload: Vec<u64> = (0..2000).map(|i| i % 17).collect();

    let mut file = FileOutputStream::create(&path);
    {
        let mut compressed = CompressedOutputStream::new(&mut file);
        let mut serializer = Serializer::new(&mut compressed).unwrap();
        serializer.encode(&payload).unwrap();
        drop(serializer);
        compressed.finish().unwrap();
    }
    let compressed_len = file.written_bytes();
    drop(file);

    // Repetitive content must end up smaller on disk than in memory.
    assert!(compressed_len < (payload.len() * 8) as u64);

    let mut file = FileInputStream::open(&path);
    let mut compressed = CompressedInputStream::new(&mut file);
    let mut deserializer = Deserializer::new(&mut compressed).unwrap();
    assert_eq!(deserializer.decode::<Vec<u64>>().unwrap(), payload);
}

#[test]
fn compression_transparency_with_hashing() {
    // Purpose: write N integers through Hashed(Compressed(Buffer)) and
    // read them back through the same stack; hashes and values must both
    // match. N is large enough to force many internal flushes.
    const N: u64 = 10_240;

    let mut archive = Vec::new();
    let write_hash;
    {
        let mut buffer = BufferOutputStream::new(&mut archive);
        let mut compressed = CompressedOutputStream::new(&mut buffer);
        let mut hashed = HashedOutputStream::new(&mut compressed, Sha256Hasher::new());
        let mut serializer = Serializer::new(&mut hashed).unwrap();
        for i in 0..N {
            serializer.write_u64(i.wrapping_mul(0x9E37_79B9)).unwrap();
        }
        drop(serializer);
        write_hash = hashed.hash();
        drop(hashed);
        compressed.finish().unwrap();
    }

    // The compressed archive is a fraction of the 80 KiB payload.
    assert!((archive.len() as u64) < N * 8);

    let read_hash;
    {
        let mut input = SliceInputStream::new(&archive);
        let mut compressed = CompressedInputStream::new(&mut input);
        let mut hashed = HashedInputStream::new(&mut compressed, Sha256Hasher::new());
        let mut deserializer = Deserializer::new(&mut hashed).unwrap();
        for i in 0..N {
            assert_eq!(
                deserializer.read_u64().unwrap(),
                i.wrapping_mul(0x9E37_79B9)
            );
        }
        drop(deserializer);
        read_hash = hashed.hash();
    }

    assert_eq!(write_hash, read_hash);
}

#[test]
fn property_map_scenario() {
    // Purpose: the canonical asset-pipeline exchange: a property map of
    // {number: 42, color: (0, 0, 255)}, hashed on the way out, decoded
    // into a fresh map, re-encoded and re-hashed; both hashes and both
    // maps must agree.
    #[derive(Debug, Clone, PartialEq)]
    enum Property {
        Number(i64),
        Color(u8, u8, u8),
    }

    impl Encode for Property {
        fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
            match self {
                Property::Number(value) => {
                    write_variant_index(ser, 0)?;
                    ser.write_i64(*value)
                }
                Property::Color(r, g, b) => {
                    write_variant_index(ser, 1)?;
                    (*r, *g, *b).encode(ser)
                }
            }
        }
    }

    impl Decode for Property {
        fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
            if read_variant_index(de, 2)? == 0 {
                Ok(Property::Number(de.read_i64()?))
            } else {
                let (r, g, b) = <(u8, u8, u8)>::decode(de)?;
                Ok(Property::Color(r, g, b))
            }
        }
    }

    fn encode_map(map: &BTreeMap<String, Property>) -> (Vec<u8>, [u8; 32]) {
        let mut archive = Vec::new();
        let mut buffer = BufferOutputStream::new(&mut archive);
        let mut hashed = HashedOutputStream::new(&mut buffer, Sha256Hasher::new());
        let mut serializer = Serializer::new(&mut hashed).unwrap();
        serializer.encode(map).unwrap();
        drop(serializer);
        let hash = hashed.hash();
        drop(hashed);
        drop(buffer);
        (archive, hash)
    }

    let mut properties = BTreeMap::new();
    properties.insert(String::from("number"), Property::Number(42));
    properties.insert(String::from("color"), Property::Color(0, 0, 255));

    let (archive, first_hash) = encode_map(&properties);

    let mut input = SliceInputStream::new(&archive);
    let mut deserializer = Deserializer::new(&mut input).unwrap();
    let decoded: BTreeMap<String, Property> = deserializer.decode().unwrap();
    assert_eq!(decoded, properties);

    let (second_archive, second_hash) = encode_map(&decoded);
    assert_eq!(second_archive, archive);
    assert_eq!(second_hash, first_hash);
}

#[test]
fn full_decorator_stack_on_files() {
    // Hashed(Compressed(Buffered(File))) both directions.
    let dir = tempdir().unwrap();
    let path = dir.path().join("stacked.gf");
    let entities: Vec<(String, (f32, f32), Option<u64>)> = (0..300)
        .map(|i| {
            (
                format!("entity_{i}"),
                (i as f32 * 0.5, i as f32 * -0.25),
                if i % 3 == 0 { None } else { Some(i as u64) },
            )
        })
        .collect();

    let write_hash;
    {
        let mut file = FileOutputStream::create(&path);
        {
            let mut buffered = BufferedOutputStream::new(&mut file);
            {
                let mut compressed = CompressedOutputStream::new(&mut buffered);
                let mut hashed =
                    HashedOutputStream::new(&mut compressed, Crc32Hasher::new());
                let mut serializer = Serializer::new(&mut hashed).unwrap();
                serializer.encode(&entities).unwrap();
                drop(serializer);
                write_hash = hashed.hash();
                drop(hashed);
                compressed.finish().unwrap();
            }
            buffered.finish().unwrap();
        }
        drop(file);
    }

    let mut file = FileInputStream::open(&path);
    let mut buffered = BufferedInputStream::new(&mut file);
    let mut compressed = CompressedInputStream::new(&mut buffered);
    let mut hashed = HashedInputStream::new(&mut compressed, Crc32Hasher::new());
    let mut deserializer = Deserializer::new(&mut hashed).unwrap();
    let decoded: Vec<(String, (f32, f32), Option<u64>)> = deserializer.decode().unwrap();
    drop(deserializer);

    assert_eq!(decoded, entities);
    assert_eq!(hashed.hash(), write_hash);
}

#[test]
fn append_mode_concatenates_archives() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.gf");

    {
        let mut output = FileOutputStream::with_mode(&path, WriteMode::Append);
        let mut serializer = Serializer::new(&mut output).unwrap();
        serializer.encode(&1u32).unwrap();
    }
    {
        let mut output = FileOutputStream::with_mode(&path, WriteMode::Append);
        let mut serializer = Serializer::new(&mut output).unwrap();
        serializer.encode(&2u32).unwrap();
    }

    let mut input = FileInputStream::open(&path);
    assert_eq!(input.length(), 2 * (4 + 4));
    let mut first = Deserializer::new(&mut input).unwrap();
    assert_eq!(first.decode::<u32>().unwrap(), 1);
    drop(first);
    let mut second = Deserializer::new(&mut input).unwrap();
    assert_eq!(second.decode::<u32>().unwrap(), 2);
}

#[test]
fn seek_and_skip_over_known_layout() {
    // A reader that knows the layout can jump across fields.
    let mut archive = Vec::new();
    let mut output = BufferOutputStream::new(&mut archive);
    let mut serializer = Serializer::new(&mut output).unwrap();
    serializer.write_u32(0xAAAA_AAAA).unwrap();
    serializer.write_u32(0xBBBB_BBBB).unwrap();
    serializer.write_u32(0xCCCC_CCCC).unwrap();
    drop(serializer);
    drop(output);

    let mut input = SliceInputStream::new(&archive);
    let mut deserializer = Deserializer::new(&mut input).unwrap();
    assert_eq!(deserializer.read_u32().unwrap(), 0xAAAA_AAAA);
    drop(deserializer);

    input.skip(4).unwrap();
    let mut remaining = [0u8; 4];
    input.read_exact(&mut remaining).unwrap();
    assert_eq!(u32::from_be_bytes(remaining), 0xCCCC_CCCC);

    input.seek(4).unwrap();
    input.read_exact(&mut remaining).unwrap();
    assert_eq!(u32::from_be_bytes(remaining), 0xAAAA_AAAA);
}

#[test]
fn slice_output_stream_caps_archive() {
    let mut span = [0u8; 6];
    let mut output = SliceOutputStream::new(&mut span);
    let mut serializer = Serializer::new(&mut output).unwrap();
    serializer.write_u16(0x0102).unwrap();
    // Only two of the next four bytes fit.
    let result = serializer.write_u32(0x0304_0506);
    assert!(matches!(result, Err(Error::StreamFull)));
    drop(serializer);
    assert_eq!(output.filled(), &[b'g', b'f', 0x00, 0x00, 0x01, 0x02]);
}

#[test]
fn missing_file_fails_at_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not_there.gf");

    let mut input = FileInputStream::open(&path);
    assert!(!input.is_open());
    let result = Deserializer::new(&mut input);
    assert!(matches!(result, Err(Error::UnexpectedEof)));
}

#[test]
fn unwritable_output_fails_at_header() {
    let dir = tempdir().unwrap();
    // The directory itself is not a writable file.
    let mut output = FileOutputStream::create(dir.path());
    assert!(!output.is_open());
    let result = Serializer::new(&mut output);
    assert!(matches!(result, Err(Error::StreamFull)));
}

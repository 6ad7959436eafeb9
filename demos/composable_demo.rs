use gfstream::*;

// Example: a game-entity record that implements Encode and Decode
#[derive(Debug, Clone, PartialEq)]
struct EntityRecord {
    name: String,
    position: (f32, f32),
    health: u32,
    tags: Vec<String>,
}

impl Encode for EntityRecord {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_str(&self.name)?;
        self.position.encode(ser)?;
        ser.write_u32(self.health)?;
        self.tags.encode(ser)
    }
}

impl Decode for EntityRecord {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        Ok(Self {
            name: de.read_string()?,
            position: Decode::decode(de)?,
            health: de.read_u32()?,
            tags: Decode::decode(de)?,
        })
    }
}

fn sample_entities(count: usize) -> Vec<EntityRecord> {
    (0..count)
        .map(|i| EntityRecord {
            name: format!("entity-{i}"),
            position: (i as f32 * 1.5, i as f32 * -0.5),
            health: 100 - i as u32,
            tags: vec![String::from("mobile"), format!("squad-{}", i % 3)],
        })
        .collect()
}

fn main() -> Result<()> {
    println!("=== Composable gfstream Example ===\n");

    let entities = sample_entities(5);

    // Example 1: Basic usage with an in-memory archive
    println!("1. Basic usage with an in-memory archive:");
    {
        let mut archive = Vec::new();
        let mut output = BufferOutputStream::new(&mut archive);
        let mut serializer = Serializer::new(&mut output)?;
        for entity in &entities {
            serializer.encode(entity)?;
        }
        drop(serializer);
        drop(output);
        println!("  Wrote {} bytes", archive.len());

        let mut input = SliceInputStream::new(&archive);
        let mut deserializer = Deserializer::new(&mut input)?;
        let mut count = 0;
        for _ in 0..entities.len() {
            let entity: EntityRecord = deserializer.decode()?;
            println!("  Read entity: {} at {:?}", entity.name, entity.position);
            count += 1;
        }
        println!("  ✓ Read {count} entities back\n");
    }

    // Example 2: The same archive written to a file, with a format version
    println!("2. Writing an archive to a file:");
    {
        let mut output = FileOutputStream::create("entities.gf");
        let mut serializer = Serializer::with_version(&mut output, 1)?;
        serializer.encode(&entities)?;
        drop(serializer);
        output.sync()?;
        println!("  Wrote {} bytes to entities.gf", output.written_bytes());

        let mut input = FileInputStream::open("entities.gf");
        let mut deserializer = Deserializer::new(&mut input)?;
        println!("  Archive format version: {}", deserializer.version());
        let read_back: Vec<EntityRecord> = deserializer.decode()?;
        println!("  ✓ Read {} entities back\n", read_back.len());
    }

    // Example 3: Buffered file writes
    println!("3. Buffering file writes:");
    {
        let mut file = FileOutputStream::create("entities_buffered.gf");
        {
            let mut buffered = BufferedOutputStream::new(&mut file);
            let mut serializer = Serializer::new(&mut buffered)?;
            serializer.encode(&entities)?;
            drop(serializer);
            buffered.finish()?;
        }
        println!(
            "  ✓ {} bytes reached the file in chunked writes\n",
            file.written_bytes()
        );
    }

    // Example 4: Compression
    println!("4. Compressing the archive:");
    {
        let mut plain = Vec::new();
        {
            let mut output = BufferOutputStream::new(&mut plain);
            let mut serializer = Serializer::new(&mut output)?;
            serializer.encode(&entities)?;
        }

        let mut wire = Vec::new();
        {
            let mut buffer = BufferOutputStream::new(&mut wire);
            let mut compressed = CompressedOutputStream::new(&mut buffer);
            let mut serializer = Serializer::new(&mut compressed)?;
            serializer.encode(&entities)?;
            drop(serializer);
            compressed.finish()?;
        }
        println!(
            "  Plain archive: {} bytes, compressed: {} bytes",
            plain.len(),
            wire.len()
        );

        let mut input = SliceInputStream::new(&wire);
        let mut compressed = CompressedInputStream::new(&mut input);
        let mut deserializer = Deserializer::new(&mut compressed)?;
        let read_back: Vec<EntityRecord> = deserializer.decode()?;
        println!("  ✓ {} entities after the round trip\n", read_back.len());
    }

    // Example 5: The full stack, with integrity hashing on both sides
    println!("5. Full decorator stack with integrity hashing:");
    {
        let write_hash;
        {
            let mut file = FileOutputStream::create("entities_stacked.gf");
            {
                let mut buffered = BufferedOutputStream::new(&mut file);
                {
                    let mut compressed = CompressedOutputStream::new(&mut buffered);
                    let mut hashed =
                        HashedOutputStream::new(&mut compressed, Sha256Hasher::new());
                    let mut serializer = Serializer::new(&mut hashed)?;
                    serializer.encode(&entities)?;
                    drop(serializer);
                    write_hash = hashed.hash();
                    drop(hashed);
                    compressed.finish()?;
                }
                buffered.finish()?;
            }
        }

        let mut file = FileInputStream::open("entities_stacked.gf");
        let mut buffered = BufferedInputStream::new(&mut file);
        let mut compressed = CompressedInputStream::new(&mut buffered);
        let mut hashed = HashedInputStream::new(&mut compressed, Sha256Hasher::new());
        let mut deserializer = Deserializer::new(&mut hashed)?;
        let read_back: Vec<EntityRecord> = deserializer.decode()?;
        drop(deserializer);

        println!("  Entities survived: {}", read_back == entities);
        println!("  Hashes agree: {}", hashed.hash() == write_hash);
        println!("  ✓ Verified through Hashed(Compressed(Buffered(File)))\n");
    }

    println!("=== Example Complete ===");
    println!("Files created:");
    println!("  - entities.gf");
    println!("  - entities_buffered.gf");
    println!("  - entities_stacked.gf");

    Ok(())
}

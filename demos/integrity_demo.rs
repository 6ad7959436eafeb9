use gfstream::*;
use std::collections::BTreeMap;

// This example writes a property map through hashed streams, proves the
// read side saw exactly the bytes the write side produced, and shows a
// flipped byte being caught.

fn archive_properties(properties: &BTreeMap<String, i64>) -> Result<(Vec<u8>, [u8; 32])> {
    let mut archive = Vec::new();
    let mut buffer = BufferOutputStream::new(&mut archive);
    let mut hashed = HashedOutputStream::new(&mut buffer, Sha256Hasher::new());
    let mut serializer = Serializer::new(&mut hashed)?;
    serializer.encode(properties)?;
    drop(serializer);
    let hash = hashed.hash();
    drop(hashed);
    drop(buffer);
    Ok((archive, hash))
}

fn read_hashed(archive: &[u8]) -> Result<(BTreeMap<String, i64>, [u8; 32])> {
    let mut input = SliceInputStream::new(archive);
    let mut hashed = HashedInputStream::new(&mut input, Sha256Hasher::new());
    let mut deserializer = Deserializer::new(&mut hashed)?;
    let properties = deserializer.decode()?;
    drop(deserializer);
    let hash = hashed.hash();
    Ok((properties, hash))
}

fn hex(digest: &[u8]) -> String {
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn main() -> Result<()> {
    println!("=== Integrity Hashing Example ===\n");

    let mut properties = BTreeMap::new();
    properties.insert(String::from("seed"), 414243i64);
    properties.insert(String::from("difficulty"), 2);
    properties.insert(String::from("elapsed_ticks"), 88_000);

    println!(
        "1. Writing {} properties through a SHA-256 hashed stream:",
        properties.len()
    );
    let (archive, write_hash) = archive_properties(&properties)?;
    println!("  Archive: {} bytes", archive.len());
    println!("  Write hash: {}", hex(&write_hash));

    println!("\n2. Reading back through an equivalent hashed stream:");
    let (read_back, read_hash) = read_hashed(&archive)?;
    println!("  Read hash:  {}", hex(&read_hash));
    println!("  Maps equal: {}", read_back == properties);
    println!("  ✓ Hashes agree: {}", write_hash == read_hash);

    println!("\n3. Detecting a corrupted archive:");
    let mut corrupted = archive.clone();
    let index = corrupted.len() / 2;
    corrupted[index] ^= 0x40;
    match read_hashed(&corrupted) {
        Ok((_, corrupt_hash)) => {
            println!("  Corrupt hash: {}", hex(&corrupt_hash));
            println!("  ✓ Mismatch detected: {}", corrupt_hash != write_hash);
        }
        Err(err) => println!("  ✓ Decode refused the corrupted bytes: {err}"),
    }

    println!("\n4. CRC32 for cheap corruption checks:");
    {
        let mut sink = Vec::new();
        let mut buffer = BufferOutputStream::new(&mut sink);
        let mut hashed = HashedOutputStream::new(&mut buffer, Crc32Hasher::new());
        let mut serializer = Serializer::new(&mut hashed)?;
        serializer.encode(&properties)?;
        drop(serializer);
        println!("  CRC32: {:#010x}", hashed.hash());
    }

    println!("\n=== Integrity Example Complete ===");
    Ok(())
}

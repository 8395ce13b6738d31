//! Hash chain demo
//!
//! Builds a small chain, writes it to a flat text file, reads it back, and
//! verifies the linkage of the rebuilt chain.

use hashchain_core::chain::{read_chain, verify_linkage, write_chain};
use hashchain_core::node::HashChainNode;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::thread::sleep;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hash Chain Demo ===");
    println!();

    // Build the chain: genesis plus ten payload nodes.
    let mut chain = vec![HashChainNode::genesis()];
    println!("{}", chain[0].info(true));

    for i in 0..10 {
        // Space nodes out so timestamps differ across the chain
        sleep(Duration::from_millis(500));
        let next = chain.last().unwrap().extend(format!("Node # {}", i + 1));
        println!("{}", next.info(true));
        chain.push(next);
    }

    // Write the chain to a file, one record per line.
    let path = std::env::temp_dir().join("hash_chain_data.txt");
    let mut writer = BufWriter::new(File::create(&path)?);
    write_chain(&mut writer, &chain)?;
    writer.flush()?;
    drop(writer);
    println!("Chain written to {}", path.display());

    // Read it back and check every link.
    let mut reader = BufReader::new(File::open(&path)?);
    let rebuilt = read_chain(&mut reader)?;

    println!();
    println!("Re-built from file:");
    for node in &rebuilt {
        println!("{}", node.info(true));
    }

    if rebuilt.len() != chain.len() {
        eprintln!(
            "Read back {} of {} records; file is corrupted",
            rebuilt.len(),
            chain.len()
        );
    }

    match verify_linkage(&rebuilt) {
        Ok(()) => println!("Hash linkage verified for {} nodes.", rebuilt.len()),
        Err(e) => eprintln!("Hash check failed: {}", e),
    }

    Ok(())
}

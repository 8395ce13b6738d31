//! Chain-level helpers
//!
//! A chain is just an ordered `Vec` of nodes; there is no dedicated chain
//! type. These helpers cover the caller-side chores: writing a chain to a
//! flat text stream, reading it back, and checking hash linkage across
//! consecutive nodes. Linkage is never checked automatically during parse
//! of a single record.

use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::codec::{read_record, write_record};
use crate::crypto::Hash;
use crate::node::HashChainNode;

/// Linkage verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkageError {
    #[error("node {index} is uninitialized")]
    UninitializedNode { index: usize },
    #[error("node {index} has serial {found}, expected {expected}")]
    SerialMismatch { index: usize, expected: u64, found: u64 },
    #[error("node {index} does not commit to its predecessor's hash")]
    PrevHashMismatch { index: usize },
}

/// Write a chain to a caller-owned sink, one record per line, in order
pub fn write_chain<W: Write>(writer: &mut W, chain: &[HashChainNode]) -> io::Result<()> {
    for (i, node) in chain.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        write_record(writer, node)?;
    }
    Ok(())
}

/// Read a chain back from a caller-owned reader.
///
/// Reads records in order and stops at end of input or at the first record
/// that fails to parse, returning everything read up to that point. A
/// corrupted record therefore truncates the result; it does not error.
pub fn read_chain<R: BufRead>(reader: &mut R) -> io::Result<Vec<HashChainNode>> {
    let mut chain = Vec::new();
    while let Some(parsed) = read_record(reader)? {
        if !parsed.is_valid() {
            break;
        }
        chain.push(parsed.into_node());
    }
    Ok(chain)
}

/// Verify hash linkage across a chain.
///
/// The first node must commit to the all-zero hash; every later node must
/// commit to its predecessor's hash and carry the next serial number.
pub fn verify_linkage(chain: &[HashChainNode]) -> Result<(), LinkageError> {
    let mut expected_prev = Hash::zero();
    let mut expected_serial = 0u64;

    for (index, node) in chain.iter().enumerate() {
        if node.is_uninitialized() {
            return Err(LinkageError::UninitializedNode { index });
        }
        if node.serial() != expected_serial {
            return Err(LinkageError::SerialMismatch {
                index,
                expected: expected_serial,
                found: node.serial(),
            });
        }
        if *node.prev_hash() != expected_prev {
            return Err(LinkageError::PrevHashMismatch { index });
        }
        expected_prev = node.hash();
        expected_serial += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::serialize;

    fn build_chain(len: usize) -> Vec<HashChainNode> {
        let mut chain = vec![HashChainNode::genesis()];
        for i in 1..len {
            let next = chain.last().unwrap().extend(format!("Node # {}", i));
            chain.push(next);
        }
        chain
    }

    #[test]
    fn test_linkage_holds_for_built_chain() {
        let chain = build_chain(5);
        assert_eq!(verify_linkage(&chain), Ok(()));
    }

    #[test]
    fn test_empty_chain_links_trivially() {
        assert_eq!(verify_linkage(&[]), Ok(()));
    }

    #[test]
    fn test_linkage_detects_reordering() {
        let mut chain = build_chain(4);
        chain.swap(1, 2);
        assert!(verify_linkage(&chain).is_err());
    }

    #[test]
    fn test_linkage_detects_removed_node() {
        let mut chain = build_chain(4);
        chain.remove(1);
        assert_eq!(
            verify_linkage(&chain),
            Err(LinkageError::SerialMismatch { index: 1, expected: 1, found: 2 })
        );
    }

    #[test]
    fn test_linkage_rejects_sentinel() {
        let chain = vec![HashChainNode::uninitialized()];
        assert_eq!(
            verify_linkage(&chain),
            Err(LinkageError::UninitializedNode { index: 0 })
        );
    }

    #[test]
    fn test_chain_file_roundtrip() {
        let chain = build_chain(4);

        let mut buffer = Vec::new();
        write_chain(&mut buffer, &chain).unwrap();

        let mut reader = buffer.as_slice();
        let rebuilt = read_chain(&mut reader).unwrap();

        assert_eq!(rebuilt, chain);
        assert_eq!(verify_linkage(&rebuilt), Ok(()));
    }

    #[test]
    fn test_read_chain_stops_at_corrupt_record() {
        let chain = build_chain(3);
        let mut records: Vec<String> = chain.iter().map(serialize).collect();
        records[1] = records[1].replace("Node # 1", "Node # X");
        let data = records.join("\n");

        let mut reader = data.as_bytes();
        let rebuilt = read_chain(&mut reader).unwrap();

        // Only the genesis node survives; the tampered record truncates
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0], chain[0]);
    }
}

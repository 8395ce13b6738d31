//! Canonical text encoding for chain nodes
//!
//! One record per line, five fields joined by the tilde separator:
//!
//! ```text
//! serial~timestamp~prev_hash_hex~payload~hash_hex
//! ```
//!
//! Integers are decimal ASCII, hashes exactly 64 lowercase hex characters.
//! The payload is raw text and is not escaped; a payload containing the
//! separator or a line terminator corrupts the record. The trailing field
//! is the node's self-reported commitment hash, recomputed and checked on
//! parse so a corrupted or forged record degrades to the uninitialized
//! sentinel instead of surfacing an error.

use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::constants::{FIELD_SEP, HASH_HEX_LEN};
use crate::crypto::Hash;
use crate::node::HashChainNode;

/// Record decoding errors
///
/// Internal to parsing: every variant is caught by [`parse_record`] and
/// converted into [`Parsed::Invalid`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unexpected hash string length: expected 64 characters, got {0}")]
    HashLength(usize),
    #[error("invalid hex in hash field: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("malformed integer field: {0}")]
    MalformedInteger(&'static str),
    #[error("claimed hash does not match recomputed hash")]
    HashMismatch,
}

/// Outcome of parsing one text record.
///
/// Parsing is total: a malformed or tampered record yields
/// `Invalid(sentinel)` rather than an error, and [`Parsed::into_node`]
/// always produces a node either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// The record parsed and its self-reported hash checked out
    Valid(HashChainNode),
    /// The record was malformed or failed the hash check; holds the sentinel
    Invalid(HashChainNode),
}

impl Parsed {
    /// True if the record parsed and validated
    pub fn is_valid(&self) -> bool {
        matches!(self, Parsed::Valid(_))
    }

    /// Unwrap to the contained node (the sentinel when invalid)
    pub fn into_node(self) -> HashChainNode {
        match self {
            Parsed::Valid(node) | Parsed::Invalid(node) => node,
        }
    }

    /// Borrow the contained node
    pub fn node(&self) -> &HashChainNode {
        match self {
            Parsed::Valid(node) | Parsed::Invalid(node) => node,
        }
    }
}

/// Encode a node as one canonical text record (no trailing newline)
pub fn serialize(node: &HashChainNode) -> String {
    format!(
        "{serial}{sep}{timestamp}{sep}{prev}{sep}{payload}{sep}{hash}",
        serial = node.serial(),
        timestamp = node.timestamp(),
        prev = node.prev_hash_hex(),
        payload = node.payload(),
        hash = node.hash_hex(),
        sep = FIELD_SEP,
    )
}

/// Write a node's canonical record into a caller-owned byte sink
pub fn write_record<W: Write>(writer: &mut W, node: &HashChainNode) -> io::Result<()> {
    writer.write_all(serialize(node).as_bytes())
}

/// Parse one text record.
///
/// A trailing line terminator is tolerated. Any malformed field, missing
/// separator, bad hex, or hash mismatch yields [`Parsed::Invalid`] holding
/// the uninitialized sentinel; no error escapes.
pub fn parse_record(line: &str) -> Parsed {
    match try_parse(line.trim_end_matches(['\r', '\n'])) {
        Ok(node) => Parsed::Valid(node),
        Err(_) => Parsed::Invalid(HashChainNode::uninitialized()),
    }
}

/// Read the next record from a caller-owned reader.
///
/// Returns `Ok(None)` at end of input. I/O errors from the reader are the
/// only errors surfaced; record-level corruption comes back as
/// [`Parsed::Invalid`].
pub fn read_record<R: BufRead>(reader: &mut R) -> io::Result<Option<Parsed>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(parse_record(&line)))
}

fn try_parse(line: &str) -> Result<HashChainNode, CodecError> {
    let mut fields = line.splitn(5, FIELD_SEP);

    let serial = fields
        .next()
        .ok_or(CodecError::MissingField("serial"))?
        .parse::<u64>()
        .map_err(|_| CodecError::MalformedInteger("serial"))?;

    let timestamp = fields
        .next()
        .ok_or(CodecError::MissingField("timestamp"))?
        .parse::<i64>()
        .map_err(|_| CodecError::MalformedInteger("timestamp"))?;

    let prev_hash = decode_hash(fields.next().ok_or(CodecError::MissingField("prev_hash"))?)?;
    let payload = fields
        .next()
        .ok_or(CodecError::MissingField("payload"))?
        .to_string();
    let claimed = decode_hash(fields.next().ok_or(CodecError::MissingField("hash"))?)?;

    let node = HashChainNode::from_parts(serial, timestamp, prev_hash, payload);
    if node.hash() != claimed {
        return Err(CodecError::HashMismatch);
    }
    Ok(node)
}

/// Decode a hash field: exactly 64 hex characters, no prefix
fn decode_hash(field: &str) -> Result<Hash, CodecError> {
    if field.len() != HASH_HEX_LEN {
        return Err(CodecError::HashLength(field.len()));
    }
    Ok(Hash::from_hex(field)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_field_layout() {
        let genesis = HashChainNode::genesis();
        let record = serialize(&genesis);
        let fields: Vec<&str> = record.split(FIELD_SEP).collect();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "0");
        assert_eq!(fields[1], genesis.timestamp().to_string());
        assert_eq!(fields[2], "0".repeat(64));
        assert_eq!(fields[3], "Genesis Node");
        assert_eq!(fields[4], genesis.hash_hex());
    }

    #[test]
    fn test_roundtrip() {
        let genesis = HashChainNode::genesis();
        let node = genesis.extend("Node # 1");

        let parsed = parse_record(&serialize(&node));
        assert!(parsed.is_valid());

        let back = parsed.into_node();
        assert_eq!(back, node);
        assert_eq!(back.hash(), node.hash());
    }

    #[test]
    fn test_roundtrip_empty_payload() {
        let node = HashChainNode::genesis().extend("");
        let parsed = parse_record(&serialize(&node));
        assert!(parsed.is_valid());
        assert_eq!(parsed.node().payload(), "");
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let node = HashChainNode::genesis().extend("Node # 1");
        let record = serialize(&node).replace("Node # 1", "Node # 2");

        let parsed = parse_record(&record);
        assert!(!parsed.is_valid());
        assert!(parsed.into_node().is_uninitialized());
    }

    #[test]
    fn test_tampered_hash_rejected() {
        let node = HashChainNode::genesis();
        let mut record = serialize(&node);
        // Flip the final hex character of the trailing hash field
        let last = record.pop().unwrap();
        record.push(if last == '0' { '1' } else { '0' });

        let parsed = parse_record(&record);
        assert!(!parsed.is_valid());
    }

    #[test]
    fn test_short_prev_hash_rejected() {
        // 63 hex characters, one short of a full hash
        let record = format!("1~1736339922~{}~payload~{}", "0".repeat(63), "0".repeat(64));
        let parsed = parse_record(&record);
        assert!(!parsed.is_valid());
        assert!(parsed.into_node().is_uninitialized());
    }

    #[test]
    fn test_missing_separator_rejected() {
        let node = HashChainNode::genesis();
        let record = serialize(&node).replacen('~', " ", 1);
        assert!(!parse_record(&record).is_valid());
    }

    #[test]
    fn test_non_numeric_serial_rejected() {
        let record = format!("x~1736339922~{0}~payload~{0}", "0".repeat(64));
        assert!(!parse_record(&record).is_valid());
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let node = HashChainNode::genesis();
        let record = format!("{}\n", serialize(&node));
        assert!(parse_record(&record).is_valid());
    }

    #[test]
    fn test_read_record_stream() {
        let genesis = HashChainNode::genesis();
        let next = genesis.extend("Node # 1");
        let data = format!("{}\n{}", serialize(&genesis), serialize(&next));

        let mut reader = data.as_bytes();
        let first = read_record(&mut reader).unwrap().unwrap();
        let second = read_record(&mut reader).unwrap().unwrap();
        assert!(read_record(&mut reader).unwrap().is_none());

        assert!(first.is_valid());
        assert!(second.is_valid());
        assert_eq!(*second.node().prev_hash(), first.node().hash());
    }
}

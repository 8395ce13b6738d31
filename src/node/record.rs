//! The hash-chain node record
//!
//! A node commits to its own fields and to the commitment hash of its
//! predecessor. Fields are set once at construction and only read
//! afterwards; the node's own hash is derived on demand, never stored.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{GENESIS_PAYLOAD, UNINITIALIZED_PAYLOAD};
use crate::crypto::{Hash, Hasher};

/// A single tamper-evident record in a hash chain.
///
/// Created either as the genesis node, by extending an existing node, or by
/// parsing a text record (see [`crate::codec`]). The default value is the
/// uninitialized sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashChainNode {
    /// 0-based position in the chain
    serial: u64,
    /// Creation time, seconds since the Unix epoch
    timestamp: i64,
    /// Commitment hash of the predecessor node
    prev_hash: Hash,
    /// Caller-supplied content
    payload: String,
}

impl HashChainNode {
    /// Create the distinguished first node of a new chain.
    ///
    /// Serial 0, all-zero previous hash, the fixed genesis payload, and the
    /// current wall-clock time.
    pub fn genesis() -> Self {
        Self {
            serial: 0,
            timestamp: unix_time_now(),
            prev_hash: Hash::zero(),
            payload: GENESIS_PAYLOAD.to_string(),
        }
    }

    /// Create the sentinel "invalid" node.
    ///
    /// This is the default value and the result of any failed parse.
    pub fn uninitialized() -> Self {
        Self {
            serial: 0,
            timestamp: 0,
            prev_hash: Hash::zero(),
            payload: UNINITIALIZED_PAYLOAD.to_string(),
        }
    }

    /// Extend the chain past this node with a new payload.
    ///
    /// The successor captures this node's commitment hash, the next serial
    /// number, and the current wall-clock time. Always succeeds.
    pub fn extend(&self, payload: impl Into<String>) -> Self {
        Self {
            serial: self.serial + 1,
            timestamp: unix_time_now(),
            prev_hash: self.hash(),
            payload: payload.into(),
        }
    }

    /// Reassemble a node from already-parsed fields. Codec internal; no
    /// validation happens here.
    pub(crate) fn from_parts(serial: u64, timestamp: i64, prev_hash: Hash, payload: String) -> Self {
        Self { serial, timestamp, prev_hash, payload }
    }

    /// Compute the commitment hash over this node's fields.
    ///
    /// Feeds a single streaming SHA-256, in order: serial as 8 bytes
    /// little-endian, timestamp as 8 bytes little-endian, the 32 raw bytes
    /// of the previous hash, and the raw payload bytes with no length
    /// prefix. Little-endian fixed-width is the canonical hash input on
    /// every platform.
    pub fn compute_hash(node: &HashChainNode) -> Hash {
        let mut hasher = Hasher::new();
        hasher.update(&node.serial.to_le_bytes());
        hasher.update(&node.timestamp.to_le_bytes());
        hasher.update(node.prev_hash.as_bytes());
        hasher.update(node.payload.as_bytes());
        hasher.finalize()
    }

    /// Get this node's commitment hash
    pub fn hash(&self) -> Hash {
        Self::compute_hash(self)
    }

    /// Get this node's commitment hash as a hex string
    pub fn hash_hex(&self) -> String {
        self.hash().to_hex()
    }

    /// Get the serial number
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Get the creation timestamp (Unix epoch seconds)
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get the predecessor's commitment hash
    pub fn prev_hash(&self) -> &Hash {
        &self.prev_hash
    }

    /// Get the predecessor's commitment hash as a hex string
    pub fn prev_hash_hex(&self) -> String {
        self.prev_hash.to_hex()
    }

    /// Get the payload
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// True if this node was never initialized as a genesis node or a real
    /// chain node.
    ///
    /// Detects both the default-constructed sentinel (timestamp 0) and a
    /// serial-0 node whose payload is not the genesis payload. A properly
    /// reconstructed genesis node is not flagged.
    pub fn is_uninitialized(&self) -> bool {
        self.timestamp == 0 || (self.serial == 0 && self.payload != GENESIS_PAYLOAD)
    }

    /// Human-readable report of the node and its payload.
    ///
    /// With `verbose`, also includes the previous and current hash as hex.
    pub fn info(&self, verbose: bool) -> String {
        let mut out = String::new();
        let sep = if verbose { '\n' } else { '\t' };
        let _ = write!(out, "Serial:     {}{}", self.serial, sep);
        let _ = writeln!(out, "Timestamp : {}", self.timestamp);
        if verbose {
            let _ = writeln!(out, "Prev Hash : {}", self.prev_hash_hex());
        }
        let _ = writeln!(out, "Payload:");
        let _ = writeln!(out, "{}", self.payload);
        if verbose {
            let _ = writeln!(out, "This Hash : {}", self.hash_hex());
        }
        out
    }
}

impl Default for HashChainNode {
    fn default() -> Self {
        Self::uninitialized()
    }
}

/// Current wall-clock time as Unix epoch seconds
fn unix_time_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs() as i64
}

//! Hash Chain Core Library
//!
//! A tamper-evident linked record ("hash-chain node") for building
//! append-only, verifiable logs. Each node commits to its own content and
//! to the commitment hash of its predecessor, so any alteration of
//! historical data shows up as a hash mismatch.
//!
//! Nodes are value-immutable, carry a variable-length string payload, and
//! round-trip through a canonical tilde-delimited text encoding.

pub mod chain;
pub mod codec;
pub mod crypto;
pub mod node;

/// Protocol constants - fixed wire-format values, never configurable
pub mod constants {
    /// Field separator for text-encoded records
    pub const FIELD_SEP: char = '~';

    /// Payload of the distinguished first node in a chain
    pub const GENESIS_PAYLOAD: &str = "Genesis Node";

    /// Payload of the uninitialized sentinel node
    pub const UNINITIALIZED_PAYLOAD: &str = "Invalid";

    /// Length of a hex-encoded hash (32 bytes, 2 hex digits each)
    pub const HASH_HEX_LEN: usize = 64;
}

//! Node module - the hash-chain record and its constructors

mod record;

pub use record::*;

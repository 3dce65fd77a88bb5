//! Shared foundational types used across the weft circuit compiler.
//!
//! This crate provides content hashing and the identifier digest that turns
//! editor-generated block ids and type names into legal HDL identifiers.

#![warn(missing_docs)]

pub mod digest;
pub mod hash;

pub use digest::{digest_id, DIGEST_PREFIX, DIGEST_WIDTH, GENERATED_ID_SEPARATOR};
pub use hash::ContentHash;

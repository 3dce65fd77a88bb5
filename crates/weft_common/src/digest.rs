//! Identifier digest: short, syntactically valid names for emitted HDL.
//!
//! The editor generates block ids like `5f3c0d2e-8c1b-4b1e-9a55-0f0e2b1c7d40`
//! and dependency type names derived from content hashes. Neither is a legal
//! Verilog identifier. Ids containing [`GENERATED_ID_SEPARATOR`] are hashed and
//! truncated to [`DIGEST_WIDTH`] hex characters; literal ids are kept verbatim.
//! Either way the result is prefixed with [`DIGEST_PREFIX`] so it never starts
//! with a digit.
//!
//! Truncation means two distinct generated ids can collide. With 24 bits of
//! hash the risk is negligible for editor-sized designs and is not checked.

use crate::hash::ContentHash;

/// Character marking an id as editor-generated rather than user-written.
pub const GENERATED_ID_SEPARATOR: char = '-';

/// Number of hex characters kept from the hash of a generated id.
pub const DIGEST_WIDTH: usize = 6;

/// Letter prepended to every digested identifier.
pub const DIGEST_PREFIX: char = 'v';

/// Maps a raw block id or type name to an output identifier.
pub fn digest_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 1);
    out.push(DIGEST_PREFIX);
    if id.contains(GENERATED_ID_SEPARATOR) {
        out.push_str(&ContentHash::from_text(id).short_hex(DIGEST_WIDTH));
    } else {
        out.push_str(id);
    }
    out
}

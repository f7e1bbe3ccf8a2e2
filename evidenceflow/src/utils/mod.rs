//! Utility functions for timestamps, URLs, unique file names and content hashing.

mod files;
pub mod timestamps;
mod url;

pub use files::create_unique;
pub use timestamps::{day_stamp, file_stamp, iso_format, iso_timestamp, now_utc, Timestamp};
pub use url::normalize_url;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from an integrity digest.
pub const HASH_PREFIX_LEN: usize = 16;

/// Truncated SHA-256 hex digest of `text`.
///
/// Used for tamper evidence in the audit trail; the same input always yields
/// the same 16-character prefix.
#[must_use]
pub fn hash_text(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_PREFIX_LEN);
    hex
}

use sha2::{Digest, Sha512};

/// Hex-encoded SHA-512 digest length.
pub const SHA512_HEX_LENGTH: usize = 128;

/// Hash a client IP address into its hex-encoded SHA-512 digest.
///
/// Only the digest is ever persisted, raw addresses are not stored.
///
/// ## Example
///
/// ```
/// use common::hash::{sha512_hex, SHA512_HEX_LENGTH};
///
/// assert_eq!(sha512_hex("127.0.0.1").len(), SHA512_HEX_LENGTH);
/// ```
pub fn sha512_hex(data: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

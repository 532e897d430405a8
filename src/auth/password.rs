use sha2::{Digest, Sha256};

/// One-way digest of a plaintext credential: SHA-256 over the UTF-8 bytes,
/// rendered as lowercase hex. Storage only ever holds this digest.
///
/// Unsalted, single fixed-cost digest by preserved contract with the
/// existing user table; do not swap the scheme without re-hashing stored
/// credentials.
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Exact string comparison of the freshly computed digest against the
/// stored one.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    hash_password(plaintext) == digest
}

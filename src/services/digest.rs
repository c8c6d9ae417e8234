//! SHA-256 content digests for uploaded files.

use sha2::{Digest, Sha256};

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(bytes));
    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

/// Byte-for-byte comparison of a stored hex digest against a computed one.
/// A stored value that is not valid hex never matches.
pub fn matches(stored_hex: &str, digest: &[u8]) -> bool {
    match hex::decode(stored_hex.trim()) {
        Ok(stored) => stored.as_slice() == digest,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn matching_is_exact() {
        let digest = sha256(b"original contract");
        let stored = sha256_hex(b"original contract");

        assert!(matches(&stored, &digest));
        assert!(matches(&stored.to_uppercase(), &digest));
        assert!(!matches(&stored, &sha256(b"original contract.")));
        assert!(!matches("not-hex", &digest));
        assert!(!matches(&stored[..62], &digest));
    }
}

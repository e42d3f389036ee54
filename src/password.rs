//! Class password hashing.
//!
//! WARNING: this is a single unsalted round of SHA-256, which is what existing databases store.
//! It keeps casual eyes off the password table and nothing more. Do not reuse it for anything
//! that needs real credential storage.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of `plain`.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn distinct_passwords_hash_differently() {
        assert_ne!(hash_password("secret"), hash_password("Secret"));
        assert_eq!(hash_password("secret").len(), 64);
    }
}

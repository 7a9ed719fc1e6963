//! One-way credential digest.
//!
//! Stored credentials are a single-round, unsalted SHA-256 hex digest. This
//! matches the stored-credential format already in the field; switching to a
//! salted, iterated scheme changes that format and is a migration decision,
//! not a drop-in swap.

use sha2::{Digest, Sha256};

use stockbook_core::{Error, Result};

/// Hash a plaintext credential into its stored form.
pub fn hash_credential(credential: &str) -> Result<String> {
    if credential.is_empty() {
        return Err(Error::validation("credential must not be empty"));
    }
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a supplied plaintext credential against a stored digest.
///
/// Comparison walks the full length regardless of where the first mismatch
/// occurs, to avoid an early-exit timing signal.
pub fn verify_credential(stored_hash: &str, supplied: &str) -> Result<bool> {
    let supplied_hash = hash_credential(supplied)?;
    let stored = stored_hash.as_bytes();
    let candidate = supplied_hash.as_bytes();
    if stored.len() != candidate.len() {
        return Ok(false);
    }
    let mut diff = 0u8;
    for (a, b) in stored.iter().zip(candidate.iter()) {
        diff |= a ^ b;
    }
    Ok(diff == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_credential_verifies() {
        let stored = hash_credential("hunter2").unwrap();
        assert!(verify_credential(&stored, "hunter2").unwrap());
    }

    #[test]
    fn wrong_credential_fails() {
        let stored = hash_credential("hunter2").unwrap();
        assert!(!verify_credential(&stored, "hunter3").unwrap());
    }

    #[test]
    fn empty_credential_is_rejected_up_front() {
        assert!(matches!(
            hash_credential(""),
            Err(Error::Validation(_))
        ));
        let stored = hash_credential("x").unwrap();
        assert!(verify_credential(&stored, "").is_err());
    }

    #[test]
    fn digest_is_stable_hex_sha256() {
        // Known vector: sha256("abc").
        assert_eq!(
            hash_credential("abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// One-way digest of a plaintext password, stored as an argon2 PHC string.
pub fn digest_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password digest failed");
            anyhow::anyhow!("password digest failed: {e}")
        })
}

/// A stored digest that does not parse is an error, not a mismatch.
pub fn password_matches(plain: &str, stored_digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_digest).map_err(|e| {
        error!(error = %e, "stored password digest is corrupt");
        anyhow::anyhow!("stored password digest is corrupt: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_original_password() {
        let digest = digest_password("ihfeh3hgi00d").expect("digest should succeed");
        assert_ne!(digest, "ihfeh3hgi00d");
        assert!(password_matches("ihfeh3hgi00d", &digest).expect("match should succeed"));
    }

    #[test]
    fn digest_rejects_other_password() {
        let digest = digest_password("Qwerty6").expect("digest should succeed");
        assert!(!password_matches("Qwerty8", &digest).expect("match should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = digest_password("abcdef").expect("digest a");
        let b = digest_password("abcdef").expect("digest b");
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_digest_is_an_error() {
        let err = password_matches("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }
}

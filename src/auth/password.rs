use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Salted one-way hash of a donor's password. A fresh salt is drawn per call,
/// so hashing the same plaintext twice yields different strings.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Check a plaintext against a stored hash. `false` on mismatch; a hash that
/// does not parse as a PHC string is an error.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("stored hash is invalid: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_and_differs_from_plaintext() {
        let password = "d0nate-blood!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let first = hash_password("d0nate-blood!").unwrap();
        let second = hash_password("d0nate-blood!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_password_is_rejected_without_error() {
        let hash = hash_password("right-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}

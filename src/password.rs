use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{rand_core::OsRng, PasswordHash, SaltString};

/// Hash a plaintext password with Argon2id and a fresh random salt,
/// returning the PHC-format string that gets stored on the user record.
pub fn hash(plaintext: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored PHC hash.
/// A malformed hash verifies as `false` rather than erroring — a corrupt
/// record must read as "wrong password", not take the server down.
pub fn verify(plaintext: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_and_rejects_wrong_password() {
        let stored = hash("purple-monkey-dinosaur").unwrap();
        assert!(verify("purple-monkey-dinosaur", &stored));
        assert!(!verify("dishwasher-funk", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}

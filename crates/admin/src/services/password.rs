//! Password hashing and generation.
//!
//! Passwords are stored only as bcrypt hashes. New SAAS admins get a
//! generated password delivered by email; they are expected to change it on
//! first login.

use rand::seq::{IndexedRandom, SliceRandom};

/// Length of generated passwords.
pub const GENERATED_PASSWORD_LENGTH: usize = 12;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{}<>?";

/// Hash a password with bcrypt at the default cost.
///
/// # Errors
///
/// Returns `bcrypt::BcryptError` if hashing fails.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
}

/// Verify a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns `bcrypt::BcryptError` if the stored hash is malformed.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(plain, hash)
}

/// Generate a random password containing at least one uppercase letter, one
/// lowercase letter, one digit, and one special character.
#[must_use]
pub fn generate_password(length: usize) -> String {
    let length = length.max(4);
    let mut rng = rand::rng();

    let mut chars: Vec<u8> = vec![
        pick(&mut rng, UPPERCASE),
        pick(&mut rng, LOWERCASE),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL),
    ];

    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL].concat();
    for _ in chars.len()..length {
        chars.push(pick(&mut rng, &all));
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

fn pick(rng: &mut impl rand::Rng, set: &[u8]) -> u8 {
    // The character sets are non-empty constants.
    set.choose(rng).copied().unwrap_or(b'x')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("s3cure-Pa55!").unwrap();
        assert!(verify_password("s3cure-Pa55!", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_not_the_plaintext() {
        let hash = hash_password("s3cure-Pa55!").unwrap();
        assert_ne!(hash, "s3cure-Pa55!");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_generated_password_has_all_character_classes() {
        for _ in 0..20 {
            let password = generate_password(GENERATED_PASSWORD_LENGTH);
            assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| !c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generated_password_minimum_length() {
        // Shorter than four characters cannot hold all classes.
        assert_eq!(generate_password(1).len(), 4);
    }

    #[test]
    fn test_generated_passwords_differ() {
        let a = generate_password(GENERATED_PASSWORD_LENGTH);
        let b = generate_password(GENERATED_PASSWORD_LENGTH);
        assert_ne!(a, b);
    }
}

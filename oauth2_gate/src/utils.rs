use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

pub(crate) fn base64url_encode(input: Vec<u8>) -> Result<String, UtilError> {
    Ok(URL_SAFE_NO_PAD.encode(input))
}

/// Generate `len` random bytes from the system RNG, base64url encoded without padding.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    let encoded = base64url_encode(bytes)
        .map_err(|_| UtilError::Crypto("Failed to encode random string".to_string()))?;
    Ok(encoded)
}

/// Returns true if `s` looks like a value produced by `gen_random_string(len)`.
pub(crate) fn is_random_token(s: &str, len: usize) -> bool {
    // base64url without padding: 4 chars per 3 bytes, rounded up
    let expected = (len * 4).div_ceil(3);
    s.len() == expected
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_string_length() {
        // 32 bytes encode to 43 base64url characters
        let token = gen_random_string(32).expect("RNG should be available");
        assert_eq!(token.len(), 43);
        assert!(is_random_token(&token, 32));
    }

    #[test]
    fn test_gen_random_string_unique() {
        let a = gen_random_string(32).expect("RNG should be available");
        let b = gen_random_string(32).expect("RNG should be available");
        assert_ne!(a, b, "Two generated tokens should differ");
    }

    #[test]
    fn test_is_random_token_rejects_foreign_values() {
        assert!(!is_random_token("", 32));
        assert!(!is_random_token("short", 32));
        // Right length but contains characters outside the base64url alphabet
        let bad = format!("{}:", "a".repeat(42));
        assert!(!is_random_token(&bad, 32));
        let padded = format!("{}=", "a".repeat(42));
        assert!(!is_random_token(&padded, 32));
    }
}

// utils/otp_generator.rs
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Uniform random 6-digit code.
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(100000..=999999))
}

/// Codes are stored hashed, never in plaintext.
pub fn hash_otp(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    hex::encode(digest)
}

/// Constant-time comparison of a submitted code against the stored hash.
pub fn verify_otp(code: &str, stored_hash: &str) -> bool {
    let digest = Sha256::digest(code.as_bytes());
    match hex::decode(stored_hash) {
        Ok(stored) => digest.as_slice().ct_eq(stored.as_slice()).into(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100000..=999999).contains(&n));
        }
    }

    #[test]
    fn hash_round_trip_verifies() {
        let code = "483920";
        let hash = hash_otp(code);
        assert!(verify_otp(code, &hash));
        assert!(!verify_otp("483921", &hash));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_otp("123456", "not-hex"));
    }
}

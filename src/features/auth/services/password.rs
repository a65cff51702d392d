use crate::core::error::{AppError, Result};

/// One-way credential hashing seam.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// bcrypt-backed hasher with a configurable work factor
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("Abc12345").unwrap();

        assert!(hasher.verify("Abc12345", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn verify_tolerates_invalid_hash() {
        let hasher = BcryptHasher::new(4);

        assert!(!hasher.verify("Abc12345", "not-a-bcrypt-hash"));
    }
}

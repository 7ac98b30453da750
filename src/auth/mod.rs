use std::sync::Arc;

use thiserror::Error;
use tokio::task;

/// Errors from password hashing and verification
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

// Verified against when a login name is unknown so both failure paths cost one bcrypt check
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Salted bcrypt hashing with a configurable work factor.
///
/// Both operations run on tokio's blocking pool; bcrypt is deliberately slow
/// and would otherwise stall the async workers serving other requests.
#[derive(Clone, Debug)]
pub struct CredentialService {
    cost: u32,
    decoy_digest: Arc<str>,
}

impl CredentialService {
    pub async fn new(cost: u32) -> Result<Self, CredentialError> {
        let decoy_digest = Self::hash_with_cost(DECOY_PASSWORD.to_string(), cost).await?;
        Ok(Self {
            cost,
            decoy_digest: decoy_digest.into(),
        })
    }

    /// Hash a plaintext password. Every call draws a fresh salt.
    pub async fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        Self::hash_with_cost(plaintext.to_string(), self.cost).await
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A malformed digest is an error, not a mismatch.
    pub async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, CredentialError> {
        let plaintext = plaintext.to_string();
        let digest = digest.to_string();
        let matches = task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await??;
        Ok(matches)
    }

    /// Spend one verification on the decoy digest and report a mismatch.
    pub async fn verify_decoy(&self, plaintext: &str) -> Result<bool, CredentialError> {
        self.verify(plaintext, &self.decoy_digest).await?;
        Ok(false)
    }

    async fn hash_with_cost(plaintext: String, cost: u32) -> Result<String, CredentialError> {
        let digest = task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(digest)
    }
}

//! Signing of server-issued challenges.
//!
//! # Data Flow
//! ```text
//! challenge message (from SignedWriteClient::request_challenge)
//!     → MessageSigner::sign_message (wallet, hardware device, browser, ...)
//!     → hex signature
//!     → SignedMutation
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or explicit arguments
//! - Never log private keys or signatures' key material

pub mod wallet;

use async_trait::async_trait;
use thiserror::Error;

pub use wallet::{Wallet, PRIVATE_KEY_ENV_VAR};

/// Errors raised by a signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// Key material is missing.
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// Key material is malformed.
    #[error("Invalid private key format: {0}")]
    InvalidKey(String),

    /// The signing operation itself failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Something that can sign a challenge message verbatim.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Address the backend will attribute the signature to.
    fn address(&self) -> String;

    /// Sign `message` and return the signature in the backend's format.
    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;
}

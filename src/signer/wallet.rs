//! Local-key signer.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or arguments
//! - Keys are never logged or serialized

use alloy::primitives::{hex, Address};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;

use crate::signer::{MessageSigner, SignerError};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "BUIDL_SIGNER_PRIVATE_KEY";

/// secp256k1 wallet producing EIP-191 personal-message signatures.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, SignerError> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| SignerError::InvalidKey(format!("{}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from `BUIDL_SIGNER_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, SignerError> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Load wallet from a named environment variable.
    pub fn from_env_var(var: &str) -> Result<Self, SignerError> {
        let private_key = std::env::var(var).map_err(|_| {
            SignerError::MissingKey(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// The wallet's checksummed address.
    pub fn eth_address(&self) -> Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .finish()
    }
}

#[async_trait]
impl MessageSigner for Wallet {
    fn address(&self) -> String {
        self.signer.address().to_string()
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

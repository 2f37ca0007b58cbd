//! Cryptographic primitives for KingCoin
//!
//! The core never stores keys itself; parties own a [`KeyPair`] and the
//! ledger re-verifies every signature independently through
//! [`verify_signature`].

use crate::error::CoinError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Compressed public key bytes, the stable identifier for a party inside
/// transactions.
pub type PubKeyBytes = [u8; PUBLIC_KEY_SIZE];

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Result<Self, CoinError> {
        let secret_key = SecretKey::new(&mut OsRng);
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        Ok(KeyPair {
            secret_key,
            public_key,
        })
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CoinError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                CoinError::CryptoError(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                CoinError::CryptoError(format!("Invalid secret key bytes: {}", e))
            }
        })?;
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        Ok(KeyPair {
            secret_key,
            public_key,
        })
    }

    /// Returns the KeyPair's public key as a compressed byte array.
    pub fn public_key_bytes(&self) -> PubKeyBytes {
        self.public_key.serialize()
    }

    /// Signs a payload (which is first hashed using SHA-256) and returns the
    /// compact signature bytes.
    pub fn sign(&self, payload: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], CoinError> {
        let digest = Sha256::digest(payload);

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| CoinError::CryptoError(format!("Failed to create message: {}", e)))?;

        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);

        Ok(signature.serialize_compact())
    }
}

/// Verifies an ECDSA signature given the raw public key bytes, payload, and
/// signature bytes.
///
/// Three outcomes, kept distinguishable: `Ok(())` when the signature
/// verifies, [`CoinError::SignatureInvalid`] when well-formed inputs fail
/// verification, and [`CoinError::CryptoError`] when an input is malformed
/// (wrong length, undecodable key or signature).
pub fn verify_signature(
    public_key_bytes: &[u8],
    payload: &[u8],
    signature_bytes: &[u8],
) -> Result<(), CoinError> {
    if public_key_bytes.len() != PUBLIC_KEY_SIZE {
        return Err(CoinError::CryptoError(format!(
            "Public key must be exactly {} bytes (compressed), got {}",
            PUBLIC_KEY_SIZE,
            public_key_bytes.len()
        )));
    }
    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(CoinError::CryptoError(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }

    let public_key = PublicKey::from_slice(public_key_bytes)
        .map_err(|e| CoinError::CryptoError(format!("Invalid public key: {}", e)))?;

    let digest = Sha256::digest(payload);

    let message = Message::from_digest_slice(&digest)
        .map_err(|e| CoinError::CryptoError(format!("Failed to create message: {}", e)))?;

    let signature = Signature::from_compact(signature_bytes)
        .map_err(|e| CoinError::CryptoError(format!("Invalid signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| CoinError::SignatureInvalid)
}

//! Error types for KingCoin

use std::fmt;

#[derive(Debug, Clone)]
pub enum CoinError {
    /// A party tried to transfer a coin absent from its held set.
    CoinNotHeld(String),
    /// A well-formed signature did not verify against the claimed signer's
    /// public key and payload.
    SignatureInvalid,
    /// A transfer references a coin with no prior transaction in the ledger.
    BrokenChain(String),
    /// The signer of a transfer is not the recipient of record of the coin's
    /// previous transaction. Distinct from `SignatureInvalid`: the signature
    /// itself may verify, the authorization is what fails.
    UnauthorizedSender(String),
    /// A holder attempted an issuer-only operation.
    NotIssuer(String),
    UnknownParty(String),
    TransactionNotFound(usize),
    CryptoError(String),
    ConfigError(String),
}

impl fmt::Display for CoinError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoinError::CoinNotHeld(coin) => write!(f, "Coin not held by sender: {}", coin),
            CoinError::SignatureInvalid => write!(f, "Signature verification failed"),
            CoinError::BrokenChain(coin) => write!(f, "Broken chain of custody for coin: {}", coin),
            CoinError::UnauthorizedSender(msg) => write!(f, "Unauthorized sender: {}", msg),
            CoinError::NotIssuer(name) => write!(f, "Party {} is not an issuer", name),
            CoinError::UnknownParty(name) => write!(f, "Unknown party: {}", name),
            CoinError::TransactionNotFound(index) => {
                write!(f, "No transaction at ledger index {}", index)
            }
            CoinError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            CoinError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CoinError {}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, CoinError>;

//! Transaction types for KingCoin
//!
//! A transaction is an immutable signed record of a mint or transfer event.
//! Parties are referenced by their compressed public-key bytes plus a display
//! name, never by object reference.

use crate::coin::{Coin, CoinId};
use crate::crypto;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    Mint,
    Transfer,
}

/// The signed content of a mint: the coin id alone.
pub fn mint_payload(coin_id: &CoinId) -> Vec<u8> {
    coin_id.to_vec()
}

/// The signed content of a transfer: the coin id concatenated with the
/// recipient's compressed public key. The encoding is fixed so any observer
/// can rebuild the exact bytes the sender signed.
pub fn transfer_payload(coin_id: &CoinId, recipient_key: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(coin_id.len() + recipient_key.len());
    payload.extend_from_slice(coin_id);
    payload.extend_from_slice(recipient_key);
    payload
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TxKind,
    pub coin: Coin,
    pub currency: String,
    /// The exact bytes the signer signed
    pub payload: Vec<u8>,
    pub signer_name: String,
    pub signer_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub recipient_name: Option<String>,
    pub recipient_key: Option<Vec<u8>>,
}

impl Transaction {
    pub fn mint(coin: Coin, signer_name: &str, signer_key: &[u8], signature: Vec<u8>) -> Self {
        let payload = mint_payload(&coin.id);
        let currency = coin.currency.clone();
        Transaction {
            kind: TxKind::Mint,
            coin,
            currency,
            payload,
            signer_name: signer_name.to_string(),
            signer_key: signer_key.to_vec(),
            signature,
            recipient_name: None,
            recipient_key: None,
        }
    }

    pub fn transfer(
        coin: Coin,
        signer_name: &str,
        signer_key: &[u8],
        signature: Vec<u8>,
        recipient_name: &str,
        recipient_key: &[u8],
    ) -> Self {
        let payload = transfer_payload(&coin.id, recipient_key);
        let currency = coin.currency.clone();
        Transaction {
            kind: TxKind::Transfer,
            coin,
            currency,
            payload,
            signer_name: signer_name.to_string(),
            signer_key: signer_key.to_vec(),
            signature,
            recipient_name: Some(recipient_name.to_string()),
            recipient_key: Some(recipient_key.to_vec()),
        }
    }

    /// Re-verifies this record's signature over its payload under the
    /// claimed signer's key. Never trusted blindly; the ledger calls this on
    /// every validation.
    pub fn verify_signature(&self) -> Result<()> {
        crypto::verify_signature(&self.signer_key, &self.payload, &self.signature)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TxKind::Mint => write!(f, "Mint({} by {})", self.coin, self.signer_name),
            TxKind::Transfer => write!(
                f,
                "Transfer({} from {} to {})",
                self.coin,
                self.signer_name,
                self.recipient_name.as_deref().unwrap_or("?")
            ),
        }
    }
}

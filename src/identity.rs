//! Party identity: a display name plus an asymmetric key pair.
//!
//! The signing capability is crate-private; only the owning [`Party`]
//! (through this type) can produce signatures, while the public key is free
//! to circulate.
//!
//! [`Party`]: crate::party::Party

use crate::crypto::{KeyPair, PubKeyBytes};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Identity {
    name: String,
    keypair: KeyPair,
}

impl Identity {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Identity {
            name: name.to_string(),
            keypair: KeyPair::generate()?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> PubKeyBytes {
        self.keypair.public_key_bytes()
    }

    /// Signs a payload with the private capability. Crate-private: the
    /// capability never leaves the owning party.
    pub(crate) fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        Ok(self.keypair.sign(payload)?.to_vec())
    }
}

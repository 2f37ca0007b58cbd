//! Parties: the issuer that mints coins and the holders that receive them.
//!
//! Both roles share the held-coin set; only the issuer may mint. A send
//! debits the sender's held set at signing time, while crediting the
//! recipient is the orchestrating caller's responsibility once the ledger
//! has validated the transfer. That split is what gives the chain-of-custody
//! check something to verify.

use crate::coin::{self, Coin};
use crate::crypto::PubKeyBytes;
use crate::error::{CoinError, Result};
use crate::identity::Identity;
use crate::transaction::{self, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Issuer,
    Holder,
}

#[derive(Debug)]
pub struct Party {
    identity: Identity,
    role: Role,
    held: HashSet<Coin>,
}

impl Party {
    pub fn issuer(name: &str) -> Result<Self> {
        Ok(Party {
            identity: Identity::new(name)?,
            role: Role::Issuer,
            held: HashSet::new(),
        })
    }

    pub fn holder(name: &str) -> Result<Self> {
        Ok(Party {
            identity: Identity::new(name)?,
            role: Role::Holder,
            held: HashSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn public_key(&self) -> PubKeyBytes {
        self.identity.public_key()
    }

    /// Count of held coins; every coin is denomination 1.
    pub fn balance(&self) -> usize {
        self.held.len()
    }

    pub fn holds(&self, coin: &Coin) -> bool {
        self.held.contains(coin)
    }

    pub fn held_coins(&self) -> impl Iterator<Item = &Coin> {
        self.held.iter()
    }

    /// Mints a new coin: issuer only. Draws a fresh id, signs it, adds the
    /// coin to the held set, and returns the Mint transaction for the caller
    /// to append to the ledger.
    pub fn mint_coin(&mut self, currency: &str) -> Result<Transaction> {
        if self.role != Role::Issuer {
            return Err(CoinError::NotIssuer(self.name().to_string()));
        }

        let coin = Coin::new(coin::next_id(), currency);
        let signature = self.identity.sign(&transaction::mint_payload(&coin.id))?;
        let tx = Transaction::mint(
            coin.clone(),
            self.name(),
            &self.identity.public_key(),
            signature,
        );
        self.held.insert(coin);
        Ok(tx)
    }

    /// Signs a transfer of `coin` to the named recipient and debits the held
    /// set. Fails with `CoinNotHeld` before any signature or mutation if the
    /// coin is absent. The recipient's held set grows only when the caller
    /// credits it after validation.
    pub fn send_coin_to(
        &mut self,
        recipient_name: &str,
        recipient_key: &PubKeyBytes,
        coin: &Coin,
    ) -> Result<Transaction> {
        if !self.held.contains(coin) {
            return Err(CoinError::CoinNotHeld(coin.to_string()));
        }

        let payload = transaction::transfer_payload(&coin.id, recipient_key);
        let signature = self.identity.sign(&payload)?;
        let tx = Transaction::transfer(
            coin.clone(),
            self.name(),
            &self.identity.public_key(),
            signature,
            recipient_name,
            recipient_key,
        );
        self.held.remove(coin);
        Ok(tx)
    }

    /// Caller-side credit, to be invoked only after the ledger validated the
    /// corresponding transfer.
    pub fn receive(&mut self, coin: Coin) {
        self.held.insert(coin);
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.role {
            Role::Issuer => write!(f, "Issuer(name={}, balance={})", self.name(), self.balance()),
            Role::Holder => write!(f, "Holder(name={}, balance={})", self.name(), self.balance()),
        }
    }
}

//! Coin value type

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque coin identifier, unique within a run
pub type CoinId = [u8; 8];

/// Draws a fresh random coin id from the OS random number generator.
/// Collision-free for the scope of a single run; global uniqueness is not
/// enforced by the core.
pub fn next_id() -> CoinId {
    let mut id = [0u8; 8];
    OsRng.fill_bytes(&mut id);
    id
}

/// An indivisible, uniquely-identified unit of a named currency.
/// Immutable once minted; two coins are equal iff id and currency match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub currency: String,
}

impl Coin {
    pub fn new(id: CoinId, currency: &str) -> Self {
        Coin {
            id,
            currency: currency.to_string(),
        }
    }

    pub fn id_hex(&self) -> String {
        hex::encode(self.id)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.currency, self.id_hex())
    }
}

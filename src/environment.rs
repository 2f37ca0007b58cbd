//! Scenario orchestration: wires parties and the ledger together.
//!
//! An [`Environment`] is an explicit context object owning the issuer, the
//! holders, and the ledger; there are no process-wide singletons. Transfers
//! run in two phases: the sender signs and debits itself, the entry is
//! appended, and only after validation succeeds does the recipient get
//! credited. A rejected entry stays in the ledger as an audit record.

use crate::coin::Coin;
use crate::config::Config;
use crate::error::{CoinError, Result};
use crate::ledger::Ledger;
use crate::party::Party;
use crate::transaction::Transaction;
use tracing::{info, warn};

pub struct Environment {
    config: Config,
    issuer: Party,
    holders: Vec<Party>,
    ledger: Ledger,
}

impl Environment {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let issuer = Party::issuer(&config.issuer_name)?;
        let holders = config
            .holder_names
            .iter()
            .map(|name| Party::holder(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Environment {
            config,
            issuer,
            holders,
            ledger: Ledger::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn parties(&self) -> impl Iterator<Item = &Party> {
        std::iter::once(&self.issuer).chain(self.holders.iter())
    }

    pub fn party(&self, name: &str) -> Result<&Party> {
        self.parties()
            .find(|p| p.name() == name)
            .ok_or_else(|| CoinError::UnknownParty(name.to_string()))
    }

    fn party_mut(&mut self, name: &str) -> Result<&mut Party> {
        if self.issuer.name() == name {
            return Ok(&mut self.issuer);
        }
        self.holders
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| CoinError::UnknownParty(name.to_string()))
    }

    pub fn balance_of(&self, name: &str) -> Result<usize> {
        Ok(self.party(name)?.balance())
    }

    /// Mints a coin, appends the Mint transaction, and validates it.
    pub fn mint(&mut self) -> Result<Coin> {
        let tx = self.issuer.mint_coin(&self.config.currency)?;
        let coin = tx.coin.clone();
        let index = self.ledger.append(tx);
        self.ledger.validate(index)?;
        info!("minted {} at ledger index {}", coin, index);
        Ok(coin)
    }

    /// Two-phase transfer: sign-and-debit, append, validate, credit.
    /// On validation failure the recipient is never credited and the entry
    /// remains in the ledger; the ledger does not roll back.
    pub fn transfer(&mut self, from: &str, to: &str, coin: &Coin) -> Result<usize> {
        let (recipient_name, recipient_key) = {
            let recipient = self.party(to)?;
            (recipient.name().to_string(), recipient.public_key())
        };

        let sender = self.party_mut(from)?;
        let tx = sender.send_coin_to(&recipient_name, &recipient_key, coin)?;
        let index = self.ledger.append(tx);

        match self.ledger.validate(index) {
            Ok(()) => {
                self.party_mut(to)?.receive(coin.clone());
                info!("{} sent {} to {} (ledger index {})", from, coin, to, index);
                Ok(index)
            }
            Err(e) => {
                warn!("transfer of {} from {} to {} rejected: {}", coin, from, to, e);
                Err(e)
            }
        }
    }

    /// Drives the canonical scenario: the issuer mints a coin, passes it to
    /// the first holder, who passes it to the second; then two forgery
    /// probes confirm the issuer can no longer move the coin.
    pub fn run_scenario(&mut self) -> Result<()> {
        if self.holders.len() < 2 {
            return Err(CoinError::ConfigError(
                "scenario needs at least two holders".to_string(),
            ));
        }
        let issuer_name = self.config.issuer_name.clone();
        let first = self.holders[0].name().to_string();
        let second = self.holders[1].name().to_string();

        let coin = self.mint()?;
        self.transfer(&issuer_name, &first, &coin)?;
        self.transfer(&first, &second, &coin)?;

        // Probe: the issuer tries to send the coin again. It debited itself
        // when it paid the first holder, so the attempt dies before any
        // signature or ledger mutation.
        match self.transfer(&issuer_name, &second, &coin) {
            Err(CoinError::CoinNotHeld(_)) => {
                info!("{} no longer holds {}, resend refused", issuer_name, coin)
            }
            Ok(_) => {
                return Err(CoinError::CryptoError(
                    "spent coin was sent twice".to_string(),
                ))
            }
            Err(e) => return Err(e),
        }

        // Probe: a forged entry claiming the coin went straight to the
        // second holder, carrying the mint signature over a payload the
        // issuer never signed. The validator must reject it on signature
        // grounds alone.
        let issuer_key = self.issuer.public_key();
        let second_key = self.party(&second)?.public_key();
        let mint_signature = self
            .ledger
            .history(&coin.id)
            .first()
            .map(|tx| tx.signature.clone())
            .ok_or_else(|| CoinError::BrokenChain(coin.to_string()))?;
        let forged = Transaction::transfer(
            coin.clone(),
            &issuer_name,
            &issuer_key,
            mint_signature,
            &second,
            &second_key,
        );
        let forged_index = self.ledger.append(forged);
        match self.ledger.validate(forged_index) {
            Err(CoinError::SignatureInvalid) => {
                info!(
                    "{} couldn't have sent {} to {}: forged entry rejected",
                    issuer_name, coin, second
                );
                Ok(())
            }
            Ok(()) => Err(CoinError::CryptoError(
                "forged transfer unexpectedly verified".to_string(),
            )),
            Err(e) => Err(e),
        }
    }
}

//! The append-only transaction ledger and its chain-of-custody validator.
//!
//! Entries are never removed or reordered; append order is the sole source
//! of truth for "prior". Validation is pure: the same index on an unchanged
//! ledger always yields the same verdict, and invalid entries stay in place
//! as audit records.

use crate::coin::CoinId;
use crate::error::{CoinError, Result};
use crate::transaction::{Transaction, TxKind};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Serialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    /// Ledger positions per coin id, ascending. Maintained on append so a
    /// validation can find a coin's predecessor without scanning the whole
    /// ledger.
    #[serde(skip)]
    coin_index: HashMap<CoinId, Vec<usize>>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Appends a transaction and returns its ledger index. Appending never
    /// implies validity; callers run [`validate`](Self::validate) on the
    /// returned index before committing any state change.
    pub fn append(&mut self, tx: Transaction) -> usize {
        let index = self.transactions.len();
        self.coin_index.entry(tx.coin.id).or_default().push(index);
        self.transactions.push(tx);
        index
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// A coin's full history: every transaction naming its id, in ledger
    /// order.
    pub fn history(&self, coin_id: &CoinId) -> Vec<&Transaction> {
        self.coin_index
            .get(coin_id)
            .map(|positions| positions.iter().map(|&i| &self.transactions[i]).collect())
            .unwrap_or_default()
    }

    /// The most recent transaction for `coin_id` strictly before `index`.
    fn predecessor(&self, coin_id: &CoinId, index: usize) -> Option<usize> {
        let positions = self.coin_index.get(coin_id)?;
        let at = match positions.binary_search(&index) {
            Ok(at) | Err(at) => at,
        };
        if at == 0 {
            None
        } else {
            Some(positions[at - 1])
        }
    }

    /// Chain-of-custody validation for the entry at `index`.
    ///
    /// A mint is valid when its own signature verifies: it is the root of
    /// trust for its coin. A transfer must additionally be signed by the
    /// recipient of record of the coin's immediately preceding transaction
    /// (the minter stands in as the implicit recipient at the root), and
    /// that predecessor must itself validate, all the way back to the mint.
    /// A single broken link invalidates every later transfer of the coin.
    pub fn validate(&self, index: usize) -> Result<()> {
        let tx = self
            .transactions
            .get(index)
            .ok_or(CoinError::TransactionNotFound(index))?;

        // The signer authored this exact payload. Necessary but not
        // sufficient: a party can sign a transfer for a coin it never held.
        tx.verify_signature()?;

        if tx.kind == TxKind::Mint {
            return Ok(());
        }

        let prev_index = self
            .predecessor(&tx.coin.id, index)
            .ok_or_else(|| CoinError::BrokenChain(tx.coin.to_string()))?;
        let prev = &self.transactions[prev_index];

        let authorized: &[u8] = match prev.kind {
            TxKind::Mint => &prev.signer_key,
            TxKind::Transfer => prev
                .recipient_key
                .as_deref()
                .ok_or_else(|| CoinError::BrokenChain(tx.coin.to_string()))?,
        };
        if tx.signer_key != authorized {
            return Err(CoinError::UnauthorizedSender(format!(
                "{} is not the holder of record of coin {}",
                tx.signer_name, tx.coin
            )));
        }

        // Transitive: the predecessor must have been a legitimate receipt.
        // The mint terminates the recursion as the root of trust.
        if prev.kind == TxKind::Transfer {
            self.validate(prev_index)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::{self, Coin};
    use crate::identity::Identity;
    use crate::party::Party;
    use crate::transaction::{self, Transaction};

    fn mint_and_transfer(
        issuer: &mut Party,
        recipient: &Party,
        ledger: &mut Ledger,
    ) -> (Coin, usize) {
        let mint = issuer.mint_coin("KC").unwrap();
        let coin = mint.coin.clone();
        let mint_index = ledger.append(mint);
        assert!(ledger.validate(mint_index).is_ok());

        let transfer = issuer
            .send_coin_to(recipient.name(), &recipient.public_key(), &coin)
            .unwrap();
        let index = ledger.append(transfer);
        (coin, index)
    }

    #[test]
    fn test_mint_validates_on_signature_alone() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut ledger = Ledger::new();

        let index = ledger.append(issuer.mint_coin("KC").unwrap());
        assert!(ledger.validate(index).is_ok());
    }

    #[test]
    fn test_first_transfer_from_minter_validates() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let alice = Party::holder("Alice").unwrap();
        let mut ledger = Ledger::new();

        let (_, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        assert!(ledger.validate(index).is_ok());
    }

    #[test]
    fn test_transfer_without_mint_is_broken_chain() {
        let mut alice = Party::holder("Alice").unwrap();
        let bob = Party::holder("Bob").unwrap();
        let mut ledger = Ledger::new();

        // Alice claims a coin the ledger has never seen
        let phantom = Coin::new(coin::next_id(), "KC");
        alice.receive(phantom.clone());
        let tx = alice
            .send_coin_to(bob.name(), &bob.public_key(), &phantom)
            .unwrap();

        let index = ledger.append(tx);
        assert!(matches!(
            ledger.validate(index),
            Err(CoinError::BrokenChain(_))
        ));
    }

    #[test]
    fn test_double_spend_is_unauthorized_sender() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let mut carol = Party::holder("Carol").unwrap();
        let dave = Party::holder("Dave").unwrap();
        let mut ledger = Ledger::new();

        let (coin, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        assert!(ledger.validate(index).is_ok());
        alice.receive(coin.clone());

        // Carol credits herself without ever receiving the coin; her
        // signature over the transfer is perfectly valid
        carol.receive(coin.clone());
        let rogue = carol
            .send_coin_to(dave.name(), &dave.public_key(), &coin)
            .unwrap();
        assert!(rogue.verify_signature().is_ok());

        let rogue_index = ledger.append(rogue);
        assert!(matches!(
            ledger.validate(rogue_index),
            Err(CoinError::UnauthorizedSender(_))
        ));
    }

    #[test]
    fn test_broken_link_invalidates_all_later_transfers() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let mut carol = Party::holder("Carol").unwrap();
        let mut dave = Party::holder("Dave").unwrap();
        let erin = Party::holder("Erin").unwrap();
        let mut ledger = Ledger::new();

        let (coin, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        assert!(ledger.validate(index).is_ok());
        alice.receive(coin.clone());

        // Rogue link: Carol was never the recipient of record
        carol.receive(coin.clone());
        let rogue = carol
            .send_coin_to(dave.name(), &dave.public_key(), &coin)
            .unwrap();
        let rogue_index = ledger.append(rogue);
        assert!(ledger.validate(rogue_index).is_err());

        // Dave received from the rogue link in good faith; his transfer is
        // correctly chained to Carol's entry yet still invalid
        dave.receive(coin.clone());
        let downstream = dave
            .send_coin_to(erin.name(), &erin.public_key(), &coin)
            .unwrap();
        let downstream_index = ledger.append(downstream);
        assert!(matches!(
            ledger.validate(downstream_index),
            Err(CoinError::UnauthorizedSender(_))
        ));
    }

    #[test]
    fn test_forged_signature_is_signature_invalid() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let bob = Party::holder("Bob").unwrap();
        let mut ledger = Ledger::new();

        let (coin, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        assert!(ledger.validate(index).is_ok());
        alice.receive(coin.clone());

        // Lift the mint signature onto a transfer payload the issuer never
        // signed: a claim that the coin went straight to Bob
        let mint_signature = ledger.get(0).unwrap().signature.clone();
        let forged = Transaction::transfer(
            coin.clone(),
            issuer.name(),
            &issuer.public_key(),
            mint_signature,
            bob.name(),
            &bob.public_key(),
        );

        let forged_index = ledger.append(forged);
        assert!(matches!(
            ledger.validate(forged_index),
            Err(CoinError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_resigned_stale_transfer_is_unauthorized() {
        // Same skip attempt, but the issuer genuinely signs the fresh
        // payload. The signature verifies; the authorization is what fails.
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let bob = Party::holder("Bob").unwrap();
        let mut ledger = Ledger::new();

        let (coin, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        assert!(ledger.validate(index).is_ok());
        alice.receive(coin.clone());

        issuer.receive(coin.clone()); // issuer re-credits itself
        let stale = issuer
            .send_coin_to(bob.name(), &bob.public_key(), &coin)
            .unwrap();
        let stale_index = ledger.append(stale);
        assert!(matches!(
            ledger.validate(stale_index),
            Err(CoinError::UnauthorizedSender(_))
        ));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let bob = Party::holder("Bob").unwrap();
        let mut ledger = Ledger::new();

        let (coin, index) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        alice.receive(coin.clone());
        let second = alice
            .send_coin_to(bob.name(), &bob.public_key(), &coin)
            .unwrap();
        let second_index = ledger.append(second);

        for _ in 0..3 {
            assert!(ledger.validate(index).is_ok());
            assert!(ledger.validate(second_index).is_ok());
        }

        // Invalid verdicts are just as stable
        let mut carol = Party::holder("Carol").unwrap();
        carol.receive(coin.clone());
        let rogue = carol
            .send_coin_to(alice.name(), &alice.public_key(), &coin)
            .unwrap();
        let rogue_index = ledger.append(rogue);
        for _ in 0..3 {
            assert!(matches!(
                ledger.validate(rogue_index),
                Err(CoinError::UnauthorizedSender(_))
            ));
        }
    }

    #[test]
    fn test_history_follows_ledger_order() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let mut alice = Party::holder("Alice").unwrap();
        let bob = Party::holder("Bob").unwrap();
        let mut ledger = Ledger::new();

        // Interleave a second coin to check per-coin filtering
        let other = issuer.mint_coin("KC").unwrap();
        let other_id = other.coin.id;
        ledger.append(other);

        let (coin, _) = mint_and_transfer(&mut issuer, &alice, &mut ledger);
        alice.receive(coin.clone());
        let second = alice
            .send_coin_to(bob.name(), &bob.public_key(), &coin)
            .unwrap();
        ledger.append(second);

        let history = ledger.history(&coin.id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].kind, TxKind::Mint);
        assert_eq!(history[1].kind, TxKind::Transfer);
        assert_eq!(history[2].kind, TxKind::Transfer);
        assert_eq!(history[2].signer_name, "Alice");

        assert_eq!(ledger.history(&other_id).len(), 1);
        assert!(ledger.history(&coin::next_id()).is_empty());
    }

    #[test]
    fn test_validate_out_of_range_index() {
        let ledger = Ledger::new();
        assert!(matches!(
            ledger.validate(0),
            Err(CoinError::TransactionNotFound(0))
        ));
    }

    #[test]
    fn test_tampered_recipient_breaks_signature() {
        let mut issuer = Party::issuer("Mint").unwrap();
        let alice = Party::holder("Alice").unwrap();
        let mallory = Identity::new("Mallory").unwrap();
        let mut ledger = Ledger::new();

        let (coin, _) = mint_and_transfer(&mut issuer, &alice, &mut ledger);

        // Redirect the validated transfer to Mallory before appending a copy
        let mut redirected = ledger.get(1).unwrap().clone();
        redirected.payload = transaction::transfer_payload(&coin.id, &mallory.public_key());
        redirected.recipient_name = Some("Mallory".to_string());
        redirected.recipient_key = Some(mallory.public_key().to_vec());

        let index = ledger.append(redirected);
        assert!(matches!(
            ledger.validate(index),
            Err(CoinError::SignatureInvalid)
        ));
    }
}

//! KingCoin - a centralized, single-issuer digital-asset ledger
//!
//! A trusted issuer mints discrete, uniquely-identified coins and parties
//! transfer them to one another; every mint and transfer is signed, and the
//! append-only ledger validates chain of custody without trusting any
//! party's self-reported balance.
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`coin`] - Coin value type and id source
//! - [`transaction`] - Signed mint/transfer records
//! - [`ledger`] - Append-only ledger and chain-of-custody validator
//!
//! ## Parties
//! - [`identity`] - Name + key pair; signing capability stays private
//! - [`party`] - Issuer and Holder roles over a shared held-coin set
//!
//! ## Cryptography
//! - [`crypto`] - Signatures and verification (secp256k1)
//!
//! ## Orchestration & Utilities
//! - [`environment`] - Scenario context wiring parties to the ledger
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod coin;
pub mod ledger;
pub mod transaction;

// ============================================================================
// Parties
// ============================================================================
pub mod identity;
pub mod party;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Orchestration & Utilities
// ============================================================================
pub mod config;
pub mod environment;
pub mod error;

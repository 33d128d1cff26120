//! Well-known development accounts
//!
//! These are the public Frontier dev keys. Never hold real funds with them.

use anyhow::{Context, Result};
use myth_transfer::{EthereumSigner, KeyType};

pub const ALITH_SEED: &str = "0x5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133";
pub const BALTATHAR_SEED: &str =
    "0x8075991ce870b93a8870eca0c0f91913d12f47948ca0fd25b49c6fa7cdbeee8b";

pub const ALITH_PUBKEY: &str =
    "0x02509540919faacf9ab52146c9aa40db68172d83777250b28e4679176e49ccdd9f";
pub const BALTATHAR_PUBKEY: &str =
    "0x033bc19e36ff1673910575b6727a974a9abd80c9a875d41ab3e2648dbfb9e4b518";

/// Ethereum keyring signer for a `0x`-prefixed 32-byte seed
pub fn signer(seed: &str) -> Result<EthereumSigner> {
    EthereumSigner::from_uri(KeyType::Ethereum, seed).context("Failed to derive signer from seed")
}

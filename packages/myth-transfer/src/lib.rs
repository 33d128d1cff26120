//! myth-transfer: native MYTH transfers on the Mythos parachain
//!
//! This crate provides:
//! - Ethereum-style accounts and secp256k1 signing (`AccountId20`, `EthereumSigner`)
//! - Transaction building from intents and extrinsic encoding
//! - Transaction parsing (decode calls, signer payloads and extrinsics)
//! - A local transfer API with `call`/`payload`/`submittable` outputs
//! - Status tracking for submitted extrinsics
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//! - **Offline layer**: encoding, signing and decoding, no network access
//! - **Online layer** (`client`): a `subxt` connection that supplies chain
//!   constants, nonces and status streams

pub mod address;
pub mod builder;
pub mod client;
pub mod error;
pub mod keyring;
pub mod parser;
pub mod tracking;
pub mod transaction;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use address::{parse_address, validate_address, AccountId20};
pub use builder::build_transaction;
pub use builder::types::{BuildContext, TransactionIntent};
pub use client::{ChainClient, MythosConfig, DEFAULT_URL};
pub use error::TransferError;
pub use keyring::{EthereumSignature, EthereumSigner, KeyType};
pub use parser::{parse_transaction, ParsedTransaction};
pub use tracking::{track, StatusObserver, StatusUpdate};
pub use transaction::Transaction;
pub use transfer::{AssetTransferApi, ChainInfo, TransferOptions, TxResult};
pub use types::{Era, Format, Material, ParseContext, Validity};

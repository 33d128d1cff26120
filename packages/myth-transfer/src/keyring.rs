//! Ethereum-style signers
//!
//! Key derivation from a hex secret and recoverable ECDSA signing over
//! keccak-256, which is what Frontier runtimes verify for `EthereumSignature`.

use crate::address::{keccak256, AccountId20};
use crate::error::TransferError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use parity_scale_codec::{Decode, Encode};
use std::fmt;
use std::str::FromStr;

/// Key type tag, mirroring keyring type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// secp256k1 key with a keccak-derived 20-byte account
    Ethereum,
}

impl FromStr for KeyType {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" => Ok(KeyType::Ethereum),
            "sr25519" | "ed25519" | "ecdsa" => Err(TransferError::InvalidKey(format!(
                "Key type '{}' cannot sign for an AccountId20 chain",
                s
            ))),
            _ => Err(TransferError::InvalidKey(format!("Unknown key type: {}", s))),
        }
    }
}

/// 65-byte recoverable signature: r || s || recovery id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct EthereumSignature(pub [u8; 65]);

/// Signer holding a secp256k1 secret key
#[derive(Clone)]
pub struct EthereumSigner {
    signing_key: SigningKey,
    account_id: AccountId20,
}

impl fmt::Debug for EthereumSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthereumSigner")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl EthereumSigner {
    /// Create a signer from a 32-byte secret key
    pub fn from_private_key(secret: &[u8]) -> Result<Self, TransferError> {
        if secret.len() != 32 {
            return Err(TransferError::InvalidKey(format!(
                "Private key must be 32 bytes, got {}",
                secret.len()
            )));
        }

        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| TransferError::InvalidKey(format!("Invalid private key: {}", e)))?;
        let account_id = AccountId20::from_verifying_key(signing_key.verifying_key());

        Ok(EthereumSigner {
            signing_key,
            account_id,
        })
    }

    /// Create a signer from a hex secret key (with or without 0x prefix)
    pub fn from_private_key_hex(secret: &str) -> Result<Self, TransferError> {
        let secret = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = hex::decode(secret)
            .map_err(|e| TransferError::InvalidKey(format!("Invalid hex secret: {}", e)))?;
        Self::from_private_key(&bytes)
    }

    /// Derive a signer from a key type and secret URI
    ///
    /// Only raw `0x`-prefixed seeds are understood; mnemonics and derivation
    /// paths are rejected.
    pub fn from_uri(key_type: KeyType, uri: &str) -> Result<Self, TransferError> {
        match key_type {
            KeyType::Ethereum => {
                if !uri.starts_with("0x") {
                    return Err(TransferError::InvalidKey(
                        "Expected a 0x-prefixed hex seed".to_string(),
                    ));
                }
                Self::from_private_key_hex(uri)
            }
        }
    }

    pub fn account_id(&self) -> AccountId20 {
        self.account_id
    }

    /// Compressed SEC1 public key
    pub fn public_key(&self) -> [u8; 33] {
        let point = self.signing_key.verifying_key().to_encoded_point(true);
        let mut key = [0u8; 33];
        key.copy_from_slice(point.as_bytes());
        key
    }

    /// Sign keccak-256(payload). Deterministic (RFC 6979), low-s normalized.
    pub fn sign(&self, payload: &[u8]) -> Result<EthereumSignature, TransferError> {
        let digest = keccak256(payload);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| TransferError::InvalidSignature(format!("Signing failed: {}", e)))?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(EthereumSignature(bytes))
    }
}

/// Recover the account that produced `signature` over `payload`
pub fn recover_signer(
    signature: &EthereumSignature,
    payload: &[u8],
) -> Result<AccountId20, TransferError> {
    let sig = Signature::from_slice(&signature.0[..64])
        .map_err(|e| TransferError::InvalidSignature(e.to_string()))?;

    // Accept both raw (0/1) and Ethereum-style (27/28) recovery bytes
    let v = match signature.0[64] {
        v @ 27..=30 => v - 27,
        v => v,
    };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| TransferError::InvalidSignature(format!("Invalid recovery id: {}", v)))?;

    let key = VerifyingKey::recover_from_prehash(&keccak256(payload), &sig, recovery_id)
        .map_err(|e| TransferError::InvalidSignature(e.to_string()))?;
    Ok(AccountId20::from_verifying_key(&key))
}

/// Check that `signature` over `payload` was made by `account`
pub fn verify(signature: &EthereumSignature, payload: &[u8], account: &AccountId20) -> bool {
    recover_signer(signature, payload)
        .map(|signer| signer == *account)
        .unwrap_or(false)
}

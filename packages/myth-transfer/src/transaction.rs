//! Core transaction types and operations for Mythos extrinsics
//!
//! Extrinsic format v4 with Ethereum-style accounts: the signer is a bare
//! `AccountId20` and the signature a 65-byte recoverable ECDSA signature,
//! neither wrapped in `MultiAddress`/`MultiSignature`.

use crate::address::AccountId20;
use crate::error::TransferError;
use crate::keyring::{self, EthereumSignature, EthereumSigner};
use crate::types::{Era, Material, ParseContext};
use blake2::{digest::consts::U32, Blake2b, Digest};
use parity_scale_codec::{Compact, Decode, Encode};

const EXTRINSIC_VERSION: u8 = 4;
const SIGNED_FLAG: u8 = 0x80;

/// Represents a Mythos transaction (extrinsic)
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Signer account (if signed)
    signer: Option<AccountId20>,
    /// Signature (if signed)
    signature: Option<EthereumSignature>,
    /// Era
    era: Era,
    /// Nonce
    nonce: u32,
    /// Tip
    tip: u128,
    /// Whether the `CheckMetadataHash` mode byte is part of the extension data
    metadata_hash_mode: bool,
    /// Call data (SCALE encoded)
    call_data: Vec<u8>,
    /// Context for operations
    context: Option<TransactionContext>,
}

/// Transaction context containing chain info
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub material: Material,
    pub reference_block: [u8; 32],
}

impl Transaction {
    /// Create an unsigned transaction ready for signing
    pub fn new_unsigned(
        call_data: Vec<u8>,
        era: Era,
        nonce: u32,
        tip: u128,
        context: TransactionContext,
    ) -> Self {
        Transaction {
            signer: None,
            signature: None,
            era,
            nonce,
            tip,
            metadata_hash_mode: context.material.check_metadata_hash,
            call_data,
            context: Some(context),
        }
    }

    /// Bare unsigned extrinsic around `call_data`, without chain context
    pub fn from_call(call_data: Vec<u8>) -> Self {
        Transaction {
            signer: None,
            signature: None,
            era: Era::Immortal,
            nonce: 0,
            tip: 0,
            metadata_hash_mode: false,
            call_data,
            context: None,
        }
    }

    /// Create a transaction from raw extrinsic bytes
    ///
    /// # Arguments
    /// * `bytes` - Raw extrinsic bytes (length prefixed)
    /// * `context` - Optional parsing context with chain material
    pub fn from_bytes(bytes: &[u8], context: Option<ParseContext>) -> Result<Self, TransferError> {
        if bytes.is_empty() {
            return Err(TransferError::InvalidTransaction(
                "Empty transaction".to_string(),
            ));
        }

        let metadata_hash_mode = context
            .as_ref()
            .map(|ctx| ctx.material.check_metadata_hash)
            .unwrap_or(false);

        let input = &mut &bytes[..];
        let length = Compact::<u32>::decode(input)?.0 as usize;
        if length != input.len() {
            return Err(TransferError::InvalidTransaction(format!(
                "Length prefix {} does not match body of {} bytes",
                length,
                input.len()
            )));
        }

        let version = u8::decode(input)?;
        if version & !SIGNED_FLAG != EXTRINSIC_VERSION {
            return Err(TransferError::InvalidTransaction(format!(
                "Unsupported extrinsic version: {}",
                version & !SIGNED_FLAG
            )));
        }

        let mut tx = Transaction {
            signer: None,
            signature: None,
            era: Era::Immortal,
            nonce: 0,
            tip: 0,
            metadata_hash_mode,
            call_data: Vec::new(),
            context: context.map(|ctx| TransactionContext {
                material: ctx.material,
                reference_block: [0u8; 32], // Unknown from bytes alone
            }),
        };

        if version & SIGNED_FLAG != 0 {
            tx.signer = Some(AccountId20::decode(input)?);
            tx.signature = Some(EthereumSignature::decode(input)?);
            tx.era = Era::decode(input)?;
            tx.nonce = Compact::<u32>::decode(input)?.0;
            tx.tip = Compact::<u128>::decode(input)?.0;
            if metadata_hash_mode {
                let mode = u8::decode(input)?;
                if mode != 0 {
                    return Err(TransferError::InvalidTransaction(format!(
                        "Unsupported metadata hash mode: {}",
                        mode
                    )));
                }
            }
        }

        if input.len() < 2 {
            return Err(TransferError::InvalidTransaction(
                "Call data too short".to_string(),
            ));
        }
        tx.call_data = input.to_vec();

        Ok(tx)
    }

    /// Serialize transaction to extrinsic bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransferError> {
        let mut body = Vec::new();

        match (&self.signer, &self.signature) {
            (Some(signer), Some(signature)) => {
                body.push(SIGNED_FLAG | EXTRINSIC_VERSION);
                signer.encode_to(&mut body);
                signature.encode_to(&mut body);
                self.encode_extra(&mut body);
            }
            _ => body.push(EXTRINSIC_VERSION),
        }
        body.extend_from_slice(&self.call_data);

        let mut result = Compact(body.len() as u32).encode();
        result.extend_from_slice(&body);
        Ok(result)
    }

    /// Hex encoding of `to_bytes`, 0x-prefixed
    pub fn to_hex(&self) -> Result<String, TransferError> {
        Ok(format!("0x{}", hex::encode(self.to_bytes()?)))
    }

    /// Get transaction ID (Blake2-256 hash of signed transaction)
    pub fn id(&self) -> Option<String> {
        if self.is_signed() {
            let bytes = self.to_bytes().ok()?;
            Some(format!("0x{}", hex::encode(blake2_256(&bytes))))
        } else {
            None
        }
    }

    /// Full signer payload with a length-prefixed call, as handed out to
    /// external signers
    pub fn signer_payload(&self) -> Result<Vec<u8>, TransferError> {
        let mut payload = Vec::new();
        self.call_data.encode_to(&mut payload);
        self.encode_extensions(&mut payload)?;
        Ok(payload)
    }

    /// Bytes that get signed
    ///
    /// Same as `signer_payload` without the call length prefix. Payloads over
    /// 256 bytes are replaced by their Blake2-256 hash.
    pub fn signable_payload(&self) -> Result<Vec<u8>, TransferError> {
        let mut payload = self.call_data.clone();
        self.encode_extensions(&mut payload)?;

        if payload.len() > 256 {
            Ok(blake2_256(&payload).to_vec())
        } else {
            Ok(payload)
        }
    }

    /// Sign with `signer` and attach the signature
    pub fn sign(&mut self, signer: &EthereumSigner) -> Result<(), TransferError> {
        let payload = self.signable_payload()?;
        let signature = signer.sign(&payload)?;
        self.signer = Some(signer.account_id());
        self.signature = Some(signature);
        Ok(())
    }

    /// Add an externally produced signature to this transaction
    ///
    /// # Arguments
    /// * `account` - 20-byte account of the signer
    /// * `signature` - 65-byte recoverable signature
    pub fn add_signature(&mut self, account: &[u8], signature: &[u8]) -> Result<(), TransferError> {
        let account: [u8; 20] = account.try_into().map_err(|_| {
            TransferError::InvalidSignature(format!(
                "Account must be 20 bytes, got {}",
                account.len()
            ))
        })?;
        let signature: [u8; 65] = signature.try_into().map_err(|_| {
            TransferError::InvalidSignature(format!(
                "Signature must be 65 bytes, got {}",
                signature.len()
            ))
        })?;

        self.signer = Some(AccountId20(account));
        self.signature = Some(EthereumSignature(signature));
        Ok(())
    }

    /// Check the attached signature against the signer payload
    pub fn verify_signature(&self) -> Result<bool, TransferError> {
        match (&self.signer, &self.signature) {
            (Some(signer), Some(signature)) => {
                let payload = self.signable_payload()?;
                Ok(keyring::verify(signature, &payload, signer))
            }
            _ => Ok(false),
        }
    }

    /// Get sender account
    pub fn sender(&self) -> Option<AccountId20> {
        self.signer
    }

    /// Get the signature
    pub fn signature(&self) -> Option<&EthereumSignature> {
        self.signature.as_ref()
    }

    /// Check if transaction is signed
    pub fn is_signed(&self) -> bool {
        self.signer.is_some() && self.signature.is_some()
    }

    /// Get nonce
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Get tip
    pub fn tip(&self) -> u128 {
        self.tip
    }

    /// Get era
    pub fn era(&self) -> &Era {
        &self.era
    }

    /// Get call data
    pub fn call_data(&self) -> &[u8] {
        &self.call_data
    }

    /// Extension data carried inside the extrinsic: era, nonce, tip, [mode]
    fn encode_extra(&self, out: &mut Vec<u8>) {
        self.era.encode_to(out);
        Compact(self.nonce).encode_to(out);
        Compact(self.tip).encode_to(out);
        if self.metadata_hash_mode {
            // Mode::Disabled
            out.push(0);
        }
    }

    /// Extra data followed by the implicit data the runtime checks against
    fn encode_extensions(&self, out: &mut Vec<u8>) -> Result<(), TransferError> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| TransferError::MissingContext("No context set for transaction".into()))?;

        self.encode_extra(out);
        context.material.spec_version.encode_to(out);
        context.material.tx_version.encode_to(out);
        out.extend_from_slice(&parse_hex_hash(&context.material.genesis_hash)?);
        out.extend_from_slice(&context.reference_block);
        if self.metadata_hash_mode {
            // No metadata hash
            None::<[u8; 32]>.encode_to(out);
        }
        Ok(())
    }
}

/// Parse hex string to 32-byte hash
pub(crate) fn parse_hex_hash(hex_str: &str) -> Result<[u8; 32], TransferError> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(hex_str)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        TransferError::InvalidInput(format!("Hash must be 32 bytes, got {}", bytes.len()))
    })
}

/// Blake2-256 hash
pub(crate) fn blake2_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

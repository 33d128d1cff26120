//! Transaction parsing for Mythos
//!
//! Decodes call data, signer payloads and extrinsics into structured data

use crate::address::AccountId20;
use crate::builder::calls::CallIndices;
use crate::error::TransferError;
use crate::transaction::Transaction;
use crate::types::{Era, ParseContext};
use parity_scale_codec::{Compact, Decode};
use serde::Serialize;

/// Bytes after the tip in a payload without `CheckMetadataHash`:
/// spec_version, tx_version, genesis hash, block hash
const IMPLICIT_LEN: usize = 4 + 4 + 32 + 32;

/// Parsed transaction data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    /// Transaction ID (hash, if signed)
    pub id: Option<String>,
    /// Sender address (EIP-55)
    pub sender: Option<String>,
    /// Account nonce
    pub nonce: u32,
    /// Tip amount
    pub tip: String,
    /// Transaction era
    pub era: Era,
    /// Decoded method/call
    pub method: ParsedMethod,
    /// Transaction outputs (recipients and amounts)
    pub outputs: Vec<TransactionOutput>,
    /// Fee information
    pub fee: FeeInfo,
    /// Transaction type
    #[serde(rename = "type")]
    pub tx_type: String,
    /// Whether transaction is signed
    pub is_signed: bool,
}

/// Parsed method/call data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMethod {
    /// Pallet name (e.g., "balances")
    pub pallet: String,
    /// Method name (e.g., "transferKeepAlive")
    pub name: String,
    pub pallet_index: u8,
    pub method_index: u8,
    /// Method arguments (decoded if known)
    pub args: serde_json::Value,
}

/// Transaction output (recipient)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    pub address: String,
    /// Amount in the smallest unit, or "ALL" for transfer_all
    pub amount: String,
}

/// Fee information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInfo {
    pub fee: String,
    /// Always "tip"; the weight fee is only known on chain
    #[serde(rename = "type")]
    pub fee_type: String,
}

/// Decoded signer payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    pub method: ParsedMethod,
    pub era: Era,
    pub nonce: u32,
    pub tip: String,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: String,
    pub block_hash: String,
    /// `CheckMetadataHash` mode, when the runtime carries the extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_hash: Option<String>,
}

/// Parse a raw transaction
///
/// # Arguments
/// * `bytes` - Raw extrinsic bytes
/// * `context` - Optional parsing context with chain material
pub fn parse_transaction(
    bytes: &[u8],
    context: Option<ParseContext>,
) -> Result<ParsedTransaction, TransferError> {
    let indices = context
        .as_ref()
        .map(|ctx| ctx.material.call_indices)
        .unwrap_or_default();
    let tx = Transaction::from_bytes(bytes, context)?;

    let method = decode_call(tx.call_data(), &indices)?;
    let outputs = extract_outputs(&method);
    let tx_type = determine_tx_type(&method);

    Ok(ParsedTransaction {
        id: tx.id(),
        sender: tx.sender().map(|account| account.to_checksum()),
        nonce: tx.nonce(),
        tip: tx.tip().to_string(),
        era: *tx.era(),
        method,
        outputs,
        fee: FeeInfo {
            fee: tx.tip().to_string(),
            fee_type: "tip".to_string(),
        },
        tx_type,
        is_signed: tx.is_signed(),
    })
}

/// Decode call data into method info
///
/// Calls outside the known Balances set keep their arguments as raw hex.
pub fn decode_call(call_data: &[u8], indices: &CallIndices) -> Result<ParsedMethod, TransferError> {
    if call_data.len() < 2 {
        return Err(TransferError::InvalidTransaction(
            "Call data too short".to_string(),
        ));
    }

    let pallet_index = call_data[0];
    let method_index = call_data[1];
    let args_data = &call_data[2..];

    let (pallet, name, args) = match indices.name_of(pallet_index, method_index) {
        Some((pallet, name)) => (pallet, name, decode_args(name, args_data)?),
        None => (
            "unknown",
            "unknown",
            serde_json::json!({ "raw": format!("0x{}", hex::encode(args_data)) }),
        ),
    };

    Ok(ParsedMethod {
        pallet: pallet.to_string(),
        name: name.to_string(),
        pallet_index,
        method_index,
        args,
    })
}

/// Decode a signer payload (`Compact(len) ‖ call ‖ extensions`)
///
/// Whether the payload carries `CheckMetadataHash` data is inferred from the
/// number of bytes that follow the tip.
pub fn decode_payload(bytes: &[u8], indices: &CallIndices) -> Result<DecodedPayload, TransferError> {
    let input = &mut &bytes[..];

    let call = Vec::<u8>::decode(input)?;
    let era = Era::decode(input)?;
    let nonce = Compact::<u32>::decode(input)?.0;
    let tip = Compact::<u128>::decode(input)?.0;

    let (mode, has_hash_option) = match input.len() {
        IMPLICIT_LEN => (None, false),
        n if n == IMPLICIT_LEN + 2 || n == IMPLICIT_LEN + 34 => (Some(u8::decode(input)?), true),
        n => {
            return Err(TransferError::InvalidTransaction(format!(
                "Unexpected signed extension data length: {}",
                n
            )))
        }
    };

    let spec_version = u32::decode(input)?;
    let transaction_version = u32::decode(input)?;
    let genesis_hash = <[u8; 32]>::decode(input)?;
    let block_hash = <[u8; 32]>::decode(input)?;
    let metadata_hash = if has_hash_option {
        Option::<[u8; 32]>::decode(input)?
    } else {
        None
    };
    ensure_consumed(input)?;

    Ok(DecodedPayload {
        method: decode_call(&call, indices)?,
        era,
        nonce,
        tip: tip.to_string(),
        spec_version,
        transaction_version,
        genesis_hash: format!("0x{}", hex::encode(genesis_hash)),
        block_hash: format!("0x{}", hex::encode(block_hash)),
        mode,
        metadata_hash: metadata_hash.map(|hash| format!("0x{}", hex::encode(hash))),
    })
}

fn decode_args(method: &str, args: &[u8]) -> Result<serde_json::Value, TransferError> {
    let input = &mut &args[..];
    let dest = AccountId20::decode(input)?;

    let value = match method {
        "transferAll" => {
            let keep_alive = bool::decode(input)?;
            serde_json::json!({
                "dest": dest.to_checksum(),
                "keepAlive": keep_alive
            })
        }
        _ => {
            let value = Compact::<u128>::decode(input)?.0;
            serde_json::json!({
                "dest": dest.to_checksum(),
                "value": value.to_string()
            })
        }
    };

    ensure_consumed(input)?;
    Ok(value)
}

fn ensure_consumed(input: &[u8]) -> Result<(), TransferError> {
    if input.is_empty() {
        Ok(())
    } else {
        Err(TransferError::InvalidTransaction(format!(
            "{} trailing bytes",
            input.len()
        )))
    }
}

/// Extract outputs from parsed method
fn extract_outputs(method: &ParsedMethod) -> Vec<TransactionOutput> {
    let dest = method.args.get("dest").and_then(|v| v.as_str());
    match (method.pallet.as_str(), method.name.as_str(), dest) {
        ("balances", "transferAll", Some(dest)) => vec![TransactionOutput {
            address: dest.to_string(),
            amount: "ALL".to_string(),
        }],
        ("balances", _, Some(dest)) => method
            .args
            .get("value")
            .and_then(|v| v.as_str())
            .map(|value| TransactionOutput {
                address: dest.to_string(),
                amount: value.to_string(),
            })
            .into_iter()
            .collect(),
        _ => vec![],
    }
}

fn determine_tx_type(method: &ParsedMethod) -> String {
    match method.pallet.as_str() {
        "balances" => "Send".to_string(),
        _ => "Unknown".to_string(),
    }
}

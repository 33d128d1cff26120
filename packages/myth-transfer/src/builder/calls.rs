//! Call encoding for the Balances pallet
//!
//! Indices are resolved from runtime metadata when a node is available and
//! fall back to the Mythos runtime layout otherwise. With metadata at hand,
//! calls can also be encoded through the subxt dynamic API.

use crate::address::parse_address;
use crate::builder::types::TransactionIntent;
use crate::error::TransferError;
use parity_scale_codec::{Compact, Encode};
use serde::{Deserialize, Serialize};
use subxt::ext::scale_value::{Composite, Value};
use subxt::tx::{DynamicPayload, Payload};

/// Pallet and call indices of the Balances calls we build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallIndices {
    pub balances: u8,
    pub transfer_allow_death: u8,
    pub transfer_keep_alive: u8,
    pub transfer_all: u8,
}

impl Default for CallIndices {
    /// Mythos runtime: `Balances = 10`
    fn default() -> Self {
        CallIndices {
            balances: 10,
            transfer_allow_death: 0,
            transfer_keep_alive: 3,
            transfer_all: 4,
        }
    }
}

impl CallIndices {
    /// Resolve indices from runtime metadata
    pub fn from_metadata(metadata: &subxt::Metadata) -> Result<Self, TransferError> {
        let call_index = |method: &str| -> Result<(u8, u8), TransferError> {
            let pallet = metadata.pallet_by_name("Balances").ok_or_else(|| {
                TransferError::InvalidInput("Balances pallet not found".to_string())
            })?;
            let call = pallet.call_variant_by_name(method).ok_or_else(|| {
                TransferError::InvalidInput(format!("Balances.{} not found", method))
            })?;
            Ok((pallet.index(), call.index))
        };

        let (balances, transfer_allow_death) = call_index("transfer_allow_death")?;
        let (_, transfer_keep_alive) = call_index("transfer_keep_alive")?;
        let (_, transfer_all) = call_index("transfer_all")?;

        Ok(CallIndices {
            balances,
            transfer_allow_death,
            transfer_keep_alive,
            transfer_all,
        })
    }

    /// Pallet and call name (polkadot-js casing) for a known call
    pub fn name_of(&self, pallet_index: u8, method_index: u8) -> Option<(&'static str, &'static str)> {
        if pallet_index != self.balances {
            return None;
        }
        match method_index {
            i if i == self.transfer_allow_death => Some(("balances", "transferAllowDeath")),
            i if i == self.transfer_keep_alive => Some(("balances", "transferKeepAlive")),
            i if i == self.transfer_all => Some(("balances", "transferAll")),
            _ => None,
        }
    }
}

/// Encode a transaction intent to call data bytes
pub fn encode_call(
    intent: &TransactionIntent,
    indices: &CallIndices,
) -> Result<Vec<u8>, TransferError> {
    match intent {
        TransactionIntent::Transfer {
            to,
            amount,
            keep_alive,
        } => {
            let method = if *keep_alive {
                indices.transfer_keep_alive
            } else {
                indices.transfer_allow_death
            };
            let mut call = vec![indices.balances, method];
            parse_address(to)?.encode_to(&mut call);
            Compact(*amount).encode_to(&mut call);
            Ok(call)
        }
        TransactionIntent::TransferAll { to, keep_alive } => {
            let mut call = vec![indices.balances, indices.transfer_all];
            parse_address(to)?.encode_to(&mut call);
            keep_alive.encode_to(&mut call);
            Ok(call)
        }
    }
}

/// Encode a transaction intent against runtime metadata
pub fn encode_call_with_metadata(
    intent: &TransactionIntent,
    metadata: &subxt::Metadata,
) -> Result<Vec<u8>, TransferError> {
    dynamic_payload(intent)?
        .encode_call_data(metadata)
        .map_err(|e| TransferError::InvalidInput(format!("Failed to encode call: {}", e)))
}

/// Dynamic Balances payload for an intent
pub fn dynamic_payload(intent: &TransactionIntent) -> Result<DynamicPayload, TransferError> {
    let (to, last) = match intent {
        TransactionIntent::Transfer { to, amount, .. } => (to, ("value", Value::u128(*amount))),
        TransactionIntent::TransferAll { to, keep_alive } => {
            (to, ("keep_alive", Value::bool(*keep_alive)))
        }
    };
    Ok(subxt::dynamic::tx(
        "Balances",
        metadata_call_name(intent),
        named([("dest", account_id(to)?), last]),
    ))
}

/// Call name as it appears in runtime metadata
fn metadata_call_name(intent: &TransactionIntent) -> &'static str {
    match intent {
        TransactionIntent::Transfer {
            keep_alive: true, ..
        } => "transfer_keep_alive",
        TransactionIntent::Transfer {
            keep_alive: false, ..
        } => "transfer_allow_death",
        TransactionIntent::TransferAll { .. } => "transfer_all",
    }
}

fn named<const N: usize>(fields: [(&str, Value<()>); N]) -> Composite<()> {
    Composite::Named(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

/// `AccountId20([u8; 20])`; the runtime uses an identity lookup, so `dest` is
/// the bare account
fn account_id(address: &str) -> Result<Value<()>, TransferError> {
    let account = parse_address(address)?;
    Ok(Value::unnamed_composite([Value::from_bytes(account.0)]))
}

/// Method name reported in build results, e.g. `balances::transferKeepAlive`
pub fn method_name(intent: &TransactionIntent) -> &'static str {
    match intent {
        TransactionIntent::Transfer {
            keep_alive: true, ..
        } => "balances::transferKeepAlive",
        TransactionIntent::Transfer {
            keep_alive: false, ..
        } => "balances::transferAllowDeath",
        TransactionIntent::TransferAll { .. } => "balances::transferAll",
    }
}

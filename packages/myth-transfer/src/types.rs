//! Shared types for Mythos transactions

use crate::builder::calls::CallIndices;
use crate::error::TransferError;
use parity_scale_codec::{Decode, Encode, Input, Output};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain material metadata required for transaction encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Chain genesis hash, 0x-prefixed hex
    pub genesis_hash: String,
    /// Chain name (e.g., "Mythos")
    pub chain_name: String,
    /// Runtime spec name (e.g., "mythos")
    pub spec_name: String,
    /// Runtime spec version
    pub spec_version: u32,
    /// Transaction format version
    pub tx_version: u32,
    /// Runtime carries the `CheckMetadataHash` signed extension
    #[serde(default)]
    pub check_metadata_hash: bool,
    /// Pallet and call indices for the Balances calls we build
    #[serde(default)]
    pub call_indices: CallIndices,
}

/// Validity window for mortal transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    /// Block number when transaction becomes valid
    pub first_valid: u32,
    /// Maximum duration in blocks (default: 64). Zero means immortal.
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,
}

fn default_max_duration() -> u32 {
    64
}

/// Context required for parsing transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseContext {
    /// Chain material metadata
    pub material: Material,
}

/// Transaction era (mortal or immortal)
///
/// SCALE layout follows `sp_runtime::generic::Era`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Era {
    /// Immortal transaction (never expires)
    Immortal,
    /// Mortal transaction with period and phase
    Mortal { period: u32, phase: u32 },
}

impl Era {
    /// Mortal era of (at least) `period` blocks anchored at block `current`
    pub fn mortal(period: u32, current: u32) -> Self {
        let period = period
            .checked_next_power_of_two()
            .unwrap_or(1 << 16)
            .clamp(4, 1 << 16);
        let phase = current % period;
        let quantize_factor = (period >> 12).max(1);
        let quantized_phase = phase / quantize_factor * quantize_factor;
        Era::Mortal {
            period,
            phase: quantized_phase,
        }
    }

    /// Check if this is an immortal era
    pub fn is_immortal(&self) -> bool {
        matches!(self, Era::Immortal)
    }
}

impl Encode for Era {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        match self {
            Era::Immortal => dest.push_byte(0),
            Era::Mortal { period, phase } => {
                let quantize_factor = (*period >> 12).max(1);
                let low = (period.trailing_zeros().saturating_sub(1)).clamp(1, 15) as u16;
                let encoded = low | (((phase / quantize_factor) << 4) as u16);
                encoded.encode_to(dest);
            }
        }
    }
}

impl Decode for Era {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let first = input.read_byte()?;
        if first == 0 {
            return Ok(Era::Immortal);
        }

        let encoded = first as u64 + ((input.read_byte()? as u64) << 8);
        let period = 2u64 << (encoded % (1 << 4));
        let quantize_factor = (period >> 12).max(1);
        let phase = (encoded >> 4) * quantize_factor;
        if period >= 4 && phase < period {
            Ok(Era::Mortal {
                period: period as u32,
                phase: phase as u32,
            })
        } else {
            Err("Invalid period and phase".into())
        }
    }
}

/// Output format of a built transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    /// Bare call data
    Call,
    /// Signer payload (call plus signed-extension data)
    Payload,
    /// Unsigned extrinsic
    Submittable,
}

impl FromStr for Format {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Format::Call),
            "payload" => Ok(Format::Payload),
            "submittable" => Ok(Format::Submittable),
            other => Err(TransferError::InvalidInput(format!(
                "Unknown format '{}', expected call, payload or submittable",
                other
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Call => "call",
            Format::Payload => "payload",
            Format::Submittable => "submittable",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_is_immortal() {
        assert!(Era::Immortal.is_immortal());
        assert!(!Era::Mortal {
            period: 64,
            phase: 0
        }
        .is_immortal());
    }

    #[test]
    fn test_mortal_era_encoding() {
        let era = Era::mortal(64, 42);
        assert_eq!(
            era,
            Era::Mortal {
                period: 64,
                phase: 42
            }
        );
        assert_eq!(era.encode(), vec![0xa5, 0x02]);
        assert_eq!(Era::decode(&mut &[0xa5, 0x02][..]).unwrap(), era);
        assert_eq!(Era::Immortal.encode(), vec![0x00]);
    }

    #[test]
    fn test_mortal_era_rounds_period_up() {
        match Era::mortal(50, 1_000_003) {
            Era::Mortal { period, phase } => {
                assert_eq!(period, 64);
                assert_eq!(phase, 1_000_003 % 64);
            }
            Era::Immortal => panic!("Expected mortal era"),
        }
    }

    #[test]
    fn test_invalid_era_rejected() {
        // low bits 0 => period 2, too short
        assert!(Era::decode(&mut &[0x10, 0x00][..]).is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("payload".parse::<Format>().unwrap(), Format::Payload);
        assert_eq!(Format::Submittable.to_string(), "submittable");
        assert!("json".parse::<Format>().is_err());
    }

    #[test]
    fn test_material_defaults() {
        let json = r#"{
            "genesisHash": "0xf6ee56e9c5277df5b4ce6ae9983ee88f3cbed27d31beeb98f9f84f997a1ab0b9",
            "chainName": "Mythos",
            "specName": "mythos",
            "specVersion": 1014,
            "txVersion": 1
        }"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert!(!material.check_metadata_hash);
        assert_eq!(material.call_indices, CallIndices::default());
    }
}

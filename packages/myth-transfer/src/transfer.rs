//! Native token transfers in the shape of `@substrate/asset-transfer-api`
//!
//! Only transfers that stay on the origin chain are built. Anything that
//! would need XCM is rejected before any encoding happens.

use crate::address::parse_address;
use crate::builder::build_transaction;
use crate::builder::calls::{encode_call, method_name};
use crate::builder::types::{BuildContext, TransactionIntent};
use crate::error::TransferError;
use crate::parser::{decode_call, decode_payload, parse_transaction};
use crate::transaction::Transaction;
use crate::types::{Format, Material, ParseContext};
use serde::Serialize;

/// Para id of the relay chain
const RELAY_CHAIN_ID: u32 = 0;

/// XCM version assumed when the chain stores no `SafeXcmVersion`
pub const DEFAULT_XCM_VERSION: u32 = 4;

/// What the origin chain says about itself
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    /// Runtime spec name, used as the chain's protocol name
    pub spec_name: String,
    pub para_id: u32,
    /// Safe XCM version
    pub xcm_version: u32,
    /// Native token symbol (e.g., "MYTH")
    pub token_symbol: String,
    pub material: Material,
}

/// Options for `create_transfer_transaction`
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub format: Format,
    /// Sender address or public key; must match the build context when both are given
    pub senders_addr: Option<String>,
    /// Use transfer_keep_alive instead of transfer_allow_death
    pub keep_alive: bool,
    /// Override of the chain's safe XCM version
    pub xcm_version: Option<u32>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            format: Format::Payload,
            senders_addr: None,
            keep_alive: false,
            xcm_version: None,
        }
    }
}

/// Routing of a transfer relative to the origin chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "local")]
    Local,
    ParaToRelay,
    ParaToPara,
}

/// A built transfer artifact plus routing metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    pub origin: String,
    pub dest: String,
    pub direction: Direction,
    pub xcm_version: u32,
    /// e.g. `balances::transferKeepAlive`
    pub method: String,
    pub format: Format,
    /// 0x-prefixed hex artifact
    pub tx: String,
}

/// Builds and decodes native transfers for one chain
#[derive(Debug, Clone)]
pub struct AssetTransferApi {
    info: ChainInfo,
}

impl AssetTransferApi {
    pub fn new(info: ChainInfo) -> Self {
        AssetTransferApi { info }
    }

    /// Classify a destination chain id against the origin para id
    pub fn direction_of(&self, dest_chain_id: &str) -> Result<Direction, TransferError> {
        let id: u32 = dest_chain_id.trim().parse().map_err(|_| {
            TransferError::InvalidInput(format!(
                "Destination chain id '{}' is not a para id",
                dest_chain_id
            ))
        })?;

        Ok(match id {
            id if id == self.info.para_id => Direction::Local,
            RELAY_CHAIN_ID => Direction::ParaToRelay,
            _ => Direction::ParaToPara,
        })
    }

    /// Build a native token transfer
    ///
    /// # Arguments
    /// * `dest_chain_id` - Para id of the destination chain
    /// * `dest_addr` - Recipient account (H160 hex or secp256k1 public key)
    /// * `asset_ids` - Empty, or only the native token symbol
    /// * `amounts` - Exactly one decimal amount in the smallest unit
    /// * `options` - Output format and transfer flags
    /// * `context` - Sender nonce, reference block and material; required for
    ///   the `payload` format
    pub fn create_transfer_transaction(
        &self,
        dest_chain_id: &str,
        dest_addr: &str,
        asset_ids: &[String],
        amounts: &[String],
        options: &TransferOptions,
        context: Option<BuildContext>,
    ) -> Result<TxResult, TransferError> {
        let direction = self.direction_of(dest_chain_id)?;
        if direction != Direction::Local {
            return Err(TransferError::UnsupportedDestination(format!(
                "{:?} transfer to chain {} requires XCM",
                direction, dest_chain_id
            )));
        }

        parse_address(dest_addr)?;
        self.check_assets(asset_ids)?;
        let amount = match amounts {
            [amount] => parse_amount(amount)?,
            _ => {
                return Err(TransferError::InvalidAmount(format!(
                    "Expected exactly one amount, got {}",
                    amounts.len()
                )))
            }
        };

        if let (Some(senders_addr), Some(context)) = (&options.senders_addr, &context) {
            if parse_address(senders_addr)? != parse_address(&context.sender)? {
                return Err(TransferError::InvalidInput(format!(
                    "Sender {} does not match build context sender {}",
                    senders_addr, context.sender
                )));
            }
        }

        let intent = TransactionIntent::Transfer {
            to: dest_addr.to_string(),
            amount,
            keep_alive: options.keep_alive,
        };
        let method = method_name(&intent).to_string();

        let bytes = match (options.format, context) {
            (Format::Call, _) => encode_call(&intent, &self.info.material.call_indices)?,
            (Format::Payload, Some(context)) => build_transaction(intent, context)?.signer_payload()?,
            (Format::Payload, None) => {
                return Err(TransferError::MissingContext(
                    "payload format needs a build context for the sender".to_string(),
                ))
            }
            (Format::Submittable, Some(context)) => build_transaction(intent, context)?.to_bytes()?,
            (Format::Submittable, None) => {
                Transaction::from_call(encode_call(&intent, &self.info.material.call_indices)?)
                    .to_bytes()?
            }
        };

        tracing::debug!(%method, format = %options.format, len = bytes.len(), "created transfer");

        Ok(TxResult {
            origin: self.info.spec_name.clone(),
            dest: self.info.spec_name.clone(),
            direction,
            xcm_version: options.xcm_version.unwrap_or(self.info.xcm_version),
            method,
            format: options.format,
            tx: format!("0x{}", hex::encode(bytes)),
        })
    }

    /// Decode an artifact produced by `create_transfer_transaction` into pretty JSON
    pub fn decode_extrinsic(&self, tx_hex: &str, format: Format) -> Result<String, TransferError> {
        let bytes = hex::decode(tx_hex.trim().trim_start_matches("0x"))?;
        let indices = &self.info.material.call_indices;

        let value = match format {
            Format::Call => serde_json::to_value(decode_call(&bytes, indices)?),
            Format::Payload => serde_json::to_value(decode_payload(&bytes, indices)?),
            Format::Submittable => {
                let context = ParseContext {
                    material: self.info.material.clone(),
                };
                serde_json::to_value(parse_transaction(&bytes, Some(context))?)
            }
        }
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map_err(|e| TransferError::InvalidInput(format!("Cannot render decoded tx: {}", e)))?;

        Ok(value)
    }

    fn check_assets(&self, asset_ids: &[String]) -> Result<(), TransferError> {
        match asset_ids
            .iter()
            .find(|id| !id.eq_ignore_ascii_case(&self.info.token_symbol))
        {
            Some(id) => Err(TransferError::InvalidInput(format!(
                "Asset '{}' is not the native token {}",
                id, self.info.token_symbol
            ))),
            None => Ok(()),
        }
    }
}

/// Parse a positive decimal amount
pub fn parse_amount(amount: &str) -> Result<u128, TransferError> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TransferError::InvalidAmount(format!(
            "'{}' is not a decimal integer",
            amount
        )));
    }
    match amount.parse::<u128>() {
        Ok(0) => Err(TransferError::InvalidAmount("Amount must be positive".to_string())),
        Ok(value) => Ok(value),
        Err(_) => Err(TransferError::InvalidAmount(format!(
            "'{}' does not fit in u128",
            amount
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_context, material, ALITH, BALTATHAR, BALTATHAR_PUBKEY};
    use rstest::rstest;

    const ALITH_PUBKEY: &str =
        "0x02509540919faacf9ab52146c9aa40db68172d83777250b28e4679176e49ccdd9f";

    fn api() -> AssetTransferApi {
        AssetTransferApi::new(ChainInfo {
            spec_name: "mythos".to_string(),
            para_id: 3369,
            xcm_version: DEFAULT_XCM_VERSION,
            token_symbol: "MYTH".to_string(),
            material: material(false),
        })
    }

    fn amounts(value: &str) -> Vec<String> {
        vec![value.to_string()]
    }

    #[test]
    fn test_payload_transfer_decodes_back() {
        let api = api();
        let options = TransferOptions {
            format: Format::Payload,
            senders_addr: Some(ALITH_PUBKEY.to_string()),
            keep_alive: false,
            xcm_version: None,
        };

        let result = api
            .create_transfer_transaction(
                "3369",
                BALTATHAR_PUBKEY,
                &[],
                &amounts("1000000000000"),
                &options,
                Some(build_context(0, false)),
            )
            .unwrap();

        assert_eq!(result.direction, Direction::Local);
        assert_eq!(result.origin, "mythos");
        assert_eq!(result.method, "balances::transferAllowDeath");
        assert_eq!(result.xcm_version, 4);
        assert!(result.tx.starts_with("0x"));

        let decoded = api.decode_extrinsic(&result.tx, Format::Payload).unwrap();
        let json: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(json["method"]["args"]["value"], "1000000000000");
        assert_eq!(json["method"]["args"]["dest"], BALTATHAR);
        assert_eq!(json["method"]["name"], "transferAllowDeath");
        assert_eq!(json["specVersion"], 1014);
    }

    #[test]
    fn test_malformed_address_rejected() {
        let result = api().create_transfer_transaction(
            "3369",
            "0x033bc19e36ff1673910575b6727a974a9abd80c9a875d41ab3e2648dbfb9e4b5",
            &[],
            &amounts("1000000000000"),
            &TransferOptions::default(),
            Some(build_context(0, false)),
        );
        assert!(matches!(result, Err(TransferError::InvalidAddress(_))));
    }

    #[rstest]
    #[case("0", Direction::ParaToRelay)]
    #[case("1000", Direction::ParaToPara)]
    fn test_cross_chain_rejected(#[case] dest: &str, #[case] direction: Direction) {
        let api = api();
        assert_eq!(api.direction_of(dest).unwrap(), direction);
        let result = api.create_transfer_transaction(
            dest,
            BALTATHAR,
            &[],
            &amounts("1"),
            &TransferOptions::default(),
            Some(build_context(0, false)),
        );
        assert!(matches!(
            result,
            Err(TransferError::UnsupportedDestination(_))
        ));
    }

    #[test]
    fn test_bad_dest_chain_id() {
        assert!(matches!(
            api().direction_of("mythos"),
            Err(TransferError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("-5")]
    #[case("1.5")]
    #[case("1e12")]
    #[case("340282366920938463463374607431768211456")]
    fn test_invalid_amounts(#[case] amount: &str) {
        assert!(matches!(
            parse_amount(amount),
            Err(TransferError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_count() {
        let result = api().create_transfer_transaction(
            "3369",
            BALTATHAR,
            &[],
            &["1".to_string(), "2".to_string()],
            &TransferOptions {
                format: Format::Call,
                ..TransferOptions::default()
            },
            None,
        );
        assert!(matches!(result, Err(TransferError::InvalidAmount(_))));
    }

    #[test]
    fn test_native_asset_only() {
        let api = api();
        let options = TransferOptions {
            format: Format::Call,
            ..TransferOptions::default()
        };

        let native = api.create_transfer_transaction(
            "3369",
            BALTATHAR,
            &["myth".to_string()],
            &amounts("10"),
            &options,
            None,
        );
        assert!(native.is_ok());

        let foreign = api.create_transfer_transaction(
            "3369",
            BALTATHAR,
            &["USDT".to_string()],
            &amounts("10"),
            &options,
            None,
        );
        assert!(matches!(foreign, Err(TransferError::InvalidInput(_))));
    }

    #[test]
    fn test_payload_requires_context() {
        let result = api().create_transfer_transaction(
            "3369",
            BALTATHAR,
            &[],
            &amounts("10"),
            &TransferOptions::default(),
            None,
        );
        assert!(matches!(result, Err(TransferError::MissingContext(_))));
    }

    #[test]
    fn test_sender_mismatch() {
        let options = TransferOptions {
            senders_addr: Some(BALTATHAR.to_string()),
            ..TransferOptions::default()
        };
        let result = api().create_transfer_transaction(
            "3369",
            ALITH,
            &[],
            &amounts("10"),
            &options,
            Some(build_context(0, false)),
        );
        assert!(matches!(result, Err(TransferError::InvalidInput(_))));
    }

    #[rstest]
    #[case(Format::Call)]
    #[case(Format::Submittable)]
    fn test_contextless_formats_roundtrip(#[case] format: Format) {
        let api = api();
        let options = TransferOptions {
            format,
            keep_alive: true,
            xcm_version: Some(3),
            ..TransferOptions::default()
        };
        let result = api
            .create_transfer_transaction("3369", BALTATHAR, &[], &amounts("77"), &options, None)
            .unwrap();
        assert_eq!(result.xcm_version, 3);
        assert_eq!(result.method, "balances::transferKeepAlive");

        let json: serde_json::Value =
            serde_json::from_str(&api.decode_extrinsic(&result.tx, format).unwrap()).unwrap();
        let args = match format {
            Format::Call => &json["args"],
            _ => &json["method"]["args"],
        };
        assert_eq!(args["dest"], BALTATHAR);
        assert_eq!(args["value"], "77");
    }

    #[test]
    fn test_tx_result_serialization() {
        let result = api()
            .create_transfer_transaction(
                "3369",
                BALTATHAR,
                &[],
                &amounts("1"),
                &TransferOptions {
                    format: Format::Call,
                    ..TransferOptions::default()
                },
                None,
            )
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["direction"], "local");
        assert_eq!(json["format"], "call");
        assert_eq!(json["xcmVersion"], 4);
    }
}

//! Node client for Mythos
//!
//! Wraps a `subxt` online client. Extrinsics are still encoded and signed by
//! this crate; the node is only asked for chain constants, nonces and status.

use crate::address::AccountId20;
use crate::builder::calls::{self, CallIndices};
use crate::builder::types::{BuildContext, TransactionIntent};
use crate::error::TransferError;
use crate::keyring::EthereumSignature;
use crate::tracking::{EventRecord, StatusUpdate};
use crate::transaction::Transaction;
use crate::transfer::{AssetTransferApi, ChainInfo, DEFAULT_XCM_VERSION};
use crate::types::{Material, Validity};
use futures_util::{stream, Stream};
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::config::substrate::{BlakeTwo256, SubstrateHeader};
use subxt::config::SubstrateExtrinsicParams;
use subxt::ext::scale_value::{Primitive, Value, ValueDef};
use subxt::tx::{SubmittableExtrinsic, TxInBlock, TxStatus};
use subxt::utils::H256;
use subxt::OnlineClient;

/// Public Mythos RPC endpoint
pub const DEFAULT_URL: &str = "wss://polkadot-mythos-rpc.polkadot.io";

const DEFAULT_TOKEN_SYMBOL: &str = "MYTH";

/// Mortality window for transactions built from live chain state
const DEFAULT_MORTALITY: u32 = 64;

/// Runtime configuration for Mythos: Ethereum accounts and signatures
pub enum MythosConfig {}

impl subxt::Config for MythosConfig {
    type Hash = H256;
    type AccountId = AccountId20;
    type Address = AccountId20;
    type Signature = EthereumSignature;
    type Hasher = BlakeTwo256;
    type Header = SubstrateHeader<u32, BlakeTwo256>;
    type ExtrinsicParams = SubstrateExtrinsicParams<Self>;
    type AssetId = u32;
}

/// A connection to one node
pub struct ChainClient {
    api: OnlineClient<MythosConfig>,
    info: ChainInfo,
}

impl ChainClient {
    /// Connect and read everything needed to build transfers offline
    pub async fn connect(url: &str) -> Result<Self, TransferError> {
        let rpc_client = RpcClient::from_url(url)
            .await
            .map_err(|e| TransferError::Connection(format!("{}: {}", url, e)))?;
        let api = OnlineClient::<MythosConfig>::from_rpc_client(rpc_client.clone())
            .await
            .map_err(|e| TransferError::Connection(format!("{}: {}", url, e)))?;
        let rpc = LegacyRpcMethods::<MythosConfig>::new(rpc_client);

        let chain_name = rpc.system_chain().await?;
        let runtime = rpc.state_get_runtime_version(None).await?;
        let spec_name = runtime
            .other
            .get("specName")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TransferError::Rpc("runtime version has no specName".to_string()))?
            .to_string();

        let metadata = api.metadata();
        let call_indices = CallIndices::from_metadata(&metadata)?;
        check_call_layout(&metadata, &call_indices)?;
        let check_metadata_hash = metadata
            .extrinsic()
            .signed_extensions()
            .iter()
            .any(|ext| ext.identifier() == "CheckMetadataHash");

        let para_id = fetch_u128(&api, "ParachainInfo", "ParachainId")
            .await?
            .ok_or_else(|| TransferError::Rpc("ParachainInfo.ParachainId not set".to_string()))?;
        let xcm_version = fetch_u128(&api, "PolkadotXcm", "SafeXcmVersion")
            .await?
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_XCM_VERSION);

        let properties = rpc.system_properties().await?;
        let token_symbol = match properties.get("tokenSymbol") {
            Some(serde_json::Value::String(symbol)) => symbol.clone(),
            Some(serde_json::Value::Array(symbols)) => symbols
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_TOKEN_SYMBOL)
                .to_string(),
            _ => DEFAULT_TOKEN_SYMBOL.to_string(),
        };

        let info = ChainInfo {
            spec_name: spec_name.clone(),
            para_id: u32::try_from(para_id)
                .map_err(|_| TransferError::Rpc(format!("para id {} out of range", para_id)))?,
            xcm_version,
            token_symbol,
            material: Material {
                genesis_hash: format!("0x{}", hex::encode(api.genesis_hash().0)),
                chain_name,
                spec_name,
                spec_version: runtime.spec_version,
                tx_version: runtime.transaction_version,
                check_metadata_hash,
                call_indices,
            },
        };

        tracing::info!(
            chain = %info.material.chain_name,
            spec = %info.spec_name,
            spec_version = info.material.spec_version,
            para_id = info.para_id,
            xcm_version = info.xcm_version,
            "connected to {}",
            url
        );
        tracing::debug!(call_indices = ?info.material.call_indices, check_metadata_hash, "runtime layout");

        Ok(ChainClient { api, info })
    }

    /// Transfer API bound to this chain
    pub fn transfer_api(&self) -> AssetTransferApi {
        AssetTransferApi::new(self.info.clone())
    }

    /// Nonce and reference block for `sender` at the latest block
    pub async fn build_context(&self, sender: &AccountId20) -> Result<BuildContext, TransferError> {
        let nonce = self.api.tx().account_nonce(sender).await?;
        let nonce = u32::try_from(nonce)
            .map_err(|_| TransferError::Rpc(format!("nonce {} out of range", nonce)))?;

        let block = self.api.blocks().at_latest().await?;
        let reference_block = format!("0x{}", hex::encode(block.hash().0));

        tracing::debug!(%sender, nonce, block = block.number(), %reference_block, "build context");

        Ok(BuildContext {
            sender: sender.to_checksum(),
            nonce,
            tip: 0,
            material: self.info.material.clone(),
            validity: Validity {
                first_valid: block.number(),
                max_duration: DEFAULT_MORTALITY,
            },
            reference_block,
        })
    }

    /// Submit a signed extrinsic and stream its status
    ///
    /// In-block updates carry the events emitted by the extrinsic.
    pub async fn submit_and_watch(
        &self,
        tx: &Transaction,
    ) -> Result<impl Stream<Item = Result<StatusUpdate, TransferError>>, TransferError> {
        if !tx.is_signed() {
            return Err(TransferError::InvalidTransaction(
                "Only signed transactions can be submitted".to_string(),
            ));
        }

        let progress = SubmittableExtrinsic::from_bytes(self.api.clone(), tx.to_bytes()?)
            .submit_and_watch()
            .await
            .map_err(|e| TransferError::Submission(e.to_string()))?;
        tracing::info!(hash = ?progress.extrinsic_hash(), "submitted");

        Ok(stream::unfold(progress, |mut progress| async move {
            let update = match progress.next().await? {
                Ok(status) => status_update(status).await,
                Err(e) => Err(e.into()),
            };
            Some((update, progress))
        }))
    }
}

/// Transactions are encoded offline from `CallIndices`, so the runtime must
/// lay out the Balances calls the same way its metadata does
fn check_call_layout(
    metadata: &subxt::Metadata,
    indices: &CallIndices,
) -> Result<(), TransferError> {
    let to = AccountId20([0u8; 20]).to_checksum();
    let intents = [
        TransactionIntent::Transfer {
            to: to.clone(),
            amount: 1,
            keep_alive: false,
        },
        TransactionIntent::Transfer {
            to: to.clone(),
            amount: 1,
            keep_alive: true,
        },
        TransactionIntent::TransferAll {
            to,
            keep_alive: true,
        },
    ];

    for intent in &intents {
        let offline = calls::encode_call(intent, indices)?;
        let expected = calls::encode_call_with_metadata(intent, metadata)?;
        if offline != expected {
            return Err(TransferError::InvalidTransaction(format!(
                "{} layout differs from runtime metadata: 0x{} != 0x{}",
                calls::method_name(intent),
                hex::encode(offline),
                hex::encode(expected)
            )));
        }
    }
    Ok(())
}

async fn status_update(
    status: TxStatus<MythosConfig, OnlineClient<MythosConfig>>,
) -> Result<StatusUpdate, TransferError> {
    Ok(match status {
        TxStatus::Validated => StatusUpdate::Ready,
        TxStatus::Broadcasted { num_peers } => StatusUpdate::Broadcast { num_peers },
        TxStatus::NoLongerInBestBlock => StatusUpdate::Retracted,
        TxStatus::InBestBlock(in_block) => StatusUpdate::InBlock {
            block_hash: format!("0x{}", hex::encode(in_block.block_hash().0)),
            events: fetch_events(&in_block).await?,
        },
        TxStatus::InFinalizedBlock(in_block) => StatusUpdate::Finalized {
            block_hash: format!("0x{}", hex::encode(in_block.block_hash().0)),
        },
        TxStatus::Error { message } => StatusUpdate::Error { message },
        TxStatus::Invalid { message } => StatusUpdate::Invalid { message },
        TxStatus::Dropped { message } => StatusUpdate::Dropped { message },
    })
}

async fn fetch_events(
    in_block: &TxInBlock<MythosConfig, OnlineClient<MythosConfig>>,
) -> Result<Vec<EventRecord>, TransferError> {
    let events = in_block.fetch_events().await?;
    events
        .iter()
        .map(|event| -> Result<EventRecord, TransferError> {
            let event = event?;
            Ok(EventRecord {
                phase: format!("{:?}", event.phase()),
                pallet: event.pallet_name().to_string(),
                variant: event.variant_name().to_string(),
                data: event
                    .field_values()
                    .map_err(|e| TransferError::Rpc(e.to_string()))?
                    .to_string(),
            })
        })
        .collect()
}

/// Read a plain numeric storage value; `None` when the pallet or entry is
/// absent from the runtime or holds no value
async fn fetch_u128(
    api: &OnlineClient<MythosConfig>,
    pallet: &str,
    entry: &str,
) -> Result<Option<u128>, TransferError> {
    let metadata = api.metadata();
    let exists = metadata
        .pallet_by_name(pallet)
        .and_then(|p| p.storage())
        .and_then(|s| s.entry_by_name(entry))
        .is_some();
    if !exists {
        tracing::debug!(pallet, entry, "storage entry not in metadata");
        return Ok(None);
    }

    let address = subxt::dynamic::storage(pallet, entry, ());
    let value = api.storage().at_latest().await?.fetch(&address).await?;
    match value {
        Some(thunk) => {
            let value = thunk
                .to_value()
                .map_err(|e| TransferError::Rpc(format!("{}.{}: {}", pallet, entry, e)))?;
            Ok(value_as_u128(&value))
        }
        None => Ok(None),
    }
}

/// Unwrap single-field composites (newtypes such as `Id(u32)`) down to a number
fn value_as_u128<T>(value: &Value<T>) -> Option<u128> {
    match &value.value {
        ValueDef::Primitive(Primitive::U128(n)) => Some(*n),
        ValueDef::Composite(composite) => {
            let mut fields = composite.values();
            match (fields.next(), fields.next()) {
                (Some(inner), None) => value_as_u128(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_as_u128() {
        assert_eq!(value_as_u128(&Value::u128(3369)), Some(3369));
        assert_eq!(
            value_as_u128(&Value::unnamed_composite([Value::u128(4)])),
            Some(4)
        );
        assert_eq!(
            value_as_u128(&Value::named_composite([("id", Value::u128(7))])),
            Some(7)
        );
        assert_eq!(
            value_as_u128(&Value::unnamed_composite([Value::u128(1), Value::u128(2)])),
            None
        );
        assert_eq!(value_as_u128(&Value::bool(true)), None);
    }
}

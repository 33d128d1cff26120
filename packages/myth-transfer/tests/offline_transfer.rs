//! End-to-end offline flows: build, sign, encode, decode

use myth_transfer::builder::calls::CallIndices;
use myth_transfer::keyring::recover_signer;
use myth_transfer::transfer::Direction;
use myth_transfer::{
    build_transaction, parse_transaction, AssetTransferApi, BuildContext, ChainInfo,
    EthereumSigner, Format, KeyType, Material, ParseContext, TransactionIntent, TransferError,
    TransferOptions, Validity,
};

const ALITH_SEED: &str = "0x5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133";
const BALTATHAR_SEED: &str = "0x8075991ce870b93a8870eca0c0f91913d12f47948ca0fd25b49c6fa7cdbeee8b";

fn material() -> Material {
    Material {
        genesis_hash: format!("0x{}", "ab".repeat(32)),
        chain_name: "Mythos".to_string(),
        spec_name: "mythos".to_string(),
        spec_version: 1_015,
        tx_version: 1,
        check_metadata_hash: true,
        call_indices: CallIndices::default(),
    }
}

fn context(sender: &EthereumSigner, nonce: u32) -> BuildContext {
    BuildContext {
        sender: sender.account_id().to_checksum(),
        nonce,
        tip: 0,
        material: material(),
        validity: Validity {
            first_valid: 7_000_123,
            max_duration: 64,
        },
        reference_block: format!("0x{}", "cd".repeat(32)),
    }
}

fn signers() -> (EthereumSigner, EthereumSigner) {
    (
        EthereumSigner::from_uri(KeyType::Ethereum, ALITH_SEED).unwrap(),
        EthereumSigner::from_uri(KeyType::Ethereum, BALTATHAR_SEED).unwrap(),
    )
}

#[test]
fn signed_transfer_all_is_deterministic_and_decodes() {
    let (alith, baltathar) = signers();
    let intent = TransactionIntent::TransferAll {
        to: baltathar.account_id().to_checksum(),
        keep_alive: true,
    };

    let mut first = build_transaction(intent.clone(), context(&alith, 2)).unwrap();
    first.sign(&alith).unwrap();
    let mut second = build_transaction(intent, context(&alith, 2)).unwrap();
    second.sign(&alith).unwrap();
    assert_eq!(first.to_hex().unwrap(), second.to_hex().unwrap());

    let parsed = parse_transaction(
        &first.to_bytes().unwrap(),
        Some(ParseContext {
            material: material(),
        }),
    )
    .unwrap();

    assert!(parsed.is_signed);
    assert_eq!(parsed.sender, Some(alith.account_id().to_checksum()));
    assert_eq!(parsed.method.name, "transferAll");
    assert_eq!(
        parsed.method.args["dest"],
        baltathar.account_id().to_checksum()
    );
    assert_eq!(parsed.method.args["keepAlive"], true);
}

#[test]
fn signature_recovers_sender() {
    let (alith, baltathar) = signers();
    let intent = TransactionIntent::Transfer {
        to: baltathar.account_id().to_checksum(),
        amount: 100_000_000,
        keep_alive: true,
    };
    let mut tx = build_transaction(intent, context(&alith, 0)).unwrap();
    tx.sign(&alith).unwrap();

    let payload = tx.signable_payload().unwrap();
    let signature = tx.signature().unwrap();
    assert_eq!(recover_signer(signature, &payload).unwrap(), alith.account_id());
    assert!(tx.verify_signature().unwrap());
}

#[test]
fn transfer_api_payload_roundtrip() {
    let (alith, baltathar) = signers();
    let api = AssetTransferApi::new(ChainInfo {
        spec_name: "mythos".to_string(),
        para_id: 3369,
        xcm_version: 4,
        token_symbol: "MYTH".to_string(),
        material: material(),
    });

    let recipient = format!("0x{}", hex::encode(baltathar.public_key()));
    let result = api
        .create_transfer_transaction(
            "3369",
            &recipient,
            &["MYTH".to_string()],
            &["1000000000000".to_string()],
            &TransferOptions::default(),
            Some(context(&alith, 11)),
        )
        .unwrap();
    assert_eq!(result.direction, Direction::Local);

    let decoded: serde_json::Value =
        serde_json::from_str(&api.decode_extrinsic(&result.tx, Format::Payload).unwrap()).unwrap();
    assert_eq!(decoded["method"]["args"]["value"], "1000000000000");
    assert_eq!(
        decoded["method"]["args"]["dest"],
        baltathar.account_id().to_checksum()
    );
    assert_eq!(decoded["nonce"], 11);
    assert_eq!(decoded["mode"], 0);
}

#[test]
fn transfer_api_rejects_bad_recipient() {
    let api = AssetTransferApi::new(ChainInfo {
        spec_name: "mythos".to_string(),
        para_id: 3369,
        xcm_version: 4,
        token_symbol: "MYTH".to_string(),
        material: material(),
    });

    let result = api.create_transfer_transaction(
        "3369",
        "not-an-address",
        &[],
        &["1".to_string()],
        &TransferOptions::default(),
        None,
    );
    assert!(matches!(result, Err(TransferError::InvalidAddress(_))));
}

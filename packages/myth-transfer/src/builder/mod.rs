//! Transaction building from intents
//!
//! Build Mythos balance transfers from high-level intent descriptions

pub mod calls;
pub mod types;

use crate::address::parse_address;
use crate::error::TransferError;
use crate::transaction::{parse_hex_hash, Transaction, TransactionContext};
use crate::types::{Era, Validity};
use types::{BuildContext, TransactionIntent};

/// Build a transaction from an intent
///
/// # Arguments
/// * `intent` - High-level description of the transaction
/// * `context` - Chain context (sender, nonce, material, etc.)
pub fn build_transaction(
    intent: TransactionIntent,
    context: BuildContext,
) -> Result<Transaction, TransferError> {
    parse_address(&context.sender)?;

    let call_data = calls::encode_call(&intent, &context.material.call_indices)?;
    let era = compute_era(&context.validity);
    let reference_block = parse_hex_hash(&context.reference_block)?;

    tracing::debug!(
        method = calls::method_name(&intent),
        nonce = context.nonce,
        call_len = call_data.len(),
        "built call"
    );

    Ok(Transaction::new_unsigned(
        call_data,
        era,
        context.nonce,
        context.tip,
        TransactionContext {
            material: context.material,
            reference_block,
        },
    ))
}

/// Compute era from validity window
fn compute_era(validity: &Validity) -> Era {
    if validity.max_duration == 0 {
        Era::Immortal
    } else {
        Era::mortal(validity.max_duration, validity.first_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::EthereumSigner;
    use crate::test_utils::{build_context, ALITH_SEED, BALTATHAR, BALTATHAR_PUBKEY};

    #[test]
    fn test_build_transfer() {
        let intent = TransactionIntent::Transfer {
            to: BALTATHAR.to_string(),
            amount: 1_000_000_000_000,
            keep_alive: true,
        };

        let tx = build_transaction(intent, build_context(0, false)).unwrap();
        assert!(!tx.is_signed());
        assert_eq!(&tx.call_data()[..2], &[10, 3]);
        assert_eq!(
            tx.era(),
            &Era::Mortal {
                period: 64,
                phase: 5_230_017 % 64
            }
        );
    }

    #[test]
    fn test_build_accepts_public_key_recipient() {
        let by_address = TransactionIntent::Transfer {
            to: BALTATHAR.to_string(),
            amount: 10_001,
            keep_alive: false,
        };
        let by_pubkey = TransactionIntent::Transfer {
            to: BALTATHAR_PUBKEY.to_string(),
            amount: 10_001,
            keep_alive: false,
        };

        let a = build_transaction(by_address, build_context(3, false)).unwrap();
        let b = build_transaction(by_pubkey, build_context(3, false)).unwrap();
        assert_eq!(a.call_data(), b.call_data());
        assert_eq!(&a.call_data()[..2], &[10, 0]);
    }

    #[test]
    fn test_build_and_sign() {
        let signer = EthereumSigner::from_private_key_hex(ALITH_SEED).unwrap();
        let intent = TransactionIntent::TransferAll {
            to: BALTATHAR.to_string(),
            keep_alive: true,
        };

        let mut tx = build_transaction(intent, build_context(1, true)).unwrap();
        tx.sign(&signer).unwrap();
        assert!(tx.verify_signature().unwrap());
        assert!(tx.id().is_some());
    }

    #[test]
    fn test_immortal_when_no_duration() {
        let mut context = build_context(0, false);
        context.validity.max_duration = 0;
        let intent = TransactionIntent::TransferAll {
            to: BALTATHAR.to_string(),
            keep_alive: false,
        };
        let tx = build_transaction(intent, context).unwrap();
        assert!(tx.era().is_immortal());
    }

    #[test]
    fn test_rejects_bad_sender_and_block() {
        let intent = TransactionIntent::TransferAll {
            to: BALTATHAR.to_string(),
            keep_alive: false,
        };

        let mut context = build_context(0, false);
        context.sender = "alice".to_string();
        assert!(matches!(
            build_transaction(intent.clone(), context),
            Err(TransferError::InvalidAddress(_))
        ));

        let mut context = build_context(0, false);
        context.reference_block = "0x1234".to_string();
        assert!(build_transaction(intent, context).is_err());
    }
}

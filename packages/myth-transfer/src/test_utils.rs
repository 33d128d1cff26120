//! Fixtures shared by unit tests

use crate::builder::calls::CallIndices;
use crate::builder::types::BuildContext;
use crate::types::{Material, Validity};

pub const ALITH_SEED: &str = "0x5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133";
pub const BALTATHAR_SEED: &str =
    "0x8075991ce870b93a8870eca0c0f91913d12f47948ca0fd25b49c6fa7cdbeee8b";

pub const ALITH: &str = "0xf24FF3a9CF04c71Dbc94D0b566f7A27B94566cac";
pub const BALTATHAR: &str = "0x3Cd0A705a2DC65e5b1E1205896BaA2be8A07c6e0";
pub const BALTATHAR_PUBKEY: &str =
    "0x033bc19e36ff1673910575b6727a974a9abd80c9a875d41ab3e2648dbfb9e4b518";

pub const GENESIS: &str = "0xf6ee56e9c5277df5b4ce6ae9983ee88f3cbed27d31beeb98f9f84f997a1ab0b9";
pub const REFERENCE_BLOCK: &str =
    "0x4d2f8b6c1a0e9f7d3c5b2a1908f7e6d5c4b3a29180f7e6d5c4b3a29180f7e6d5";

pub fn material(check_metadata_hash: bool) -> Material {
    Material {
        genesis_hash: GENESIS.to_string(),
        chain_name: "Mythos".to_string(),
        spec_name: "mythos".to_string(),
        spec_version: 1014,
        tx_version: 1,
        check_metadata_hash,
        call_indices: CallIndices::default(),
    }
}

pub fn build_context(nonce: u32, check_metadata_hash: bool) -> BuildContext {
    BuildContext {
        sender: ALITH.to_string(),
        nonce,
        tip: 0,
        material: material(check_metadata_hash),
        validity: Validity {
            first_valid: 5_230_017,
            max_duration: 64,
        },
        reference_block: REFERENCE_BLOCK.to_string(),
    }
}

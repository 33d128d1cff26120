//! Intent types for transaction building
//!
//! buildTransaction(intent, context)
//! - intent: what to do (transfer, transfer all) - single operation
//! - context: how to build it (sender, nonce, material, validity)

use crate::types::{Material, Validity};

/// Transaction intent - what to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionIntent {
    /// Transfer MYTH to recipient
    Transfer {
        /// Recipient address (H160 hex or public key)
        to: String,
        /// Amount in the smallest unit
        amount: u128,
        /// Use transfer_keep_alive instead of transfer_allow_death
        keep_alive: bool,
    },
    /// Transfer the whole free balance to recipient
    TransferAll {
        /// Recipient address (H160 hex or public key)
        to: String,
        /// Keep the sender above the existential deposit
        keep_alive: bool,
    },
}

/// Build context - how to build the transaction
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Sender address
    pub sender: String,
    /// Account nonce
    pub nonce: u32,
    pub tip: u128,
    /// Chain material metadata
    pub material: Material,
    /// Validity window
    pub validity: Validity,
    /// Reference block hash for mortality
    pub reference_block: String,
}

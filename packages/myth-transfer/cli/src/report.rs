//! Console reporting for tracked submissions

use myth_transfer::tracking::{EventRecord, StatusObserver, StatusUpdate};

/// Logs inclusion events and finalization
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    included: usize,
}

impl ConsoleReporter {
    /// Number of times the extrinsic was seen in a best block
    pub fn included(&self) -> usize {
        self.included
    }
}

impl StatusObserver for ConsoleReporter {
    fn on_status(&mut self, update: &StatusUpdate) {
        tracing::info!(status = update.name(), "Transaction status: {}", update.name());
    }

    fn on_included(&mut self, block_hash: &str, events: &[EventRecord]) {
        self.included += 1;
        tracing::info!(block_hash, "Transaction included at blockHash {}", block_hash);
        for event in events {
            tracing::info!("\t{}", event);
        }
    }

    fn on_finalized(&mut self, block_hash: &str) {
        tracing::info!(block_hash, "Transaction finalized at blockHash {}", block_hash);
    }
}

//! Transaction status tracking
//!
//! [`StatusTracker`] is a plain state machine over [`StatusUpdate`]s and knows
//! nothing about the network. [`track`] drives it over any stream of updates
//! and reports to a [`StatusObserver`].

use crate::error::TransferError;
use futures_util::{Stream, StreamExt};
use std::fmt;

/// An event emitted by the extrinsic in its inclusion block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event phase, e.g. `ApplyExtrinsic(2)`
    pub phase: String,
    pub pallet: String,
    pub variant: String,
    /// Event fields rendered as text
    pub data: String,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}.{} {}", self.phase, self.pallet, self.variant, self.data)
    }
}

/// Status notification for a submitted extrinsic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Accepted into the transaction pool
    Ready,
    /// Gossiped to peers
    Broadcast { num_peers: u32 },
    /// Included in a best block
    InBlock {
        block_hash: String,
        events: Vec<EventRecord>,
    },
    /// The including block is no longer best
    Retracted,
    Finalized { block_hash: String },
    Dropped { message: String },
    Invalid { message: String },
    Error { message: String },
}

impl StatusUpdate {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            StatusUpdate::Ready => "ready",
            StatusUpdate::Broadcast { .. } => "broadcast",
            StatusUpdate::InBlock { .. } => "inBlock",
            StatusUpdate::Retracted => "retracted",
            StatusUpdate::Finalized { .. } => "finalized",
            StatusUpdate::Dropped { .. } => "dropped",
            StatusUpdate::Invalid { .. } => "invalid",
            StatusUpdate::Error { .. } => "error",
        }
    }
}

/// Lifecycle of a submitted extrinsic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Pending,
    Submitted,
    InBlock,
    Finalized,
    Dropped,
}

impl TxState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxState::Finalized | TxState::Dropped)
    }
}

/// What the caller should report after an update
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a> {
    Continue,
    Included {
        block_hash: &'a str,
        events: &'a [EventRecord],
    },
    Finalized {
        block_hash: &'a str,
    },
}

#[derive(Debug)]
pub struct StatusTracker {
    state: TxState,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        StatusTracker {
            state: TxState::Pending,
        }
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Apply one update
    ///
    /// Dropped, invalid and error updates move to `Dropped` and return a
    /// `Submission` error. Any update after a terminal state, or one that does
    /// not follow from the current state, returns `UnexpectedStatus`.
    pub fn apply<'a>(&mut self, update: &'a StatusUpdate) -> Result<Step<'a>, TransferError> {
        use TxState::*;

        if self.state.is_terminal() {
            return Err(self.unexpected(update));
        }

        match (self.state, update) {
            (Pending | Submitted, StatusUpdate::Ready | StatusUpdate::Broadcast { .. }) => {
                self.state = Submitted;
                Ok(Step::Continue)
            }
            (Pending | Submitted | InBlock, StatusUpdate::InBlock { block_hash, events }) => {
                self.state = InBlock;
                Ok(Step::Included { block_hash, events })
            }
            (InBlock, StatusUpdate::Retracted) => {
                self.state = Submitted;
                Ok(Step::Continue)
            }
            (_, StatusUpdate::Finalized { block_hash }) => {
                self.state = Finalized;
                Ok(Step::Finalized { block_hash })
            }
            (
                _,
                StatusUpdate::Dropped { message }
                | StatusUpdate::Invalid { message }
                | StatusUpdate::Error { message },
            ) => {
                self.state = Dropped;
                Err(TransferError::Submission(format!(
                    "transaction {}: {}",
                    update.name(),
                    message
                )))
            }
            _ => Err(self.unexpected(update)),
        }
    }

    fn unexpected(&self, update: &StatusUpdate) -> TransferError {
        TransferError::UnexpectedStatus(format!(
            "{} while {:?}",
            update.name(),
            self.state
        ))
    }
}

/// Receives tracking progress
pub trait StatusObserver {
    /// Every raw update, before it is applied
    fn on_status(&mut self, _update: &StatusUpdate) {}

    fn on_included(&mut self, block_hash: &str, events: &[EventRecord]);

    fn on_finalized(&mut self, block_hash: &str);
}

/// Follow `updates` until finalization and return the finalized block hash
///
/// Waits as long as the stream does. A stream that ends before finalization
/// is a `Submission` error.
pub async fn track<S, O>(updates: S, observer: &mut O) -> Result<String, TransferError>
where
    S: Stream<Item = Result<StatusUpdate, TransferError>>,
    O: StatusObserver + ?Sized,
{
    futures_util::pin_mut!(updates);
    let mut tracker = StatusTracker::new();

    while let Some(update) = updates.next().await {
        let update = update?;
        observer.on_status(&update);

        match tracker.apply(&update)? {
            Step::Continue => {}
            Step::Included { block_hash, events } => observer.on_included(block_hash, events),
            Step::Finalized { block_hash } => {
                observer.on_finalized(block_hash);
                return Ok(block_hash.to_string());
            }
        }
    }

    Err(TransferError::Submission(format!(
        "status stream ended in state {:?}",
        tracker.state()
    )))
}

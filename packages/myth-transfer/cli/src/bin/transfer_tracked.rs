//! Submit a keep-alive transfer and follow it until it is finalized

use anyhow::{Context, Result};
use clap::Parser;
use myth_transfer::{build_transaction, track, ChainClient, TransactionIntent};
use myth_transfer_cli::args::TrackedArgs;
use myth_transfer_cli::report::ConsoleReporter;
use myth_transfer_cli::{accounts, exit_code, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = TrackedArgs::parse();
    logging::init(args.common.log_format);
    exit_code(run(args).await)
}

async fn run(args: TrackedArgs) -> Result<()> {
    let sender = accounts::signer(&args.keys.sender_seed)?;
    let recipient = accounts::signer(&args.keys.recipient_seed)?.account_id();

    let client = ChainClient::connect(&args.common.url)
        .await
        .context("Failed to connect")?;
    let context = client
        .build_context(&sender.account_id())
        .await
        .context("Failed to fetch sender nonce and reference block")?;

    let intent = TransactionIntent::Transfer {
        to: recipient.to_checksum(),
        amount: args.amount,
        keep_alive: true,
    };
    let mut tx = build_transaction(intent, context)?;
    tx.sign(&sender).context("Failed to sign transfer")?;

    let updates = client
        .submit_and_watch(&tx)
        .await
        .context("Failed to submit transfer")?;
    let mut reporter = ConsoleReporter::default();
    let block_hash = track(updates, &mut reporter)
        .await
        .context("Transfer did not finalize")?;

    tracing::info!(%block_hash, id = ?tx.id(), "done");
    Ok(())
}

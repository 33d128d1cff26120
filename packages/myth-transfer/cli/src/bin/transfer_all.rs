//! Sign a `Balances.transfer_all` from the sender to the recipient and print it

use anyhow::{Context, Result};
use clap::Parser;
use myth_transfer::{build_transaction, ChainClient, TransactionIntent};
use myth_transfer_cli::args::TransferAllArgs;
use myth_transfer_cli::{accounts, exit_code, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = TransferAllArgs::parse();
    logging::init(args.common.log_format);
    exit_code(run(args).await)
}

async fn run(args: TransferAllArgs) -> Result<()> {
    let sender = accounts::signer(&args.keys.sender_seed)?;
    let recipient = accounts::signer(&args.keys.recipient_seed)?.account_id();

    let client = ChainClient::connect(&args.common.url)
        .await
        .context("Failed to connect")?;
    let context = client
        .build_context(&sender.account_id())
        .await
        .context("Failed to fetch sender nonce and reference block")?;

    let intent = TransactionIntent::TransferAll {
        to: recipient.to_checksum(),
        keep_alive: !args.allow_death,
    };
    let mut tx = build_transaction(intent, context)?;
    tx.sign(&sender).context("Failed to sign transfer")?;

    tracing::info!(from = %sender.account_id(), to = %recipient, "signed transfer_all");
    println!("{}", tx.to_hex()?);

    Ok(())
}

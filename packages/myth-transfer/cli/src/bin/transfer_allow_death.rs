//! Sign a `Balances.transfer_allow_death` and print the encoded extrinsic

use anyhow::{Context, Result};
use clap::Parser;
use myth_transfer::{build_transaction, ChainClient, TransactionIntent};
use myth_transfer_cli::args::AllowDeathArgs;
use myth_transfer_cli::{accounts, exit_code, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = AllowDeathArgs::parse();
    logging::init(args.common.log_format);
    exit_code(run(args).await)
}

async fn run(args: AllowDeathArgs) -> Result<()> {
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
        keep_alive: false,
    };
    let mut tx = build_transaction(intent, context)?;
    tx.sign(&sender).context("Failed to sign transfer")?;

    println!("Encoded extrinsic: {}", tx.to_hex()?);
    Ok(())
}

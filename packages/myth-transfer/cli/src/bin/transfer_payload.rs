//! Build an unsigned local MYTH transfer, print it, then decode it back

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use myth_transfer::{parse_address, ChainClient, Format, TransferOptions};
use myth_transfer_cli::args::PayloadArgs;
use myth_transfer_cli::{exit_code, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = PayloadArgs::parse();
    logging::init(args.common.log_format);
    exit_code(run(args).await)
}

async fn run(args: PayloadArgs) -> Result<()> {
    let client = ChainClient::connect(&args.common.url)
        .await
        .context("Failed to connect")?;
    let api = client.transfer_api();
    let format = Format::from(args.format);

    let context = match format {
        Format::Call => None,
        Format::Payload | Format::Submittable => {
            let sender = parse_address(&args.sender).context("Invalid sender")?;
            Some(
                client
                    .build_context(&sender)
                    .await
                    .context("Failed to fetch sender nonce and reference block")?,
            )
        }
    };

    let options = TransferOptions {
        format,
        senders_addr: Some(args.sender.clone()),
        keep_alive: args.keep_alive,
        xcm_version: None,
    };
    let result = api
        .create_transfer_transaction(
            &args.dest_chain_id,
            &args.dest_addr,
            &[],
            &[args.amount.clone()],
            &options,
            context,
        )
        .context("Failed to create transfer")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let decoded = api
        .decode_extrinsic(&result.tx, format)
        .context("Failed to decode transfer")?;
    println!(
        "\n{}\n{}",
        "The following decoded tx:".purple(),
        decoded.green()
    );

    Ok(())
}

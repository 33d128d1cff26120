//! Command line arguments for the example programs
//!
//! Every flag has an environment fallback and a default that reproduces the
//! stock demo run, so the programs can be started without arguments.

use crate::accounts::{ALITH_PUBKEY, ALITH_SEED, BALTATHAR_PUBKEY, BALTATHAR_SEED};
use clap::{Args, Parser, ValueEnum};
use myth_transfer::{Format, DEFAULT_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Output format of a built transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Call,
    Payload,
    Submittable,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Call => Format::Call,
            FormatArg::Payload => Format::Payload,
            FormatArg::Submittable => Format::Submittable,
        }
    }
}

/// Flags shared by all programs
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Node RPC endpoint
    #[arg(long, env = "MYTH_RPC_URL", default_value = DEFAULT_URL)]
    pub url: String,
    /// Log output format (stderr)
    #[arg(long, env = "MYTH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Sender and recipient dev keys
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Sender secret seed (0x-prefixed hex)
    #[arg(long, env = "MYTH_SENDER_SEED", default_value = ALITH_SEED)]
    pub sender_seed: String,
    /// Recipient secret seed (0x-prefixed hex); only its account is used
    #[arg(long, env = "MYTH_RECIPIENT_SEED", default_value = BALTATHAR_SEED)]
    pub recipient_seed: String,
}

/// Build an unsigned transfer, print it and decode it back
#[derive(Debug, Parser)]
#[command(name = "transfer-payload", version)]
pub struct PayloadArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Destination para id; equal to the origin para id for a local transfer
    #[arg(long, default_value = "3369")]
    pub dest_chain_id: String,
    /// Recipient account or public key
    #[arg(long, default_value = BALTATHAR_PUBKEY)]
    pub dest_addr: String,
    /// Amount in the smallest unit
    #[arg(long, default_value = "1000000000000")]
    pub amount: String,
    /// Sender account or public key
    #[arg(long, default_value = ALITH_PUBKEY)]
    pub sender: String,
    #[arg(long, value_enum, default_value_t = FormatArg::Payload)]
    pub format: FormatArg,
    /// Use transfer_keep_alive instead of transfer_allow_death
    #[arg(long)]
    pub keep_alive: bool,
}

/// Sign a transfer of the whole free balance and print it
#[derive(Debug, Parser)]
#[command(name = "transfer-all", version)]
pub struct TransferAllArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub keys: KeyArgs,
    /// Let the sender account be reaped
    #[arg(long)]
    pub allow_death: bool,
}

/// Submit a keep-alive transfer and follow it to finalization
#[derive(Debug, Parser)]
#[command(name = "transfer-tracked", version)]
pub struct TrackedArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub keys: KeyArgs,
    /// Amount in the smallest unit
    #[arg(long, default_value_t = 100_000_000)]
    pub amount: u128,
}

/// Sign a transfer_allow_death and print the encoded extrinsic
#[derive(Debug, Parser)]
#[command(name = "transfer-allow-death", version)]
pub struct AllowDeathArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub keys: KeyArgs,
    /// Amount in the smallest unit
    #[arg(long, default_value_t = 10_001)]
    pub amount: u128,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "srl",
    about = "Sealed Record Ledger: encoded records with signature-gated reveal",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger file shared by every client on this machine
    #[arg(long, global = true, default_value = ".srl/ledger.json")]
    pub store: PathBuf,

    /// Wallet key file
    #[arg(long, global = true, default_value = ".srl/wallet.key")]
    pub key: PathBuf,

    /// Client configuration
    #[arg(long, global = true, default_value = ".srl/srl.toml")]
    pub config: PathBuf,

    /// Chain the local wallet reports
    #[arg(long, global = true, default_value_t = 31337)]
    pub chain_id: u64,

    /// Approve every write and signature prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a wallet key, ledger file, and default configuration
    Init(InitArgs),
    /// Encode a value and publish it as a new record
    Create(CreateArgs),
    /// List records, newest first
    List(ListArgs),
    /// Show one record
    Show(RecordArgs),
    /// Mark a prepared record as cast
    Cast(RecordArgs),
    /// Mark a prepared record as failed
    Fail(RecordArgs),
    /// Sign the session challenge and reveal a record's value
    Reveal(RecordArgs),
    /// Count records per status
    Stats(StatsArgs),
    /// Print the message a reveal asks the wallet to sign
    Challenge(ChallengeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing wallet key
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    pub category: String,
    #[arg(allow_negative_numbers = true)]
    pub cost: f64,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive match on category or author
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// all, prepared, cast or failed
    #[arg(long, default_value = "all")]
    pub status: String,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct RecordArgs {
    pub id: String,
}

#[derive(Args)]
pub struct StatsArgs {}

#[derive(Args)]
pub struct ChallengeArgs {}

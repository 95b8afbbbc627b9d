use clap::Parser;
use std::path::PathBuf;

/// Audit a VAP ledger snapshot file
#[derive(Parser, Debug)]
#[command(name = "vap-ledger")]
#[command(
    about = "Validate a ledger snapshot by replaying its transaction log",
    long_about = None
)]
pub struct CliArgs {
    /// Snapshot JSON file produced by a ledger backup
    #[arg(value_name = "SNAPSHOT", help = "Path to the snapshot JSON file")]
    pub snapshot_file: PathBuf,

    /// Print every account with its balance after validation
    #[arg(long = "accounts", help = "List account balances after validation")]
    pub list_accounts: bool,

    /// Print every transaction in log order after validation
    #[arg(long = "transactions", help = "List transactions after validation")]
    pub list_transactions: bool,
}

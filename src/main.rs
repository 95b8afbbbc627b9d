//! VAP Ledger snapshot audit CLI
//!
//! Loads a snapshot JSON file (as produced by a ledger backup), runs the full
//! restore validation against it — replaying the transaction log and
//! reconciling the result with the declared balances — and prints a summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- backup.json
//! cargo run -- --accounts backup.json
//! cargo run -- --accounts --transactions backup.json
//! ```
//!
//! # Exit Codes
//!
//! - 0: snapshot is valid
//! - 1: file unreadable, malformed JSON, or validation failure

use std::fs;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use vap_ledger::{cli, LedgerError, Snapshot};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    match audit(&args.snapshot_file) {
        Ok(snapshot) => {
            println!(
                "snapshot OK: {} accounts, {} transactions",
                snapshot.accounts.len(),
                snapshot.transactions.len()
            );
            if args.list_accounts {
                for account in &snapshot.accounts {
                    println!("{}\t{}\t{}", account.username, account.role, account.balance);
                }
            }
            if args.list_transactions {
                for tx in &snapshot.transactions {
                    println!(
                        "{}\t{} -> {}\t{}\t{}",
                        tx.tx_id, tx.from, tx.to, tx.amount, tx.timestamp
                    );
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Load a snapshot file and run restore validation against it
fn audit(path: &Path) -> Result<Snapshot, LedgerError> {
    let contents = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&contents)?;
    snapshot.validate()?;
    Ok(snapshot)
}

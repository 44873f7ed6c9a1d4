mod app;
mod db;
mod errors;
mod models;
mod operations;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::db::repository::TransactionStore;
use crate::errors::Error;
use crate::operations::export::export_transactions_to_csv;
use crate::operations::import::import_transactions_from_csv;

/// Track personal income and expenses from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application database.
    #[arg(long, default_value = "finance_tracker.db")]
    db_path: PathBuf,

    /// File path for the debug log.
    #[arg(long, default_value = "finance_tracker.log")]
    log_path: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write all transactions to a CSV file.
    Export { path: PathBuf },
    /// Append transactions from a CSV file.
    Import { path: PathBuf },
}

fn main() {
    let args = Args::parse();
    setup_logging(&args.log_path);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let kv = db::connection::establish_connection(&args.db_path)?;
    let mut store = TransactionStore::load(kv)?;

    match args.command {
        None => app::run_app(store),
        Some(Command::Export { path }) => {
            let count = export_transactions_to_csv(&store, &path)?;
            println!("Exported {} transactions to {}", count, path.display());
            Ok(())
        }
        Some(Command::Import { path }) => {
            let count = import_transactions_from_csv(&mut store, &path)?;
            println!("Imported {} transactions.", count);
            Ok(())
        }
    }
}

// The terminal UI owns stdout, so logs go to a file instead.
fn setup_logging(path: &Path) {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("Could not create log file");

    tracing_subscriber::fmt()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
}

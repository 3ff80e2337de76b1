//! Passbook CLI - bank statements in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{analyze, counterparties, export, transactions};
use passbook_core::services::init_logging;
use passbook_core::EntryPoint;

/// Passbook - parse and summarise bank statement exports
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    /// Log parser progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a statement: totals, date range and monthly activity
    Analyze {
        /// Path to the .xls statement, or - to read it from stdin
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Also write the normalized transactions to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List parsed transactions
    Transactions {
        /// Path to the .xls statement, or - to read it from stdin
        file: PathBuf,
        /// Maximum rows to show (defaults to display.transactionLimit)
        #[arg(long, short)]
        limit: Option<usize>,
        /// Only show payments with this UPI counterparty
        #[arg(long)]
        counterparty: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write normalized transactions as delimited text
    Export {
        /// Path to the .xls statement, or - to read it from stdin
        file: PathBuf,
        /// Destination file
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Show UPI counterparties by activity
    Counterparties {
        /// Path to the .xls statement, or - to read it from stdin
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(EntryPoint::Cli, cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { file, json, export } => analyze::run(&file, json, export.as_deref()),
        Commands::Transactions { file, limit, counterparty, json } => {
            transactions::run(&file, limit, counterparty.as_deref(), json)
        }
        Commands::Export { file, output } => export::run(&file, &output),
        Commands::Counterparties { file, json } => counterparties::run(&file, json),
    }
}

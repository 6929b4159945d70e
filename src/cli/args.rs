//! CLI argument definitions using clap
//!
//! Commands:
//! - ledgerfile account open|deposit|withdraw|close|show
//! - ledgerfile book add|remove|show|list
//! - ledgerfile inspect accounts|books

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

/// ledgerfile - bank accounts and books in flat binary record files
#[derive(Parser, Debug)]
#[command(name = "ledgerfile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage bank accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage the book catalogue
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Dump the byte layout of a record file
    Inspect {
        #[arg(value_enum)]
        target: InspectTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountAction {
    /// Open an account funded with a start balance
    Open {
        #[arg(long)]
        holder: String,
        #[arg(long)]
        balance: Decimal,
    },

    Deposit {
        #[arg(long)]
        iban: String,
        #[arg(long)]
        amount: Decimal,
    },

    Withdraw {
        #[arg(long)]
        iban: String,
        #[arg(long)]
        amount: Decimal,
    },

    /// Close an account and report its final balance
    Close {
        #[arg(long)]
        iban: String,
    },

    Show {
        #[arg(long)]
        iban: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookAction {
    Add {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        publisher: String,
        /// Publication date, YYYY-MM-DD
        #[arg(long)]
        published: NaiveDate,
        #[arg(long)]
        pages: u16,
        #[arg(long)]
        price: Decimal,
    },

    Remove {
        #[arg(long)]
        isbn: String,
    },

    /// Render one book
    Show {
        #[arg(long)]
        isbn: String,
        /// Named format: G (general) or L (long)
        #[arg(long, conflicts_with = "fields")]
        format: Option<String>,
        /// Field letters, e.g. IATBYPC
        #[arg(long)]
        fields: Option<String>,
    },

    /// List books, sorted by author then title unless told otherwise
    List {
        #[arg(long, value_enum, default_value_t = SortKey::Author)]
        sort: SortKey,
        /// Persist the sorted order
        #[arg(long)]
        save: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Author, then title
    Author,
    Title,
    Pages,
    Price,
    Published,
    /// Keep file order
    File,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectTarget {
    Accounts,
    Books,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

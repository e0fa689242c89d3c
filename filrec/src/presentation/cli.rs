use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use filrec_core::RecordKind;
use filrec_core::repo::DEFAULT_BRANCH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "filrec: recover and import legacy .FIL data", long_about = None)]
pub struct Cli {
    /// Directory holding one datastore snapshot per branch
    #[arg(long, global = true, default_value = "filrec-data")]
    pub data_dir: PathBuf,

    /// Branch whose datastore is used
    #[arg(long, global = true, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// JSON recovery config (code page, thresholds, fixed layout, aliases)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a throwaway in-memory datastore
    #[arg(long, global = true)]
    pub memory: bool,

    /// -v for debug, -vv for trace (RUST_LOG wins when set)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum KindArg {
    Account,
    Cash,
}

impl From<KindArg> for RecordKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Account => RecordKind::Account,
            KindArg::Cash => RecordKind::Cash,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the legacy files of a directory (digest, payload, text lines)
    Stage { dir: PathBuf },

    /// Show header, field table and first records of a dBase file
    Inspect {
        file: PathBuf,
        /// also dump the first 512 bytes
        #[arg(long)]
        hex: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Decode a file with fallbacks and print the first records
    Preview {
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Stage a directory, then import customers, cash transactions and vehicles
    Import {
        dir: PathBuf,
        /// print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Row counts of the branch datastore
    Counts {
        #[arg(long)]
        json: bool,
    },
}

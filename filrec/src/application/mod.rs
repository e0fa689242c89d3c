pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use filrec_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    handlers::init_tracing(cli.verbose);
    let config = handlers::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Stage { dir } => {
            let store = handlers::store_from_args(cli.data_dir, cli.branch, cli.memory)?;
            handlers::handle_stage(store, &dir, &config)
        }
        Commands::Inspect { file, hex, limit } => handlers::handle_inspect(&file, &config, hex, limit),
        Commands::Preview { file, kind, limit } => {
            handlers::handle_preview(&file, kind.into(), &config, limit)
        }
        Commands::Import { dir, json } => {
            let store = handlers::store_from_args(cli.data_dir, cli.branch, cli.memory)?;
            handlers::handle_import(store, &dir, &config, json)
        }
        Commands::Counts { json } => {
            let store = handlers::store_from_args(cli.data_dir, cli.branch, cli.memory)?;
            handlers::handle_counts(store.as_ref(), json)
        }
    }
}

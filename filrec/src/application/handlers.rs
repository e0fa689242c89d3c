use std::fs;
use std::path::{Path, PathBuf};

use filrec_core::error::{FilError, Result};
use filrec_core::read::inspect::{HEX_DUMP_LEN, HEX_DUMP_WIDTH, hex_dump, inspect, read_prefix};
use filrec_core::repo::{Datastore, StoreParams};
use filrec_core::repo_factory::{Backend, open_store};
use filrec_core::stage::LEGACY_FILES;
use filrec_core::{RecordKind, RecoveryConfig, discover, extract, import_dir, stage_files};
use time::OffsetDateTime;
use tracing::{debug, info_span};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<RecoveryConfig> {
    let Some(path) = path else {
        return Ok(RecoveryConfig::default());
    };
    let raw = fs::read_to_string(path)?;
    let cfg: RecoveryConfig = serde_json::from_str(&raw)
        .map_err(|e| FilError::Config(format!("{}: {e}", path.display())))?;
    cfg.validate()?;
    debug!(path = %path.display(), code_page = %cfg.code_page, "recovery config loaded");
    Ok(cfg)
}

pub fn store_from_args(data_dir: PathBuf, branch: String, memory: bool) -> Result<Box<dyn Datastore>> {
    let backend = if memory { Backend::Memory } else { Backend::Fs };
    open_store(
        backend,
        StoreParams {
            root: data_dir,
            branch,
        },
    )
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).map_err(|e| FilError::Format(e.to_string()))?;
    println!("{s}");
    Ok(())
}

pub fn handle_stage(mut store: Box<dyn Datastore>, dir: &Path, config: &RecoveryConfig) -> Result<()> {
    let paths = discover(dir, &LEGACY_FILES)?;
    if paths.is_empty() {
        eprintln!("no legacy files in {}", dir.display());
        return Ok(());
    }
    let staged = stage_files(store.as_mut(), &paths, config, OffsetDateTime::now_utc());
    store.flush()?;
    for p in &paths {
        println!("{}", p.display());
    }
    println!("staged {staged} of {} file(s) on branch {}", paths.len(), store.branch());
    Ok(())
}

pub fn handle_inspect(file: &Path, config: &RecoveryConfig, hex: bool, limit: usize) -> Result<()> {
    let mut dump = hex;
    match inspect(file, config.code_page, limit) {
        Ok(ins) => {
            let h = &ins.header;
            println!("file type     0x{:02X}", h.file_type);
            match h.last_update {
                Some(d) => println!("last update   {d}"),
                None => println!("last update   (invalid)"),
            }
            println!("records       {}", h.record_count);
            println!("header length {}", h.header_length);
            println!("record length {}", h.record_length);
            println!();
            println!("{:<11} {:<4} {:>6} {:>4} {:>6}", "FIELD", "TYPE", "LEN", "DEC", "OFFSET");
            for fd in &ins.fields {
                println!(
                    "{:<11} {:<4} {:>6} {:>4} {:>6}",
                    fd.name,
                    fd.field_type.tag(),
                    fd.length,
                    fd.decimal_count,
                    fd.offset
                );
            }
            println!();
            for r in &ins.records {
                let cells: Vec<String> = r.values.iter().map(|(k, v)| format!("{k}={v}")).collect();
                println!("#{:<6} {}", r.index, cells.join(" | "));
            }
            if ins.deleted > 0 {
                println!("({} deleted record(s) skipped)", ins.deleted);
            }
        }
        Err(e) if e.is_structural() => {
            eprintln!("not a readable dBase file: {e}");
            dump = true;
        }
        Err(e) => return Err(e),
    }
    if dump {
        println!();
        print!("{}", hex_dump(&read_prefix(file, HEX_DUMP_LEN)?, HEX_DUMP_WIDTH));
    }
    Ok(())
}

pub fn handle_preview(file: &Path, kind: RecordKind, config: &RecoveryConfig, limit: usize) -> Result<()> {
    let _file = info_span!("preview", file = %file.display()).entered();
    let ex = extract(file, kind, config)?;
    println!("{} via {} decoder", file.display(), ex.source());
    let mut shown = 0;
    for rec in ex.take(limit) {
        shown += 1;
        println!("  {rec}");
    }
    if shown == 0 {
        println!("  (no records)");
    }
    Ok(())
}

pub fn handle_import(
    mut store: Box<dyn Datastore>,
    dir: &Path,
    config: &RecoveryConfig,
    json: bool,
) -> Result<()> {
    let summary = import_dir(store.as_mut(), dir, config, OffsetDateTime::now_utc())?;
    if json {
        return print_json(&summary);
    }
    let src = |s: Option<filrec_core::Source>| s.map_or("-".to_string(), |s| s.to_string());
    println!("branch        {}", store.branch());
    println!("staged        {}", summary.staged);
    println!("customers     {} [{}]", summary.customers, src(summary.customers_source));
    println!("transactions  {} [{}]", summary.transactions, src(summary.transactions_source));
    println!("vehicles      {}", summary.vehicles);
    Ok(())
}

pub fn handle_counts(store: &dyn Datastore, json: bool) -> Result<()> {
    let c = store.counts()?;
    if json {
        return print_json(&c);
    }
    println!("branch        {}", store.branch());
    println!("customers     {}", c.customers);
    println!("transactions  {}", c.transactions);
    println!("vehicles      {}", c.vehicles);
    println!("staged files  {}", c.staged_files);
    Ok(())
}

use crate::config::RecoveryConfig;
use crate::domain::NewStagedFile;
use crate::error::Result;
use crate::repo::Datastore;
use crate::text::resolver::resolve;

use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files a legacy branch directory is expected to hold.
pub const LEGACY_FILES: [&str; 7] = [
    "ACCOUNT.FIL",
    "CASH.FIL",
    "CONTROL.FIL",
    "OUTPUT.TXT",
    "F.TXT",
    "FOCU.TXT",
    "CMC.TXT",
];

const TEXT_SNIFF_LEN: usize = 2048;
const PAYLOAD_LEVEL: i32 = 3;

/// Files in `dir` (not below it) whose names match `names` ignoring case,
/// returned in the order of `names`.
pub fn discover(dir: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    let mut found: Vec<(usize, PathBuf)> = Vec::new();
    for e in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let e = e.map_err(std::io::Error::from)?;
        if !e.file_type().is_file() {
            continue;
        }
        let name = e.file_name().to_string_lossy();
        if let Some(rank) = names.iter().position(|n| n.eq_ignore_ascii_case(&name)) {
            found.push((rank, e.into_path()));
        }
    }
    found.sort_by_key(|(rank, _)| *rank);
    debug!(dir = %dir.display(), found = found.len(), "legacy files discovered");
    Ok(found.into_iter().map(|(_, p)| p).collect())
}

/// No NUL in the first 2 KiB and fewer than 10 % control bytes there.
pub fn is_likely_text(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    if head.is_empty() || head.contains(&0) {
        return false;
    }
    let controls = head
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();
    controls * 10 < head.len()
}

pub fn compress_payload(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::stream::encode_all(bytes, PAYLOAD_LEVEL)?)
}

pub fn decompress_payload(payload: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::stream::decode_all(payload)?)
}

/// Capture one file: metadata, digest, compressed payload and, for text,
/// its lines.
pub fn capture(path: &Path, config: &RecoveryConfig) -> Result<NewStagedFile> {
    let bytes = fs::read(path)?;
    let full_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let lines = is_likely_text(&bytes).then(|| {
        let text = match resolve(&bytes, &config.candidates, config.printability) {
            Some(r) => r.text,
            None => config.code_page.decode(&bytes),
        };
        text.lines().map(str::to_string).collect::<Vec<_>>()
    });
    Ok(NewStagedFile {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        full_path: full_path.to_string_lossy().into_owned(),
        size: bytes.len() as u64,
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_uppercase())
            .unwrap_or_default(),
        digest: hex::encode(blake3::hash(&bytes).as_bytes()),
        payload: compress_payload(&bytes)?,
        lines,
    })
}

/// Record every readable file in `paths`; returns how many were staged.
pub fn stage_files(
    store: &mut dyn Datastore,
    paths: &[PathBuf],
    config: &RecoveryConfig,
    now: OffsetDateTime,
) -> usize {
    let mut staged = 0;
    for path in paths {
        let res = capture(path, config).and_then(|f| {
            let (name, size) = (f.file_name.clone(), f.size);
            let id = store.record_staged_file(f, now)?;
            debug!(id, %name, size, "file staged");
            Ok(())
        });
        match res {
            Ok(()) => staged += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "staging failed"),
        }
    }
    info!(branch = store.branch(), staged, of = paths.len(), "legacy files staged");
    staged
}

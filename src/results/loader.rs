use crate::error::{PlotError, Result};
use crate::results::BenchmarkRecord;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Loads every record of a line-delimited JSON results file.
///
/// The first malformed line aborts the load.
pub fn load_records<R, P>(path: P) -> Result<Vec<BenchmarkRecord<R>>>
where
    R: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PlotError::NotFound(path.to_path_buf()),
        _ => PlotError::Io { path: path.to_path_buf(), source },
    })?;

    let records = parse_records(&content)?;
    debug!(path = %path.display(), records = records.len(), "loaded results");
    Ok(records)
}

/// Parses line-delimited records from an in-memory string.
///
/// Whitespace-only lines are skipped, line numbers in errors are 1-based.
pub fn parse_records<R: DeserializeOwned>(content: &str) -> Result<Vec<BenchmarkRecord<R>>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| PlotError::Parse { line: i + 1, source })
        })
        .collect()
}

// src/snapshot.rs

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::WriterBuilder;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Field separator the downstream dashboard expects.
const SEPARATOR: u8 = b';';

/// Write `rows` as a timestamped snapshot plus a `<stem>_latest.csv`
/// alias and return the two paths. Nothing is written for an empty row
/// set.
///
/// Each file is written to a `.tmp` sibling and renamed into place, so a
/// crashed run never leaves a truncated `latest` behind.
pub fn write_pair<T: Serialize>(
    dir: &Path,
    stem: &str,
    rows: &[T],
    now: NaiveDateTime,
) -> Result<Option<(PathBuf, PathBuf)>> {
    if rows.is_empty() {
        warn!(stem, "no rows to write; skipping snapshot");
        return Ok(None);
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create output directory {}", dir.display()))?;

    let stamped = dir.join(format!("{}_{}.csv", stem, now.format("%Y%m%d_%H%M%S")));
    let latest = dir.join(format!("{stem}_latest.csv"));
    write_csv(&stamped, rows)?;
    write_csv(&latest, rows)?;

    info!(rows = rows.len(), path = %stamped.display(), "snapshot written");
    Ok(Some((stamped, latest)))
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    let mut writer = WriterBuilder::new()
        .delimiter(SEPARATOR)
        .from_path(&tmp)
        .with_context(|| format!("could not create `{}`", tmp.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush `{}`", tmp.display()))?;
    drop(writer);

    fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename `{}` to `{}`", tmp.display(), path.display()))?;
    Ok(())
}

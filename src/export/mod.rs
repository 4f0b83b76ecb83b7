use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::instrument;

use crate::constants::{OUTPUT_PREFIX, TIMESTAMP_FORMAT};
use crate::helix::streams::{StreamRecord, StreamsByCategory};

/// Canonical column set, in order. Matches the serialized field order of
/// `StreamRecord`.
pub const HEADER: [&str; 9] = [
    "game_id",
    "id",
    "language",
    "started_at",
    "title",
    "type",
    "user_id",
    "user_name",
    "viewer_count",
];

/// Concatenates every category's streams into one flat frame, preserving
/// category fetch order and intra-category upstream order. No deduplication:
/// a stream listed under two categories appears twice.
pub fn flatten(streams: StreamsByCategory) -> Vec<StreamRecord> {
    streams
        .into_iter()
        .flat_map(|(_, records)| records)
        .collect()
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[instrument(skip(streams), fields(category_count = streams.len()))]
/// Flattens and writes one timestamped CSV under `out_dir`, returning the
/// final path. The file lands via temp-path-then-rename so an interrupted run
/// never leaves a partial artifact behind.
pub fn export(streams: StreamsByCategory, out_dir: &Path) -> ExportResult<PathBuf> {
    let rows = flatten(streams);
    fs::create_dir_all(out_dir)?;

    let path = out_dir.join(format!("{OUTPUT_PREFIX}-{}.csv", timestamp()));
    let tmp = path.with_extension("csv.tmp");

    // the header goes out unconditionally, a zero-row run still produces a
    // well-formed file, so automatic header emission is disabled
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp)?;

    writer.write_record(HEADER)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp, &path)?;

    tracing::info!(row_count = rows.len(), path = %path.display(), "wrote export");
    Ok(path)
}

pub type ExportResult<T> = core::result::Result<T, ExportErr>;

#[derive(Debug, Error)]
pub enum ExportErr {
    #[error("io error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error during export: {0}")]
    Csv(#[from] csv::Error),
}

/// River data file loader.
///
/// The upstream scraper writes a JSON array of snapshots, newest first.
/// The file order is trusted as-is: the first snapshot that carries any
/// station data is treated as the latest one, without looking at its
/// date.

use crate::error::LoadError;
use crate::model::Snapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "river_data.json";

/// Reads and parses every snapshot in the data file.
///
/// # Errors
/// - `LoadError::NotFound` — the file does not exist.
/// - `LoadError::Io` — the file exists but could not be read.
/// - `LoadError::Parse` — the content is not a JSON array of snapshots.
pub fn load_snapshots(path: &Path) -> Result<Vec<Snapshot>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_snapshots(&contents).map_err(|reason| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parses the data file body.
pub fn parse_snapshots(json: &str) -> Result<Vec<Snapshot>, String> {
    serde_json::from_str(json).map_err(|e| format!("JSON deserialization failed: {}", e))
}

/// Returns the first snapshot, in file order, with a non-empty station
/// mapping.
pub fn latest_with_stations(snapshots: &[Snapshot]) -> Option<&Snapshot> {
    snapshots.iter().find(|s| s.has_station_data())
}

/// Loads the data file and picks the snapshot to evaluate.
///
/// # Errors
/// Everything `load_snapshots` returns, plus `LoadError::NoData` when no
/// snapshot has station data.
pub fn load_latest_snapshot(path: &Path) -> Result<Snapshot, LoadError> {
    let snapshots = load_snapshots(path)?;
    tracing::debug!(path = %path.display(), count = snapshots.len(), "loaded snapshots");

    latest_with_stations(&snapshots)
        .cloned()
        .ok_or(LoadError::NoData)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

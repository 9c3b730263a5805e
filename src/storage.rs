//! Flat CSV tables for scraped events and clustered events.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::{ClusteredEvent, ScoringEvent};

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Writes events with the header
/// `game_id,round_num,away,away_rank,home,home_rank,time,away_score,home_score,diff_score,rank_diff`.
pub fn write_events(path: impl AsRef<Path>, events: &[ScoringEvent]) -> Result<()> {
    write_rows(path.as_ref(), events)
}

pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<ScoringEvent>> {
    read_rows(path.as_ref())
}

pub fn write_clustered(path: impl AsRef<Path>, events: &[ClusteredEvent]) -> Result<()> {
    write_rows(path.as_ref(), events)
}

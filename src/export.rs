use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

use crate::analysis::{RepresentativeTrace, SensitivityRecord, VisibilityRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn create(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// One header row from the field names, then one row per item. NaN is written as `NaN`.
fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_visibility_csv(path: &Path, records: &[VisibilityRecord]) -> Result<(), ExportError> {
    write_csv(path, records)
}

pub fn write_sensitivity_csv(path: &Path, rows: &[SensitivityRecord]) -> Result<(), ExportError> {
    write_csv(path, rows)
}

pub fn write_traces_json(path: &Path, traces: &[&RepresentativeTrace]) -> Result<(), ExportError> {
    let writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(writer, traces)?;
    log::info!("Wrote {} traces to {}", traces.len(), path.display());
    Ok(())
}

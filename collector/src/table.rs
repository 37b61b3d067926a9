//! Table Serializer
//!
//! Encodes motion readings as a comma separated table: a fixed header line followed by one
//! row per reading, in input order. Values are rendered with the `Display` form of `f64`,
//! which is locale independent and drops the fractional part of integral values (`1`, not `1.0`).
//!
//! A failed write is not rolled back: the destination may be left truncated.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use common::{MotionReading, TableColumn};

use crate::errors::CollectorError;

/// Writes the table to `writer` and hands the writer back once flushed.
pub fn encode<W: Write>(readings: &[MotionReading], writer: W) -> Result<W, CollectorError> {
    let mut table = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    table
        .write_record(TableColumn::header())
        .map_err(|e| CollectorError::SerializationFailed(e.to_string()))?;

    for reading in readings {
        table
            .write_record(reading.to_row().map(format_value))
            .map_err(|e| CollectorError::SerializationFailed(e.to_string()))?;
    }

    table
        .into_inner()
        .map_err(|e| CollectorError::SerializationFailed(e.error().to_string()))
}

/// Writes the table to `destination`, replacing any previous content.
/// # Errors
/// - DestinationCreationFailed if the file cannot be created or truncated
/// - SerializationFailed if writing fails midway
pub fn serialize(readings: &[MotionReading], destination: &Path) -> Result<(), CollectorError> {
    let file = File::create(destination).map_err(|e| {
        CollectorError::DestinationCreationFailed(format!("{}: {}", destination.display(), e))
    })?;

    let file = encode(readings, file)?;
    file.sync_all()
        .map_err(|e| CollectorError::SerializationFailed(e.to_string()))?;

    log::debug!(
        "Wrote {} rows to '{}'",
        readings.len(),
        destination.display()
    );
    Ok(())
}

/// Reads back a table written by [`serialize`].
/// # Errors
/// - TableRead if the file can't be read, the header differs or a row is not six numbers
pub fn read_table(path: &Path) -> Result<Vec<MotionReading>, CollectorError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| CollectorError::TableRead(format!("{}: {}", path.display(), e)))?;

    let header = reader
        .headers()
        .map_err(|e| CollectorError::TableRead(e.to_string()))?;
    if !header.iter().eq(TableColumn::header()) {
        return Err(CollectorError::TableRead(format!(
            "unexpected table header: {}",
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| CollectorError::TableRead(e.to_string()))?;
            let values = record
                .iter()
                .map(|field| field.trim().parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| CollectorError::TableRead(e.to_string()))?;
            MotionReading::try_from(values).map_err(|e| CollectorError::TableRead(e.to_string()))
        })
        .collect()
}

fn format_value(value: f64) -> String {
    value.to_string()
}

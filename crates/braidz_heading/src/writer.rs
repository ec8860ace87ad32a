//! Output CSV writer

use crate::source::ArchiveSource;
use heading_core::{OutputRow, Result};
use std::path::Path;

pub const OUTPUT_HEADER: [&str; 3] = ["obj_id", "frame", "stim_heading"];

/// `<basename up to the first '.'>.csv`
pub fn output_file_name(source: &ArchiveSource) -> String {
    let name = source.file_name();
    let stem = name.split('.').next().unwrap_or_default();
    format!("{}.csv", stem)
}

/// Write `obj_id,frame,stim_heading` rows in the given order.
///
/// The header is written even when there are no rows.
pub fn write_output(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

//! braidz (zip) container → stimulus table

use heading_core::{HeadingError, Result, StimulusTable};
use std::io::Cursor;

/// Tabular members searched for, in order of preference
pub const STIMULUS_MEMBERS: [&str; 2] = ["stim.csv", "opto.csv"];

/// Extract the stimulus table from an in-memory archive.
///
/// `origin` names the archive in error messages.
pub fn read_stimulus_table(bytes: Vec<u8>, origin: &str) -> Result<StimulusTable> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| HeadingError::unreadable(origin, e))?;

    let member = STIMULUS_MEMBERS
        .iter()
        .copied()
        .find(|name| archive.file_names().any(|n| n == *name))
        .ok_or_else(|| {
            HeadingError::MissingData(format!("No stim or opto data found in {}", origin))
        })?;

    log::debug!("{}: reading {}", origin, member);
    let file = archive
        .by_name(member)
        .map_err(|e| HeadingError::unreadable(format!("{}/{}", origin, member), e))?;
    StimulusTable::from_reader(file, member)
}

//! Calibration table: screen position → heading pairs
//!
//! The built-in table was measured on the 640-unit circular display and is
//! periodic: position 640 maps back onto the heading of position 0.

use crate::error::{HeadingError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Built-in (screen position, heading radians) pairs.
pub const DEFAULT_CALIBRATION: [(f64, f64); 9] = [
    (0.0, 2.3513283485530456),
    (80.0, 1.2179812647799937),
    (160.0, 0.5031545295746856),
    (240.0, -0.3078141744904855),
    (320.0, -0.8746949393526915),
    (400.0, -1.5019022477483523),
    (480.0, -2.185375561680841),
    (560.0, -3.0123437340031307),
    (640.0, 2.3513283485530456),
];

pub const CALIBRATION_SCREEN_COLUMN: &str = "screen";
pub const CALIBRATION_HEADING_COLUMN: &str = "heading";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationEntry {
    pub screen_position: f64,
    /// Heading in radians
    pub heading: f64,
}

impl CalibrationEntry {
    pub fn new(screen_position: f64, heading: f64) -> Self {
        Self {
            screen_position,
            heading,
        }
    }
}

/// Validated calibration table.
///
/// Entries are sorted by ascending screen position, positions are unique
/// and there are at least two of them.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    entries: Vec<CalibrationEntry>,
}

impl CalibrationTable {
    /// The built-in 9-entry table
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_CALIBRATION
                .iter()
                .map(|&(screen, heading)| CalibrationEntry::new(screen, heading))
                .collect(),
        }
    }

    /// Validate and sort a set of entries
    pub fn from_entries(mut entries: Vec<CalibrationEntry>) -> Result<Self> {
        if let Some(bad) = entries
            .iter()
            .find(|e| !e.screen_position.is_finite() || !e.heading.is_finite())
        {
            return Err(HeadingError::Parse(format!(
                "non-finite calibration entry ({}, {})",
                bad.screen_position, bad.heading
            )));
        }

        if entries.len() < 2 {
            return Err(HeadingError::InsufficientCalibration(format!(
                "need at least 2 entries, found {}",
                entries.len()
            )));
        }

        entries.sort_by(|a, b| a.screen_position.total_cmp(&b.screen_position));

        if let Some(pair) = entries
            .windows(2)
            .find(|w| w[0].screen_position == w[1].screen_position)
        {
            return Err(HeadingError::InsufficientCalibration(format!(
                "duplicate screen position {}",
                pair[0].screen_position
            )));
        }

        Ok(Self { entries })
    }

    /// Parse a `screen,heading` CSV table.
    ///
    /// `origin` names the source in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| HeadingError::Parse(format!("{}: {}", origin, e)))?
            .clone();
        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                HeadingError::Parse(format!("{}: missing '{}' column", origin, name))
            })
        };
        let screen_idx = column(CALIBRATION_SCREEN_COLUMN)?;
        let heading_idx = column(CALIBRATION_HEADING_COLUMN)?;

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| HeadingError::Parse(format!("{}: {}", origin, e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |idx: usize, name: &str| -> Result<f64> {
                let raw = record.get(idx).unwrap_or("");
                raw.parse::<f64>().map_err(|_| {
                    HeadingError::Parse(format!(
                        "{}: line {} - invalid {} value '{}'",
                        origin, line, name, raw
                    ))
                })
            };
            entries.push(CalibrationEntry::new(
                field(screen_idx, CALIBRATION_SCREEN_COLUMN)?,
                field(heading_idx, CALIBRATION_HEADING_COLUMN)?,
            ));
        }

        log::debug!("Loaded {} calibration entries from {}", entries.len(), origin);
        Self::from_entries(entries)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| HeadingError::unreadable(path.display().to_string(), e))?;
        Self::from_reader(file, &path.display().to_string())
    }

    pub fn entries(&self) -> &[CalibrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

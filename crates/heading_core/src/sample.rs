//! Stimulus rows and the per-table source-column policy

use crate::error::{HeadingError, Result};
use crate::interpolator::HeadingFunction;
use serde::Serialize;
use std::io::Read;

pub const OBJ_ID_COLUMN: &str = "obj_id";
pub const FRAME_COLUMN: &str = "frame";
pub const SCREEN_POSITION_COLUMN: &str = "stim_position_screen";
pub const HEADING_COLUMN: &str = "heading";

/// Which column of a stimulus table carries the sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleColumn {
    /// `stim_position_screen`, raw screen units
    ScreenPosition,
    /// `heading`, already in radians
    DirectHeading,
}

impl SampleColumn {
    /// Pick the sample column from a table header.
    ///
    /// `stim_position_screen` takes precedence when both are present.
    pub fn resolve<'a, I>(headers: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = None;
        for header in headers {
            match header {
                SCREEN_POSITION_COLUMN => return Some(SampleColumn::ScreenPosition),
                HEADING_COLUMN => found = Some(SampleColumn::DirectHeading),
                _ => {}
            }
        }
        found
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleColumn::ScreenPosition => SCREEN_POSITION_COLUMN,
            SampleColumn::DirectHeading => HEADING_COLUMN,
        }
    }

    fn sample(self, value: f64) -> RawSample {
        match self {
            SampleColumn::ScreenPosition => RawSample::ScreenPosition(value),
            SampleColumn::DirectHeading => RawSample::DirectHeading(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSample {
    ScreenPosition(f64),
    DirectHeading(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StimulusRow {
    pub object_id: u32,
    pub frame: u64,
    pub sample: RawSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputRow {
    pub obj_id: u32,
    pub frame: u64,
    pub stim_heading: f64,
}

/// Final heading for one sample.
///
/// Screen positions go through the interpolator, direct headings pass
/// through untouched.
pub fn resolve_heading(heading: &HeadingFunction, sample: RawSample) -> f64 {
    match sample {
        RawSample::ScreenPosition(position) => heading.evaluate(position),
        RawSample::DirectHeading(value) => value,
    }
}

/// A parsed `stim.csv` / `opto.csv` table, rows in file order
#[derive(Debug, Clone)]
pub struct StimulusTable {
    pub name: String,
    pub column: SampleColumn,
    pub rows: Vec<StimulusRow>,
}

impl StimulusTable {
    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let index_of = |column: &str| headers.iter().position(|h| h == column);
        let obj_idx = index_of(OBJ_ID_COLUMN).ok_or_else(|| {
            HeadingError::MissingData(format!("{} has no '{}' column", name, OBJ_ID_COLUMN))
        })?;
        let frame_idx = index_of(FRAME_COLUMN).ok_or_else(|| {
            HeadingError::MissingData(format!("{} has no '{}' column", name, FRAME_COLUMN))
        })?;
        let (column, sample_idx) = SampleColumn::resolve(headers.iter())
            .and_then(|column| index_of(column.name()).map(|idx| (column, idx)))
            .ok_or_else(|| HeadingError::MalformedRow {
                line: 1,
                reason: format!(
                    "{} has neither '{}' nor '{}'",
                    name, SCREEN_POSITION_COLUMN, HEADING_COLUMN
                ),
            })?;

        // The other sample column, if the table has both
        let fallback = match column {
            SampleColumn::ScreenPosition => index_of(HEADING_COLUMN)
                .map(|idx| (SampleColumn::DirectHeading, idx)),
            SampleColumn::DirectHeading => None,
        };

        log::debug!("{}: using '{}' column", name, column.name());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |idx: usize, label: &str| {
                let raw = record.get(idx).unwrap_or("");
                if raw.is_empty() {
                    Err(HeadingError::MalformedRow {
                        line,
                        reason: format!("empty {}", label),
                    })
                } else {
                    Ok(raw)
                }
            };
            let invalid = |label: &str, raw: &str| HeadingError::MalformedRow {
                line,
                reason: format!("invalid {} value '{}'", label, raw),
            };

            let raw_obj = field(obj_idx, OBJ_ID_COLUMN)?;
            let object_id = raw_obj
                .parse::<u32>()
                .map_err(|_| invalid(OBJ_ID_COLUMN, raw_obj))?;
            let raw_frame = field(frame_idx, FRAME_COLUMN)?;
            let frame = raw_frame
                .parse::<u64>()
                .map_err(|_| invalid(FRAME_COLUMN, raw_frame))?;

            // Blank cell: try the other column for this row, else NaN
            let cell = |idx: usize| record.get(idx).filter(|raw| !raw.is_empty());
            let (sample_column, raw_sample) = match cell(sample_idx) {
                Some(raw) => (column, Some(raw)),
                None => match fallback.and_then(|(c, idx)| cell(idx).map(|raw| (c, raw))) {
                    Some((c, raw)) => (c, Some(raw)),
                    None => (column, None),
                },
            };
            let value = match raw_sample {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|_| invalid(sample_column.name(), raw))?,
                None => {
                    log::debug!("{}: line {} has no sample value", name, line);
                    f64::NAN
                }
            };

            rows.push(StimulusRow {
                object_id,
                frame,
                sample: sample_column.sample(value),
            });
        }

        Ok(Self {
            name: name.to_string(),
            column,
            rows,
        })
    }

    pub fn to_output_rows(&self, heading: &HeadingFunction) -> Vec<OutputRow> {
        self.rows
            .iter()
            .map(|row| OutputRow {
                obj_id: row.object_id,
                frame: row.frame,
                stim_heading: resolve_heading(heading, row.sample),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

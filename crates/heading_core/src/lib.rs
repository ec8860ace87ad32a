//! # heading_core - Stimulus Heading Interpolation
//!
//! Maps raw stimulus screen positions onto heading angles using a sparse
//! calibration table.
//!
//! ## Features
//! - Built-in 640-unit periodic calibration, or a user `screen,heading` CSV
//! - Wraparound-safe interpolation via unit-circle projection
//! - Per-table selection between screen-position and direct-heading samples

pub mod calibration;
pub mod error;
pub mod interpolator;
pub mod sample;

pub use calibration::{CalibrationEntry, CalibrationTable, DEFAULT_CALIBRATION};
pub use error::{HeadingError, Result};
pub use interpolator::{wrap_angle, HeadingFunction, LinearInterpolant};
pub use sample::{
    resolve_heading, OutputRow, RawSample, SampleColumn, StimulusRow, StimulusTable,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadingError {
    #[error("Cannot read {name}: {reason}")]
    SourceUnreadable { name: String, reason: String },

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Insufficient calibration: {0}")]
    InsufficientCalibration(String),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Output {0} already written by an earlier archive in this batch")]
    DuplicateOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl HeadingError {
    pub fn unreadable(name: impl Into<String>, reason: impl ToString) -> Self {
        HeadingError::SourceUnreadable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable snake_case name used in batch reports
    pub fn kind(&self) -> &'static str {
        match self {
            HeadingError::SourceUnreadable { .. } => "source_unreadable",
            HeadingError::MissingData(_) => "missing_data",
            HeadingError::InsufficientCalibration(_) => "insufficient_calibration",
            HeadingError::MalformedRow { .. } => "malformed_row",
            HeadingError::Parse(_) => "parse",
            HeadingError::DuplicateOutput(_) => "duplicate_output",
            HeadingError::Io(_) => "io",
            HeadingError::Csv(_) => "csv",
        }
    }
}

pub type Result<T> = std::result::Result<T, HeadingError>;

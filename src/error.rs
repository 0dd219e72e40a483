use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// NameFault – which filename rule was violated
// ---------------------------------------------------------------------------

/// The specific rule a run filename broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NameFault {
    #[error("no `naca` token, airfoil unknown")]
    MissingAirfoil,
    #[error("no `i` angle token, angle unknown")]
    MissingAngle,
    #[error("keyword `{0}` is the last token and has no value")]
    DanglingKeyword(String),
    #[error("angle `{0}` is not a number")]
    InvalidAngle(String),
    #[error("angle `{0}` is not finite")]
    NonFiniteAngle(String),
    #[error("{0} is given more than once")]
    RepeatedField(&'static str),
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    /// The filename does not yield a complete `(airfoil, angle)` identity.
    #[error("malformed run name `{file}`: {fault}")]
    MalformedName { file: String, fault: NameFault },

    /// The run table lacks a required column.
    #[error("`{file}` is missing required column `{column}` (found: {found})")]
    MissingColumn {
        file: String,
        column: &'static str,
        found: String,
    },

    /// A table cell could not be read as a number.
    #[error("`{file}` row {row}: invalid {column} value `{value}`")]
    InvalidValue {
        file: String,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("run `{run}` has no samples")]
    EmptySeries { run: String },

    /// Two files map to the same `(reynolds, airfoil, angle)` key.
    #[error(
        "duplicate run {airfoil} at {angle_deg} deg (Re {reynolds}): `{file}` collides with `{existing}`"
    )]
    DuplicateRun {
        reynolds: f64,
        airfoil: String,
        angle_deg: f64,
        file: String,
        existing: String,
    },

    #[error("no run found for {what}")]
    NotFound { what: String },

    #[error("unsupported run file `{file}`: {reason}")]
    UnsupportedFormat { file: String, reason: String },

    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited run table that the csv reader cannot parse.
    #[error("`{file}` is not a readable table: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("`{file}` is not valid JSON: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{file}` is not a readable Parquet file: {source}")]
    Parquet {
        file: String,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("`{file}`: invalid Arrow batch: {source}")]
    Arrow {
        file: String,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("writing summary CSV failed: {0}")]
    Export(#[from] csv::Error),

    #[error("rendering `{}` failed: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(file: &str, fault: NameFault) -> Self {
        Error::MalformedName {
            file: file.to_string(),
            fault,
        }
    }
}

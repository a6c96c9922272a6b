//! Error types for map loading and tuning

use std::fmt;

/// Failure to retrieve or parse a map definition
#[derive(Debug)]
pub enum LoadError {
    /// Requested index is outside the map pool
    UnknownMap { index: usize, pool: usize },
    /// Definition could not be read from its source
    Io { index: usize, source: std::io::Error },
    /// Definition is not valid JSON for a map
    Parse { index: usize, source: serde_json::Error },
    /// Grid does not have the expected width x height
    Shape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A cell holds a code other than 0..=3
    InvalidTile { x: usize, y: usize, code: u8 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMap { index, pool } => {
                write!(f, "map {index} is outside the pool (0..{pool})")
            }
            Self::Io { index, source } => write!(f, "failed to read map {index}: {source}"),
            Self::Parse { index, source } => write!(f, "failed to parse map {index}: {source}"),
            Self::Shape { expected, found } => write!(
                f,
                "map grid is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::InvalidTile { x, y, code } => {
                write!(f, "invalid tile code {code} at ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Rejected tuning values
#[derive(Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    Io(std::io::Error),
    /// Tuning file is not valid JSON
    Parse(serde_json::Error),
    /// A value is outside its allowed range
    OutOfRange { field: &'static str, value: f64 },
    /// Enemy fire interval has min > max
    InvertedInterval { min: f64, max: f64 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read tuning: {e}"),
            Self::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            Self::OutOfRange { field, value } => write!(f, "tuning {field} out of range: {value}"),
            Self::InvertedInterval { min, max } => {
                write!(f, "enemy fire interval inverted: min={min}, max={max}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

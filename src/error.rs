// src/error.rs

use std::fmt;
use std::io;

use thiserror::Error;

/// Where in the input a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line number.
    Line(usize),
    /// 0-based token position in a token stream, with the 1-based line it sits on.
    Token { index: usize, line: usize },
    /// The input ended before the record was complete.
    EndOfInput,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {}", line),
            Location::Token { index, line } => write!(f, "token {} (line {})", index, line),
            Location::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Features some formats allow that this crate refuses to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    /// Abaqus *NGEN / *ELGEN and friends: nodes or elements generated procedurally.
    IncrementalGeneration,
    /// Abaqus *INCLUDE pulls in other files.
    Include,
    /// Binary payloads (Gmsh file-type 1).
    BinaryEncoding,
    /// A file format revision outside the supported range.
    FormatVersion(String),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::IncrementalGeneration => write!(f, "incremental node/element generation"),
            Feature::Include => write!(f, "included input files"),
            Feature::BinaryEncoding => write!(f, "binary encoding"),
            Feature::FormatVersion(version) => write!(f, "format version {}", version),
        }
    }
}

/// Every way an import can fail. All of them abort the parse; no partial mesh is returned.
#[derive(Debug, Error)]
pub enum MeshImportError {
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported element type: {0}")]
    UnsupportedElementType(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(Feature),

    #[error("malformed record at {location}: {detail}")]
    MalformedRecord { location: Location, detail: String },

    #[error("truncated {section}: expected {expected} records, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid spatial dimension {0}, expected 1, 2 or 3")]
    InvalidDimension(usize),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl MeshImportError {
    pub(crate) fn malformed(location: Location, detail: impl Into<String>) -> Self {
        MeshImportError::MalformedRecord {
            location,
            detail: detail.into(),
        }
    }
}

/// Parse an integer field, reporting the failing field in the error.
pub(crate) fn parse_int<T: std::str::FromStr>(
    field: &str,
    what: &str,
    location: Location,
) -> Result<T, MeshImportError> {
    field.parse::<T>().map_err(|_| {
        MeshImportError::malformed(location, format!("invalid {} '{}'", what, field))
    })
}

/// Parse a floating-point field. Fortran-style `D` exponents are accepted.
pub(crate) fn parse_float(field: &str, location: Location) -> Result<f64, MeshImportError> {
    let parsed = match field.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => field.replace(['D', 'd'], "E").parse::<f64>(),
    };
    parsed.map_err(|_| MeshImportError::malformed(location, format!("invalid coordinate '{}'", field)))
}

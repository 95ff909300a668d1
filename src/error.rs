//! Error types for trueno-multivar operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, summarizing, or plotting data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    Config {
        /// Line of the offending entry (0 when unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Dataset identifier is not registered.
    #[error("Unknown dataset '{name}' (available: {available})")]
    UnknownDataset {
        /// Requested identifier.
        name: String,
        /// Comma-separated list of registered datasets.
        available: String,
    },

    /// Column referenced by an aesthetic, grouping, or facet does not exist.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A categorical value is not one of the column's declared levels.
    #[error("Level '{level}' is not a level of column '{column}'")]
    UnknownLevel {
        /// Column name.
        column: String,
        /// Offending value.
        level: String,
    },

    /// Column exists but has the wrong kind for the requested use.
    #[error("Column '{column}' is {found}, expected {expected}")]
    ColumnType {
        /// Column name.
        column: String,
        /// Kind the operation needs.
        expected: &'static str,
        /// Kind the column has.
        found: &'static str,
    },

    /// A new column does not match the frame's row count.
    #[error("Data length mismatch: frame has {expected} rows, column has {found}")]
    DataLengthMismatch {
        /// Rows in the frame.
        expected: usize,
        /// Rows in the offending column.
        found: usize,
    },

    /// Invalid dimensions for framebuffer or plot.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., limits with min equal to max).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A discrete palette cannot cover the requested levels.
    #[error("Palette error: {0}")]
    Palette(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

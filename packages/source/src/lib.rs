#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset profiles and school record normalization.
//!
//! Each known deployment schema (DepEd status export, DICT masterlist) is
//! described by a [`profile::DatasetProfile`] loaded from embedded TOML.
//! Profiles map heterogeneous spreadsheet columns onto the canonical
//! [`school_map_source_models::School`] record and select the connectivity
//! classification scheme.

pub mod classify;
pub mod parsing;
pub mod profile;
pub mod readers;
pub mod registry;

/// Errors that can occur while reading a spreadsheet file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file extension is not one of the supported formats.
    #[error("unsupported file extension {extension:?}: expected .csv, .xlsx, or .xls")]
    UnsupportedExtension {
        /// The rejected extension (lowercased, without the dot).
        extension: String,
    },

    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Excel workbook parsing failed.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook contains no readable sheet.
    #[error("workbook has no readable sheet")]
    NoSheets,
}

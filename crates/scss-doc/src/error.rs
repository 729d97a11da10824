//! Error types for SCSS documentation extraction.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use thiserror::Error;

/// The syntax analyzer could not build a tree from its input.
///
/// Positions are 1-based and count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Build an error for a byte offset into `source`.
    pub fn at_offset(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors that can occur while extracting documentation
#[derive(Debug, Error)]
pub enum SassDocError {
    /// The stylesheet could not be analyzed.
    ///
    /// `SassParser::parse` recovers from this locally; it only surfaces from
    /// `SassParser::analyze`.
    #[error("SCSS syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    /// A doc-comment's tags could not be decoded
    #[error("Invalid documentation comment: {message}")]
    Classification { message: String },

    /// File I/O error
    #[error("Failed to read SCSS file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file parser glob could not be compiled
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// The directory handed to the file parser does not exist
    #[error("SCSS root directory not found: {}", .path.display())]
    MissingRoot { path: PathBuf },
}

impl SassDocError {
    pub(crate) fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
        }
    }
}

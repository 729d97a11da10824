//! Documentation extraction for SCSS stylesheets.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - A statement-level SCSS analyzer (ScssAnalyzer)
//! - A tag-based doc-comment classifier (DocBlockParser)
//! - The extractor pairing doc-comments with variables, classes, mixins and
//!   functions (SassParser)
//! - Directory scanning on top of the extractor (SassFileParser)

mod analyzer;
mod docblock;
mod error;
mod extractor;
mod file_parser;
mod model;
pub mod syntax;

pub use analyzer::{MAX_NESTING_DEPTH, ScssAnalyzer, SyntaxAnalyzer};
pub use docblock::{DocBlockParser, DocCommentClassifier};
pub use error::{SassDocError, SyntaxError};
pub use extractor::{ParseOptions, SassParser};
pub use file_parser::{DEFAULT_GLOBS, FileParserOptions, ParsedFile, SassFileParser};
pub use model::{
    CSS, DocBlock, DocumentationCallable, DocumentationClass, DocumentationDraft,
    DocumentationEntity, DocumentationParameter, DocumentationReturn, DocumentationVariable,
    STYLESHEET_SOURCE, Visibility,
};

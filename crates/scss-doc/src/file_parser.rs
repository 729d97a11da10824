//! Documentation extraction for SCSS files on disk.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::SassDocError;
use crate::extractor::{ParseOptions, SassParser};
use crate::model::{CSS, DocumentationEntity, STYLESHEET_SOURCE};

/// Globs used when none are configured, relative to the scanned root.
pub const DEFAULT_GLOBS: &[&str] = &["/*.scss", "/sass/*.scss"];

/// Configuration for [`SassFileParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParserOptions {
    /// Patterns matched against `/`-separated paths relative to the root.
    /// A leading `/` anchors nothing extra and is ignored.
    pub globs: Vec<String>,
    pub content_type: String,
    pub content_kind: String,
}

impl Default for FileParserOptions {
    fn default() -> Self {
        Self {
            globs: DEFAULT_GLOBS.iter().map(|g| g.to_string()).collect(),
            content_type: STYLESHEET_SOURCE.to_string(),
            content_kind: CSS.to_string(),
        }
    }
}

/// Documentation extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Relative to the scanned root for `parse_directory`, as given for `parse_file`
    pub path: PathBuf,
    pub content_type: String,
    pub content_kind: String,
    pub documentation: Vec<DocumentationEntity>,
}

/// Finds SCSS files below a root and extracts their documentation.
#[derive(Debug, Clone, Default)]
pub struct SassFileParser {
    parser: SassParser,
    options: FileParserOptions,
}

impl SassFileParser {
    pub fn new(options: FileParserOptions) -> Self {
        Self {
            parser: SassParser::new(),
            options,
        }
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            content_type: self.options.content_type.clone(),
            content_kind: self.options.content_kind.clone(),
        }
    }

    /// Read and parse a single file.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile, SassDocError> {
        let bytes = std::fs::read(path).map_err(|source| SassDocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let documentation = self.parser.parse(&content, &self.parse_options())?;
        debug!(path = %path.display(), count = documentation.len(), "Parsed SCSS file");

        Ok(ParsedFile {
            path: path.to_path_buf(),
            content_type: self.options.content_type.clone(),
            content_kind: self.options.content_kind.clone(),
            documentation,
        })
    }

    /// Parse every file below `root` matching the configured globs.
    ///
    /// Files are returned in sorted path order. A file that cannot be read,
    /// or whose doc-comments cannot be decoded, is logged and left out.
    pub fn parse_directory(&self, root: &Path) -> Result<Vec<ParsedFile>, SassDocError> {
        let files = self.find_files(root)?;
        debug!(root = %root.display(), count = files.len(), "Found SCSS files");

        let parsed = files
            .par_iter()
            .map(|relative| match self.parse_file(&root.join(relative)) {
                Ok(file) => Ok(Some(ParsedFile {
                    path: relative.clone(),
                    ..file
                })),
                Err(error @ (SassDocError::Classification { .. } | SassDocError::Io { .. })) => {
                    warn!(path = %relative.display(), %error, "Skipping SCSS file");
                    Ok(None)
                }
                Err(error) => Err(error),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parsed.into_iter().flatten().collect())
    }

    /// Relative paths of the files below `root` matching the configured globs.
    pub fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>, SassDocError> {
        if !root.is_dir() {
            return Err(SassDocError::MissingRoot {
                path: root.to_path_buf(),
            });
        }

        let patterns = compile_globs(&self.options.globs)?;
        let match_options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_ignored(e));

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let candidate = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if patterns
                .iter()
                .any(|p| p.matches_with(&candidate, match_options))
            {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

fn compile_globs(globs: &[String]) -> Result<Vec<Pattern>, SassDocError> {
    globs
        .iter()
        .map(|glob| {
            Pattern::new(glob.trim_start_matches('/')).map_err(|e| SassDocError::InvalidGlob {
                pattern: glob.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

/// Check if a directory entry should be skipped during traversal.
fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    // Never filter the root directory
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name.starts_with('.') || name == "node_modules")
}

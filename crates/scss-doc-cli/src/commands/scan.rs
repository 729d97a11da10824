//! Scan command - documentation for every matching file below a directory

use std::path::PathBuf;

use anyhow::{Context, Result};
use scss_doc::{FileParserOptions, SassFileParser};
use tracing::info;

/// Arguments for the scan command.
pub struct ScanArgs {
    pub dir: PathBuf,
    /// Empty means the default globs
    pub globs: Vec<String>,
    pub content_type: String,
    pub content_kind: String,
}

/// Execute the scan command, returning the parsed files as pretty JSON.
pub fn execute(args: ScanArgs) -> Result<String> {
    let mut options = FileParserOptions {
        content_type: args.content_type,
        content_kind: args.content_kind,
        ..Default::default()
    };
    if !args.globs.is_empty() {
        options.globs = args.globs;
    }

    let files = SassFileParser::new(options)
        .parse_directory(&args.dir)
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;
    info!(
        dir = %args.dir.display(),
        files = files.len(),
        entities = files.iter().map(|f| f.documentation.len()).sum::<usize>(),
        "Scanned SCSS files"
    );

    Ok(serde_json::to_string_pretty(&files)?)
}

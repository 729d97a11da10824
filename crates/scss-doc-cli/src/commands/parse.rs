//! Parse command - documentation for a single file

use std::path::PathBuf;

use anyhow::{Context, Result};
use scss_doc::{ParseOptions, SassParser};
use tracing::info;

/// Arguments for the parse command.
pub struct ParseArgs {
    pub file: PathBuf,
    pub content_type: String,
    pub content_kind: String,
    pub strict: bool,
}

/// Execute the parse command, returning the entity list as pretty JSON.
pub fn execute(args: ParseArgs) -> Result<String> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let parser = SassParser::new();
    if args.strict {
        parser
            .analyze(&content)
            .with_context(|| format!("Failed to analyze {}", args.file.display()))?;
    }

    let options = ParseOptions {
        content_type: args.content_type,
        content_kind: args.content_kind,
    };
    let documentation = parser
        .parse(&content, &options)
        .with_context(|| format!("Failed to extract documentation from {}", args.file.display()))?;
    info!(file = %args.file.display(), count = documentation.len(), "Extracted documentation");

    Ok(serde_json::to_string_pretty(&documentation)?)
}

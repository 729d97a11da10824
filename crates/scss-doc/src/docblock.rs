//! Doc-comment classification.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A doc-comment is a `/** ... */` block. Its body is free-text description
//! followed by tags, one per line:
//!
//! ```text
//! /**
//!  * Keeps an element at a fixed aspect ratio.
//!  *
//!  * @mixin
//!  * @group layout
//!  * @param {Number} $width - Ratio width
//!  * @param {Number} $height - Ratio height
//!  * @example
//!  *   @include maintain-aspect-ratio(16, 9);
//!  */
//! ```
//!
//! The kind of construct a comment documents is decided by its tags:
//! `@mixin`, `@function` and `@callable` mark a callable, `@class` a class and
//! `@type`, `@var` and `@variable` a variable. Without any of those,
//! `@param` or `@return` still imply a callable. Anything else is
//! `Unrecognized`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SassDocError;
use crate::model::{
    DocBlock, DocumentationCallable, DocumentationClass, DocumentationDraft,
    DocumentationParameter, DocumentationReturn, DocumentationVariable, Visibility,
};

/// A tag at the start of a cleaned comment line. Captures the tag name in
/// group 1 and the rest of the line in group 2.
static TAG_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([A-Za-z][\w-]*)\s*(.*)$").unwrap());

/// Turns one raw comment into a typed documentation draft.
///
/// `content_type` is the hint given by the caller; implementations may use
/// it to tag drafts.
pub trait DocCommentClassifier: Send + Sync {
    fn classify(
        &self,
        comment: &str,
        content_type: &str,
    ) -> Result<DocumentationDraft, SassDocError>;
}

/// Tag-based doc-comment classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlockParser;

impl DocBlockParser {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Variable,
    Class,
    Callable,
}

fn kind_of_tag(name: &str) -> Option<Kind> {
    match name {
        "mixin" | "function" | "callable" => Some(Kind::Callable),
        "class" => Some(Kind::Class),
        "type" | "var" | "variable" => Some(Kind::Variable),
        _ => None,
    }
}

/// Tags that end an `@example` body. Any other `@` line inside an example is
/// example text, such as `@include`.
const METADATA_TAGS: &[&str] = &[
    "param",
    "return",
    "returns",
    "group",
    "namespace",
    "example",
    "see",
    "deprecated",
    "internal",
    "private",
    "protected",
    "public",
];

fn is_known_tag(name: &str) -> bool {
    kind_of_tag(name).is_some() || METADATA_TAGS.contains(&name)
}

struct Tag<'a> {
    name: &'a str,
    /// Text after the tag name, then continuation lines
    lines: Vec<&'a str>,
}

impl Tag<'_> {
    /// All lines joined with single spaces.
    fn inline_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lines joined verbatim, dedented, without leading or trailing blank lines.
    fn block_text(&self) -> String {
        let lines = dedent(self.lines.clone());
        let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
        let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
        lines[start..end].join("\n")
    }
}

impl DocCommentClassifier for DocBlockParser {
    fn classify(
        &self,
        comment: &str,
        content_type: &str,
    ) -> Result<DocumentationDraft, SassDocError> {
        let Some(body) = comment
            .trim()
            .strip_prefix("/**")
            .and_then(|rest| rest.strip_suffix("*/"))
        else {
            return Ok(DocumentationDraft::Unrecognized);
        };

        let (description, tags) = split_sections(body);

        let mut kind: Option<(Kind, &str)> = None;
        for tag in &tags {
            if let Some(tag_kind) = kind_of_tag(tag.name) {
                match kind {
                    None => kind = Some((tag_kind, tag.name)),
                    Some((previous, previous_name)) if previous != tag_kind => {
                        return Err(SassDocError::classification(format!(
                            "conflicting documentation kinds @{} and @{}",
                            previous_name, tag.name
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        let kind = match kind {
            Some((kind, _)) => Some(kind),
            None if tags
                .iter()
                .any(|t| matches!(t.name, "param" | "return" | "returns")) =>
            {
                Some(Kind::Callable)
            }
            None => None,
        };

        let mut doc = DocBlock {
            description,
            ..Default::default()
        };
        let mut types: Vec<String> = Vec::new();
        let mut parameters: Vec<DocumentationParameter> = Vec::new();
        let mut returns: Option<DocumentationReturn> = None;

        for tag in &tags {
            match tag.name {
                "param" => parameters.push(parse_param(&tag.inline_text())?),
                "return" | "returns" => returns = Some(parse_return(tag.name, &tag.inline_text())?),
                "type" | "var" | "variable" => {
                    let (tag_types, _) = split_types(tag.name, &tag.inline_text())?;
                    types.extend(tag_types);
                }
                "group" => doc.group = Some(tag.inline_text()),
                "namespace" => doc.namespace = Some(tag.inline_text()),
                "example" => doc.examples.push(tag.block_text()),
                "see" => doc.see.push(tag.inline_text()),
                "deprecated" => doc.deprecated = Some(tag.inline_text()),
                "internal" | "private" => doc.visibility = Visibility::Private,
                "protected" => doc.visibility = Visibility::Protected,
                "public" => doc.visibility = Visibility::Public,
                _ => {}
            }
        }

        let content_type = content_type.to_string();
        Ok(match kind {
            None => DocumentationDraft::Unrecognized,
            Some(Kind::Variable) => DocumentationDraft::Variable(DocumentationVariable {
                types,
                doc,
                content_type,
                ..Default::default()
            }),
            Some(Kind::Class) => DocumentationDraft::Class(DocumentationClass {
                doc,
                content_type,
                ..Default::default()
            }),
            Some(Kind::Callable) => DocumentationDraft::Callable(DocumentationCallable {
                parameters,
                returns,
                doc,
                content_type,
                ..Default::default()
            }),
        })
    }
}

/// Split a comment body into its description and tags.
fn split_sections(body: &str) -> (String, Vec<Tag<'_>>) {
    let mut raw = body.lines().map(|line| {
        let line = line.trim_start();
        line.strip_prefix('*').unwrap_or(line)
    });
    // The line sharing `/**` has no meaningful indentation
    let first = raw.next().map_or("", str::trim);
    let lines = std::iter::once(first).chain(dedent(raw.collect()));

    let mut description: Vec<&str> = Vec::new();
    let mut tags: Vec<Tag<'_>> = Vec::new();
    for line in lines {
        let in_example = tags.last().is_some_and(|tag| tag.name == "example");
        let new_tag = TAG_LINE
            .captures(line)
            .filter(|captures| !in_example || is_known_tag(&captures[1]));
        if let Some(captures) = new_tag {
            tags.push(Tag {
                name: captures.get(1).map_or("", |m| m.as_str()),
                lines: vec![captures.get(2).map_or("", |m| m.as_str())],
            });
        } else if let Some(tag) = tags.last_mut() {
            tag.lines.push(line);
        } else {
            description.push(line);
        }
    }

    (description.join("\n").trim().to_string(), tags)
}

/// Strip the indentation common to all non-blank lines, and trailing whitespace.
fn dedent(lines: Vec<&str>) -> Vec<&str> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line[indent..].trim_end()
            }
        })
        .collect()
}

/// Split a leading `{A|B}` type expression off `text`.
fn split_types<'a>(tag: &str, text: &'a str) -> Result<(Vec<String>, &'a str), SassDocError> {
    let Some(rest) = text.strip_prefix('{') else {
        return Ok((Vec::new(), text));
    };
    let Some(close) = rest.find('}') else {
        return Err(SassDocError::classification(format!(
            "unterminated type expression in @{tag}"
        )));
    };
    let types = rest[..close]
        .split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    Ok((types, rest[close + 1..].trim_start()))
}

fn strip_dash(description: &str) -> String {
    let description = description.trim();
    description
        .strip_prefix("- ")
        .unwrap_or(description)
        .trim()
        .to_string()
}

/// `@param {Type} $name - description`, also `[$name=default]` and `$name...`.
fn parse_param(text: &str) -> Result<DocumentationParameter, SassDocError> {
    let (types, rest) = split_types("param", text)?;
    let (token, description) = match rest.split_once(char::is_whitespace) {
        Some((token, description)) => (token, description),
        None => (rest, ""),
    };

    let (token, default_value) = match token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
    {
        Some(inner) => match inner.split_once('=') {
            Some((name, default)) => (name, Some(default.trim().to_string())),
            None => (inner, None),
        },
        None => (token, None),
    };
    let (token, variadic) = match token.strip_suffix("...") {
        Some(token) => (token, true),
        None => (token, false),
    };

    let bare = token.strip_prefix('$').unwrap_or(token);
    if bare.is_empty() {
        return Err(SassDocError::classification(
            "@param tag is missing a parameter name",
        ));
    }

    Ok(DocumentationParameter {
        name: format!("${bare}"),
        types,
        description: strip_dash(description),
        default_value,
        variadic,
    })
}

fn parse_return(tag: &str, text: &str) -> Result<DocumentationReturn, SassDocError> {
    let (types, rest) = split_types(tag, text)?;
    Ok(DocumentationReturn {
        types,
        description: strip_dash(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(comment: &str) -> DocumentationDraft {
        DocBlockParser::new()
            .classify(comment, "stylesheet-source")
            .unwrap()
    }

    #[test]
    fn test_plain_comment_is_unrecognized() {
        assert_eq!(classify("/* @type {Number} */"), DocumentationDraft::Unrecognized);
        assert_eq!(classify("// @type {Number}"), DocumentationDraft::Unrecognized);
    }

    #[test]
    fn test_doc_comment_without_kind_is_unrecognized() {
        assert_eq!(
            classify("/** Just some words */"),
            DocumentationDraft::Unrecognized
        );
        assert_eq!(classify("/*****/"), DocumentationDraft::Unrecognized);
    }

    #[test]
    fn test_single_line_variable() {
        let DocumentationDraft::Variable(variable) = classify("/** @type {Number} */") else {
            panic!("expected variable draft");
        };
        assert_eq!(variable.types, ["Number"]);
        assert!(variable.name.is_empty());
        assert_eq!(variable.content_type, "stylesheet-source");
    }

    #[test]
    fn test_multi_line_description_and_metadata() {
        let comment = r#"/**
         * Primary brand color.
         *
         * Used for links and buttons.
         *
         * @type {Color|String}
         * @group colors
         * @namespace brand
         * @see $secondary
         * @deprecated Use $accent instead
         * @internal
         */"#;
        let DocumentationDraft::Variable(variable) = classify(comment) else {
            panic!("expected variable draft");
        };
        assert_eq!(variable.types, ["Color", "String"]);
        assert_eq!(
            variable.doc,
            DocBlock {
                description: "Primary brand color.\n\nUsed for links and buttons.".to_string(),
                group: Some("colors".to_string()),
                namespace: Some("brand".to_string()),
                examples: Vec::new(),
                see: vec!["$secondary".to_string()],
                deprecated: Some("Use $accent instead".to_string()),
                visibility: Visibility::Private,
            }
        );
    }

    #[test]
    fn test_class() {
        let DocumentationDraft::Class(class) = classify("/**\n * A card\n * @class\n */") else {
            panic!("expected class draft");
        };
        assert_eq!(class.doc.description, "A card");
    }

    #[test]
    fn test_mixin_with_params_and_example() {
        let comment = r#"/**
 * Keeps an element at a fixed aspect ratio.
 *
 * @mixin
 * @param {Number} $width - Ratio width
 * @param {Number} [$height=1] Ratio height
 *   spanning two lines
 * @param {Arglist} $rest...
 * @example
 *   .video {
 *     @include maintain-aspect-ratio(16, 9);
 *   }
 */"#;
        let DocumentationDraft::Callable(callable) = classify(comment) else {
            panic!("expected callable draft");
        };
        assert_eq!(
            callable.parameters,
            vec![
                DocumentationParameter {
                    name: "$width".to_string(),
                    types: vec!["Number".to_string()],
                    description: "Ratio width".to_string(),
                    default_value: None,
                    variadic: false,
                },
                DocumentationParameter {
                    name: "$height".to_string(),
                    types: vec!["Number".to_string()],
                    description: "Ratio height spanning two lines".to_string(),
                    default_value: Some("1".to_string()),
                    variadic: false,
                },
                DocumentationParameter {
                    name: "$rest".to_string(),
                    types: vec!["Arglist".to_string()],
                    description: String::new(),
                    default_value: None,
                    variadic: true,
                },
            ]
        );
        assert_eq!(
            callable.doc.examples,
            [".video {\n  @include maintain-aspect-ratio(16, 9);\n}"]
        );
    }

    #[test]
    fn test_param_implies_callable() {
        let DocumentationDraft::Callable(callable) =
            classify("/**\n * @param width\n * @return {Number} The doubled value\n */")
        else {
            panic!("expected callable draft");
        };
        assert_eq!(callable.parameters[0].name, "$width");
        assert_eq!(
            callable.returns,
            Some(DocumentationReturn {
                types: vec!["Number".to_string()],
                description: "The doubled value".to_string(),
            })
        );
    }

    #[test]
    fn test_example_keeps_at_rules_at_tag_indentation() {
        let comment = r#"/**
 * @mixin
 * @example
 * @include truncate;
 * .a { color: red; }
 * @group text
 */"#;
        let DocumentationDraft::Callable(callable) = classify(comment) else {
            panic!("expected callable draft");
        };
        assert_eq!(
            callable.doc.examples,
            ["@include truncate;\n.a { color: red; }"]
        );
        assert_eq!(callable.doc.group.as_deref(), Some("text"));
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let DocumentationDraft::Class(class) =
            classify("/** @class\n * @since 1.2\n * @author me */")
        else {
            panic!("expected class draft");
        };
        assert_eq!(class.doc, DocBlock::default());
    }

    #[test]
    fn test_conflicting_kinds_fail() {
        let err = DocBlockParser::new()
            .classify("/** @mixin\n * @class */", "stylesheet-source")
            .unwrap_err();
        assert!(matches!(err, SassDocError::Classification { .. }));
        assert!(err.to_string().contains("@mixin and @class"));
    }

    #[test]
    fn test_unterminated_type_fails() {
        let err = DocBlockParser::new()
            .classify("/** @type {Number */", "stylesheet-source")
            .unwrap_err();
        assert!(err.to_string().contains("unterminated type expression in @type"));
    }

    #[test]
    fn test_param_without_name_fails() {
        let err = DocBlockParser::new()
            .classify("/** @mixin\n * @param {Number}\n */", "stylesheet-source")
            .unwrap_err();
        assert!(err.to_string().contains("missing a parameter name"));
    }
}

//! Documentation entities produced by the extractor.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The type hierarchy is:
//! - DocBlock: metadata shared by every entity (description, group, examples, ...)
//! - DocumentationVariable / DocumentationClass / DocumentationCallable: one per
//!   documentable construct
//! - DocumentationEntity: tagged union over the three, as handed to callers
//!
//! The doc-comment classifier returns the same structs as drafts with an
//! empty `name`; the extractor fills in names, parameters and content tags.

use serde::Serialize;

/// Content type stamped on entities by default.
pub const STYLESHEET_SOURCE: &str = "stylesheet-source";

/// Content kind stamped on entities by default.
pub const CSS: &str = "css";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    fn is_public(&self) -> bool {
        *self == Visibility::Public
    }
}

/// Metadata decoded from a doc-comment, shared by every entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocBlock {
    /// Free text preceding the first tag
    pub description: String,

    /// `@group`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// `@namespace`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// `@example` blocks, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    /// `@see` references
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see: Vec<String>,

    /// `@deprecated`, with its (possibly empty) note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    #[serde(skip_serializing_if = "Visibility::is_public")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationVariable {
    /// `$` + declared identifier
    pub name: String,

    /// Types from `@type {A|B}`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Raw declaration value, unevaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub doc: DocBlock,

    pub content_type: String,
    pub content_kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationClass {
    /// `.` + class identifier
    pub name: String,

    #[serde(flatten)]
    pub doc: DocBlock,

    pub content_type: String,
    pub content_kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationCallable {
    /// Mixin or function identifier
    pub name: String,

    /// Parameters, unique by name, in signature order
    pub parameters: Vec<DocumentationParameter>,

    /// `@return`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<DocumentationReturn>,

    #[serde(flatten)]
    pub doc: DocBlock,

    pub content_type: String,
    pub content_kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationParameter {
    /// `$` + argument identifier
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

impl DocumentationParameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentationReturn {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A documented construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentationEntity {
    Variable(DocumentationVariable),
    Class(DocumentationClass),
    Callable(DocumentationCallable),
}

impl DocumentationEntity {
    pub fn name(&self) -> &str {
        match self {
            DocumentationEntity::Variable(v) => &v.name,
            DocumentationEntity::Class(c) => &c.name,
            DocumentationEntity::Callable(c) => &c.name,
        }
    }

    pub fn doc(&self) -> &DocBlock {
        match self {
            DocumentationEntity::Variable(v) => &v.doc,
            DocumentationEntity::Class(c) => &c.doc,
            DocumentationEntity::Callable(c) => &c.doc,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            DocumentationEntity::Variable(v) => &v.content_type,
            DocumentationEntity::Class(c) => &c.content_type,
            DocumentationEntity::Callable(c) => &c.content_type,
        }
    }

    pub fn content_kind(&self) -> &str {
        match self {
            DocumentationEntity::Variable(v) => &v.content_kind,
            DocumentationEntity::Class(c) => &c.content_kind,
            DocumentationEntity::Callable(c) => &c.content_kind,
        }
    }

    pub fn as_callable(&self) -> Option<&DocumentationCallable> {
        match self {
            DocumentationEntity::Callable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&DocumentationVariable> {
        match self {
            DocumentationEntity::Variable(v) => Some(v),
            _ => None,
        }
    }
}

/// Result of classifying one comment, before the extractor fills in names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentationDraft {
    Variable(DocumentationVariable),
    Class(DocumentationClass),
    Callable(DocumentationCallable),
    /// Not a documentation comment, or one without a recognizable kind
    Unrecognized,
}

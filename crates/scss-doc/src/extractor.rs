//! Documentation extraction from SCSS syntax trees.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The extractor walks the top-level statements of a stylesheet in order and
//! keeps one pending doc-comment. A block comment becomes the pending comment;
//! the next documentable construct consumes it:
//!
//! ```text
//! /** @type {Number} */        pending = comment
//! $spacer: 10px;               -> Variable "$spacer", pending cleared
//!
//! /** @class */
//! .a, .b { }                   -> Class ".a", Class ".b"
//!
//! /** @mixin */
//! @mixin bar($x, $x, $y) { }   -> Callable "bar" ($x, $y)
//! ```
//!
//! Whitespace leaves the pending comment alone. Terminators, line comments and
//! any statement that is not documentable discard it.
//!
//! Nesting at-rules (`@media`, `@if`, ...) are walked as their own frame,
//! seeded with the enclosing frame's pending comment. The enclosing frame
//! keeps its pending comment after the nested block, so a comment placed
//! right before `@media` can still document a construct that follows the
//! block. Frames live on an explicit stack, not the call stack.

use crate::analyzer::{ScssAnalyzer, SyntaxAnalyzer};
use crate::docblock::{DocBlockParser, DocCommentClassifier};
use crate::error::SassDocError;
use crate::model::{
    CSS, DocumentationDraft, DocumentationEntity, DocumentationParameter, STYLESHEET_SOURCE,
};
use crate::syntax::{
    CallableDefinition, CommentStyle, RuleBlock, Stylesheet, SyntaxNode, VariableDeclaration,
};

/// Options for a single `parse` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Passed to the classifier as its hint and stamped on every entity.
    pub content_type: String,

    /// Stamped on every entity.
    pub content_kind: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            content_type: STYLESHEET_SOURCE.to_string(),
            content_kind: CSS.to_string(),
        }
    }
}

/// SCSS documentation extractor.
///
/// The analyzer and classifier are pluggable; `SassParser::new()` uses
/// [`ScssAnalyzer`] and [`DocBlockParser`].
///
/// # Example
///
/// ```
/// use scss_doc::{ParseOptions, SassParser};
///
/// let parser = SassParser::new();
/// let docs = parser
///     .parse("/** @type {Number} */\n$spacer: 10px;", &ParseOptions::default())
///     .unwrap();
/// assert_eq!(docs.len(), 1);
/// assert_eq!(docs[0].name(), "$spacer");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SassParser<A = ScssAnalyzer, C = DocBlockParser> {
    analyzer: A,
    classifier: C,
}

impl SassParser {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One traversal frame: a statement list and its pending comment.
struct Frame<'a> {
    nodes: std::slice::Iter<'a, SyntaxNode>,
    pending: Option<&'a str>,
}

impl<A: SyntaxAnalyzer, C: DocCommentClassifier> SassParser<A, C> {
    pub fn with_collaborators(analyzer: A, classifier: C) -> Self {
        Self {
            analyzer,
            classifier,
        }
    }

    /// Run the analyzer alone, surfacing syntax errors.
    pub fn analyze(&self, content: &str) -> Result<Stylesheet, SassDocError> {
        Ok(self.analyzer.analyze(content)?)
    }

    /// Extract documentation entities from SCSS source, in source order.
    ///
    /// # Returns
    ///
    /// An empty vector for blank input or input the analyzer rejects; the
    /// rejection is logged.
    ///
    /// # Errors
    ///
    /// Returns `SassDocError::Classification` if a doc-comment's tags cannot
    /// be decoded.
    pub fn parse(
        &self,
        content: &str,
        options: &ParseOptions,
    ) -> Result<Vec<DocumentationEntity>, SassDocError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stylesheet = match self.analyzer.analyze(content) {
            Ok(stylesheet) => stylesheet,
            Err(error) => {
                tracing::warn!(%error, "Failed to analyze SCSS, skipping documentation");
                return Ok(Vec::new());
            }
        };

        let entities = self.extract(&stylesheet.children, options)?;
        tracing::debug!(count = entities.len(), "Extracted SCSS documentation");
        Ok(entities)
    }

    /// Extract documentation from an already analyzed statement list.
    pub fn extract(
        &self,
        nodes: &[SyntaxNode],
        options: &ParseOptions,
    ) -> Result<Vec<DocumentationEntity>, SassDocError> {
        let mut result = Vec::new();
        let mut frames = vec![Frame {
            nodes: nodes.iter(),
            pending: None,
        }];

        while let Some(frame) = frames.last_mut() {
            let Some(node) = frame.nodes.next() else {
                frames.pop();
                continue;
            };

            match node {
                SyntaxNode::Comment(comment) if comment.style == CommentStyle::Block => {
                    frame.pending = Some(&comment.text);
                }
                SyntaxNode::VariableDeclaration(declaration) => {
                    if let Some(comment) = frame.pending.take() {
                        result.extend(self.document_variable(comment, declaration, options)?);
                    }
                }
                SyntaxNode::RuleBlock(rule) => {
                    if let Some(comment) = frame.pending.take() {
                        self.document_classes(comment, rule, options, &mut result)?;
                    }
                }
                SyntaxNode::CallableDefinition(definition) => {
                    if let Some(comment) = frame.pending.take() {
                        result.extend(self.document_callable(comment, definition, options)?);
                    }
                }
                SyntaxNode::Whitespace(_) => {}
                SyntaxNode::NestedBlock(block) => {
                    let seed = frame.pending;
                    frames.push(Frame {
                        nodes: block.children.iter(),
                        pending: seed,
                    });
                }
                SyntaxNode::Terminator(_) | SyntaxNode::Comment(_) | SyntaxNode::Other(_) => {
                    if frame.pending.take().is_some() {
                        tracing::trace!(
                            node = node.kind_name(),
                            "Discarding doc-comment not followed by a documentable construct"
                        );
                    }
                }
            }
        }

        Ok(result)
    }

    fn document_variable(
        &self,
        comment: &str,
        declaration: &VariableDeclaration,
        options: &ParseOptions,
    ) -> Result<Option<DocumentationEntity>, SassDocError> {
        let DocumentationDraft::Variable(mut variable) =
            self.classifier.classify(comment, &options.content_type)?
        else {
            return Ok(None);
        };

        variable.name = format!("${}", declaration.name);
        if !declaration.value.is_empty() {
            variable.value = Some(declaration.value.clone());
        }
        variable.content_type = options.content_type.clone();
        variable.content_kind = options.content_kind.clone();
        Ok(Some(DocumentationEntity::Variable(variable)))
    }

    /// One entity per class selector, each classified from the same comment.
    fn document_classes(
        &self,
        comment: &str,
        rule: &RuleBlock,
        options: &ParseOptions,
        result: &mut Vec<DocumentationEntity>,
    ) -> Result<(), SassDocError> {
        for selector in &rule.selectors {
            let Some(class_name) = &selector.class_name else {
                continue;
            };
            if let DocumentationDraft::Class(mut class) =
                self.classifier.classify(comment, &options.content_type)?
            {
                class.name = format!(".{class_name}");
                class.content_type = options.content_type.clone();
                class.content_kind = options.content_kind.clone();
                result.push(DocumentationEntity::Class(class));
            }
        }
        Ok(())
    }

    fn document_callable(
        &self,
        comment: &str,
        definition: &CallableDefinition,
        options: &ParseOptions,
    ) -> Result<Option<DocumentationEntity>, SassDocError> {
        let DocumentationDraft::Callable(mut callable) =
            self.classifier.classify(comment, &options.content_type)?
        else {
            return Ok(None);
        };

        callable.name = definition.name.clone();
        callable.parameters =
            callable_parameters(definition, std::mem::take(&mut callable.parameters));
        callable.content_type = options.content_type.clone();
        callable.content_kind = options.content_kind.clone();
        Ok(Some(DocumentationEntity::Callable(callable)))
    }
}

/// Parameters in signature order, unique by name, enriched with the matching
/// `@param` documentation. Documented parameters missing from the signature
/// follow the signature's.
fn callable_parameters(
    definition: &CallableDefinition,
    mut documented: Vec<DocumentationParameter>,
) -> Vec<DocumentationParameter> {
    let mut parameters: Vec<DocumentationParameter> = Vec::new();

    for argument in definition.arguments.iter().flatten() {
        let name = format!("${}", argument.name);
        if parameters.iter().any(|p| p.name == name) {
            continue;
        }

        let mut parameter = match documented.iter().position(|p| p.name == name) {
            Some(index) => documented.remove(index),
            None => DocumentationParameter::named(name),
        };
        if argument.default_value.is_some() {
            parameter.default_value = argument.default_value.clone();
        }
        parameter.variadic |= argument.variadic;
        parameters.push(parameter);
    }

    for parameter in documented {
        if !parameters.iter().any(|p| p.name == parameter.name) {
            parameters.push(parameter);
        }
    }

    parameters
}

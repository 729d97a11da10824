/*
 * syntax.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Syntax tree produced by the SCSS analyzer.
//!
//! The tree is statement-level: it records the shapes the documentation
//! extractor cares about (comments, variable declarations, rule blocks,
//! mixin/function definitions, nesting at-rules) and keeps everything else
//! as opaque `Other` nodes. Each node carries a byte span into the analyzed
//! text.

/// Byte range into the analyzed source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slice the source this span was taken from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// A fully analyzed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub children: Vec<SyntaxNode>,
}

/// A node in the statement-level syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// `/* ... */` or `// ...`
    Comment(Comment),

    /// `$name: value`
    VariableDeclaration(VariableDeclaration),

    /// `.a, .b { ... }`
    RuleBlock(RuleBlock),

    /// `@mixin name(...) { ... }` or `@function name(...) { ... }`
    CallableDefinition(CallableDefinition),

    /// Conditional or scoping at-rule with its own statement list: `@media`, `@if`, ...
    NestedBlock(NestedBlock),

    /// A run of whitespace
    Whitespace(Span),

    /// A `;` ending a statement
    Terminator(Span),

    /// Any statement the extractor does not document
    Other(Other),
}

impl SyntaxNode {
    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Comment(c) => c.span,
            SyntaxNode::VariableDeclaration(d) => d.span,
            SyntaxNode::RuleBlock(r) => r.span,
            SyntaxNode::CallableDefinition(c) => c.span,
            SyntaxNode::NestedBlock(b) => b.span,
            SyntaxNode::Whitespace(span) | SyntaxNode::Terminator(span) => *span,
            SyntaxNode::Other(o) => o.span,
        }
    }

    /// Short kind name, used for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SyntaxNode::Comment(_) => "comment",
            SyntaxNode::VariableDeclaration(_) => "variable-declaration",
            SyntaxNode::RuleBlock(_) => "rule-block",
            SyntaxNode::CallableDefinition(_) => "callable-definition",
            SyntaxNode::NestedBlock(_) => "nested-block",
            SyntaxNode::Whitespace(_) => "whitespace",
            SyntaxNode::Terminator(_) => "statement-terminator",
            SyntaxNode::Other(_) => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `// ...` up to the end of the line
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub style: CommentStyle,
    /// Raw comment text including its delimiters.
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Variable identifier without the leading `$`.
    pub name: String,
    /// Raw value text, including flags such as `!default`.
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleBlock {
    /// Selectors in source order.
    pub selectors: Vec<Selector>,
    pub children: Vec<SyntaxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub text: String,
    /// Identifier of the first class in the selector (without the dot).
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Mixin,
    Function,
}

impl CallableKind {
    /// The at-rule keyword introducing this kind of callable.
    pub fn keyword(self) -> &'static str {
        match self {
            CallableKind::Mixin => "mixin",
            CallableKind::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallableDefinition {
    pub kind: CallableKind,
    pub name: String,
    /// `None` when the definition has no parenthesized argument list.
    pub arguments: Option<Vec<Argument>>,
    pub children: Vec<SyntaxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument identifier without the leading `$`.
    pub name: String,
    pub default_value: Option<String>,
    /// `$args...`
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedBlock {
    /// At-rule keyword without the `@`, e.g. `media` or `if`.
    pub keyword: String,
    /// Text between the keyword and the opening brace.
    pub prelude: String,
    pub children: Vec<SyntaxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Other {
    pub text: String,
    /// Statements of the attached block, if any. Never documented.
    pub children: Vec<SyntaxNode>,
    pub span: Span,
}

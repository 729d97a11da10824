//! SCSS syntax analysis.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! `ScssAnalyzer` turns SCSS text into the statement-level tree defined in
//! [`crate::syntax`]. It does not evaluate anything: values, selectors and
//! at-rule preludes are kept as raw text. It only needs to understand enough
//! structure to find statement boundaries:
//!
//! ```text
//! /** A doc comment */          -> Comment
//! $spacer: 10px;               -> VariableDeclaration, Terminator
//! .a, .b { color: red; }       -> RuleBlock
//! @mixin bar($x, $y: 1) { }    -> CallableDefinition
//! @media print { ... }         -> NestedBlock
//! @import "base";              -> Other, Terminator
//! ```
//!
//! Strings, parentheses, brackets and `#{}` interpolation are honored when
//! looking for the `{`, `;` or `}` that ends a statement.

use crate::error::SyntaxError;
use crate::syntax::{
    Argument, CallableDefinition, CallableKind, Comment, CommentStyle, NestedBlock, Other,
    RuleBlock, Selector, Span, Stylesheet, SyntaxNode, VariableDeclaration,
};

/// Maximum number of nested blocks accepted by `ScssAnalyzer`.
pub const MAX_NESTING_DEPTH: usize = 256;

/// At-rules whose block holds statements of the enclosing scope.
const NESTING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "if",
    "else",
    "each",
    "for",
    "while",
    "at-root",
    "layer",
    "container",
    "document",
];

/// Turns stylesheet text into a syntax tree.
///
/// Implementations must not return a partially built tree: either the whole
/// input is analyzed or an error is returned.
pub trait SyntaxAnalyzer: Send + Sync {
    fn analyze(&self, source: &str) -> Result<Stylesheet, SyntaxError>;
}

/// Statement-level SCSS analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScssAnalyzer;

impl ScssAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxAnalyzer for ScssAnalyzer {
    fn analyze(&self, source: &str) -> Result<Stylesheet, SyntaxError> {
        let mut scanner = Scanner::new(source);
        let children = scanner.statements(None, 0)?;
        Ok(Stylesheet { children })
    }
}

/// What ended a statement chunk.
enum ChunkEnd {
    OpenBrace,
    Semicolon,
    CloseBrace,
    Eof,
}

/// Internal scanner state.
struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    /// Byte offset of the next unread byte. Always on a char boundary.
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        // Spans stay offsets into `source`, so a byte order mark is skipped, not stripped
        let pos = if source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        Self {
            source,
            bytes: source.as_bytes(),
            pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at_offset(self.source, offset, message)
    }

    /// Parse statements up to the end of input, or up to and including the
    /// `}` that closes the block opened at `open_brace`.
    fn statements(
        &mut self,
        open_brace: Option<usize>,
        depth: usize,
    ) -> Result<Vec<SyntaxNode>, SyntaxError> {
        let mut nodes = Vec::new();

        loop {
            let Some(byte) = self.peek() else {
                return match open_brace {
                    Some(offset) => Err(self.error(offset, "unclosed block")),
                    None => Ok(nodes),
                };
            };

            match byte {
                b if b.is_ascii_whitespace() => nodes.push(self.whitespace()),
                b'/' if self.peek_next() == Some(b'*') => nodes.push(self.block_comment()?),
                b'/' if self.peek_next() == Some(b'/') => nodes.push(self.line_comment()),
                b';' => {
                    nodes.push(SyntaxNode::Terminator(Span::new(self.pos, self.pos + 1)));
                    self.pos += 1;
                }
                b'}' => {
                    if open_brace.is_none() {
                        return Err(self.error(self.pos, "unexpected '}'"));
                    }
                    self.pos += 1;
                    return Ok(nodes);
                }
                _ => self.statement(depth, &mut nodes)?,
            }
        }
    }

    fn whitespace(&mut self) -> SyntaxNode {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        SyntaxNode::Whitespace(Span::new(start, self.pos))
    }

    fn block_comment(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let span = self.skip_block_comment()?;
        Ok(SyntaxNode::Comment(Comment {
            style: CommentStyle::Block,
            text: span.text(self.source).to_string(),
            span,
        }))
    }

    fn skip_block_comment(&mut self) -> Result<Span, SyntaxError> {
        let start = self.pos;
        match self.source[start + 2..].find("*/") {
            Some(rel) => {
                self.pos = start + 2 + rel + 2;
                Ok(Span::new(start, self.pos))
            }
            None => Err(self.error(start, "unterminated comment")),
        }
    }

    fn line_comment(&mut self) -> SyntaxNode {
        let start = self.pos;
        self.skip_line_comment();
        let span = Span::new(start, self.pos);
        SyntaxNode::Comment(Comment {
            style: CommentStyle::Line,
            text: span.text(self.source).trim_end().to_string(),
            span,
        })
    }

    fn skip_line_comment(&mut self) {
        self.pos = match self.source[self.pos..].find('\n') {
            Some(rel) => self.pos + rel,
            None => self.bytes.len(),
        };
    }

    fn statement(&mut self, depth: usize, nodes: &mut Vec<SyntaxNode>) -> Result<(), SyntaxError> {
        let start = self.pos;
        let (text, end) = self.chunk()?;

        match end {
            ChunkEnd::OpenBrace => {
                let open = self.pos;
                if depth >= MAX_NESTING_DEPTH {
                    return Err(self.error(
                        open,
                        format!("blocks nested deeper than {MAX_NESTING_DEPTH} levels"),
                    ));
                }
                self.pos += 1;
                let children = self.statements(Some(open), depth + 1)?;
                let span = Span::new(start, self.pos);
                nodes.push(self.block_statement(&text, children, span)?);
            }
            ChunkEnd::Semicolon => {
                nodes.push(plain_statement(&text, Span::new(start, self.pos)));
                nodes.push(SyntaxNode::Terminator(Span::new(self.pos, self.pos + 1)));
                self.pos += 1;
            }
            ChunkEnd::CloseBrace | ChunkEnd::Eof => {
                nodes.push(plain_statement(&text, Span::new(start, self.pos)));
            }
        }

        Ok(())
    }

    /// Read statement text up to the `{`, `;` or `}` ending it. The ending
    /// byte is not consumed. Comments inside the statement are dropped.
    fn chunk(&mut self) -> Result<(String, ChunkEnd), SyntaxError> {
        let mut text = String::new();
        // Offsets of unclosed `(` and `[`
        let mut groups: Vec<usize> = Vec::new();
        let mut interpolations: Vec<usize> = Vec::new();

        loop {
            let Some(byte) = self.peek() else {
                if let Some(&open) = groups.last() {
                    return Err(self.error(open, "unclosed parenthesis"));
                }
                if let Some(&open) = interpolations.last() {
                    return Err(self.error(open, "unclosed interpolation"));
                }
                return Ok((text, ChunkEnd::Eof));
            };

            let nested = !groups.is_empty() || !interpolations.is_empty();
            match byte {
                b'"' | b'\'' => text.push_str(self.string(byte)?),
                b'/' if self.peek_next() == Some(b'*') => {
                    self.skip_block_comment()?;
                    text.push(' ');
                }
                b'/' if self.peek_next() == Some(b'/')
                    && self.starts_line_comment(&groups, &text) =>
                {
                    self.skip_line_comment();
                }
                b'#' if self.peek_next() == Some(b'{') => {
                    interpolations.push(self.pos);
                    text.push_str("#{");
                    self.pos += 2;
                }
                b'}' if !interpolations.is_empty() => {
                    interpolations.pop();
                    text.push('}');
                    self.pos += 1;
                }
                b'{' if !nested => return Ok((text, ChunkEnd::OpenBrace)),
                b'}' if !nested => return Ok((text, ChunkEnd::CloseBrace)),
                b';' if !nested => return Ok((text, ChunkEnd::Semicolon)),
                b'(' | b'[' => {
                    groups.push(self.pos);
                    text.push(char::from(byte));
                    self.pos += 1;
                }
                b')' | b']' => {
                    if groups.pop().is_none() {
                        return Err(self.error(
                            self.pos,
                            format!("unbalanced '{}'", char::from(byte)),
                        ));
                    }
                    text.push(char::from(byte));
                    self.pos += 1;
                }
                _ => self.bump_char(&mut text),
            }
        }
    }

    /// `//` inside `url(...)` or right after `:` belongs to a URL.
    fn starts_line_comment(&self, groups: &[usize], text: &str) -> bool {
        let in_url = groups.last().is_some_and(|&open| {
            self.source
                .get(open.saturating_sub(3)..open)
                .is_some_and(|name| name.eq_ignore_ascii_case("url"))
        });
        !in_url && !text.ends_with(':')
    }

    fn bump_char(&mut self, text: &mut String) {
        if let Some(ch) = self.source[self.pos..].chars().next() {
            text.push(ch);
            self.pos += ch.len_utf8();
        }
    }

    /// Consume a quoted string and return it with its quotes.
    fn string(&mut self, quote: u8) -> Result<&'a str, SyntaxError> {
        let start = self.pos;
        self.pos += 1;

        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => {
                    self.pos += 1;
                    // Skip the whole escaped char so `pos` stays on a boundary
                    if let Some(ch) = self.source[self.pos..].chars().next() {
                        self.pos += ch.len_utf8();
                    }
                }
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(&self.source[start..self.pos]);
                }
                _ => self.pos += 1,
            }
        }

        Err(self.error(start, "unterminated string"))
    }

    fn block_statement(
        &self,
        text: &str,
        children: Vec<SyntaxNode>,
        span: Span,
    ) -> Result<SyntaxNode, SyntaxError> {
        let prelude = text.trim();
        if prelude.is_empty() {
            return Err(self.error(span.start, "missing selector before '{'"));
        }

        if let Some(at_rule) = prelude.strip_prefix('@') {
            let (keyword, rest) = split_keyword(at_rule);
            let node = match keyword {
                "mixin" => SyntaxNode::CallableDefinition(self.callable(
                    CallableKind::Mixin,
                    rest,
                    children,
                    span,
                )?),
                "function" => SyntaxNode::CallableDefinition(self.callable(
                    CallableKind::Function,
                    rest,
                    children,
                    span,
                )?),
                _ if NESTING_AT_RULES.contains(&keyword) => SyntaxNode::NestedBlock(NestedBlock {
                    keyword: keyword.to_string(),
                    prelude: rest.trim().to_string(),
                    children,
                    span,
                }),
                _ => other(prelude, children, span),
            };
            return Ok(node);
        }

        // Nested property block: `font: { family: serif; }`
        if prelude.ends_with(':') {
            return Ok(other(prelude, children, span));
        }

        Ok(SyntaxNode::RuleBlock(RuleBlock {
            selectors: parse_selectors(prelude),
            children,
            span,
        }))
    }

    fn callable(
        &self,
        kind: CallableKind,
        signature: &str,
        children: Vec<SyntaxNode>,
        span: Span,
    ) -> Result<CallableDefinition, SyntaxError> {
        let signature = signature.trim();
        let name_end = signature
            .find(|c: char| !is_identifier_char(c))
            .unwrap_or(signature.len());
        let name = &signature[..name_end];
        if name.is_empty() {
            return Err(self.error(
                span.start,
                format!("@{} is missing a name", kind.keyword()),
            ));
        }

        let rest = signature[name_end..].trim_start();
        let arguments = match (rest.starts_with('('), rest.rfind(')')) {
            (true, Some(close)) => Some(parse_arguments(&rest[1..close])),
            _ => None,
        };

        Ok(CallableDefinition {
            kind,
            name: name.to_string(),
            arguments,
            children,
            span,
        })
    }
}

fn other(text: &str, children: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    SyntaxNode::Other(Other {
        text: text.to_string(),
        children,
        span,
    })
}

/// Classify a statement that has no block.
fn plain_statement(text: &str, span: Span) -> SyntaxNode {
    let statement = text.trim();

    if let Some((name, value)) = statement
        .strip_prefix('$')
        .and_then(|rest| rest.split_once(':'))
    {
        let name = name.trim();
        if is_identifier(name) {
            return SyntaxNode::VariableDeclaration(VariableDeclaration {
                name: name.to_string(),
                value: value.trim().to_string(),
                span,
            });
        }
    }

    other(statement, Vec::new(), span)
}

fn split_keyword(at_rule: &str) -> (&str, &str) {
    let end = at_rule
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(at_rule.len());
    (&at_rule[..end], &at_rule[end..])
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}

/// Split on `separator` outside of strings, parentheses, brackets and braces.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&text[start..]);
    parts
}

fn parse_selectors(prelude: &str) -> Vec<Selector> {
    split_top_level(prelude, ',')
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Selector {
            text: text.to_string(),
            class_name: first_class_name(text),
        })
        .collect()
}

/// Identifier of the first class selector outside of pseudo-class arguments
/// and attribute selectors.
fn first_class_name(selector: &str) -> Option<String> {
    let mut chars = selector.char_indices();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '\\' => {
                chars.next();
            }
            '.' if depth == 0 => {
                let name = class_identifier(&selector[i + 1..]);
                if !name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit()) {
                    return Some(name.to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// The class identifier at the start of `rest`, keeping escapes and `#{}`
/// interpolation intact.
fn class_identifier(rest: &str) -> &str {
    let mut end = 0;
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        if i < end {
            continue;
        }
        match c {
            c if is_identifier_char(c) => end = i + c.len_utf8(),
            '\\' => match chars.next() {
                Some((j, escaped)) => end = j + escaped.len_utf8(),
                None => break,
            },
            '#' if rest[i + 1..].starts_with('{') => match rest[i..].find('}') {
                Some(close) => end = i + close + 1,
                None => break,
            },
            _ => break,
        }
    }

    &rest[..end]
}

fn parse_arguments(list: &str) -> Vec<Argument> {
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|raw| {
            let (declaration, default_value) = match raw.split_once(':') {
                Some((declaration, value)) => (
                    declaration.trim(),
                    Some(value.trim())
                        .filter(|v| !v.is_empty())
                        .map(String::from),
                ),
                None => (raw.trim(), None),
            };
            let (declaration, variadic) = match declaration.strip_suffix("...") {
                Some(declaration) => (declaration.trim_end(), true),
                None => (declaration, false),
            };
            let name = declaration.strip_prefix('$')?;
            is_identifier(name).then(|| Argument {
                name: name.to_string(),
                default_value,
                variadic,
            })
        })
        .collect()
}

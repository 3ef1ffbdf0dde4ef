#![allow(clippy::module_inception)]

use log::debug;
use serde::Serialize;

use crate::{
    ast::ast::Node,
    errors::errors::{Diagnostic, Severity},
    lexer::lexer::tokenize,
    parser::parser::Parser,
};

pub mod ast;
pub mod errors;
pub mod incremental;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in the source text.
///
/// `offset` is a byte offset, `line` and `column` are 1-based with columns
/// counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the position just past `text`, assuming `text` begins here.
    pub fn advanced_by(&self, text: &str) -> Self {
        let mut position = *self;
        for ch in text.chars() {
            if ch == '\n' {
                position.line += 1;
                position.column = 1;
            } else {
                position.column += 1;
            }
        }
        position.offset += text.len() as u32;
        position
    }
}

/// A half-open byte range `[start, end)` over the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// An empty span sitting at `position`.
    pub fn empty(position: Position) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    pub fn len(&self) -> usize {
        (self.end.offset - self.start.offset) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Knobs for a single parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Warn when a comment sits where the grammar would otherwise have accepted
    /// it as an expression (a call argument, an array element, ...).
    pub report_comment_expressions: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            report_comment_expressions: true,
        }
    }
}

/// The outcome of a parse: a `SourceFile` tree, possibly containing error
/// nodes, plus every diagnostic produced on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Parses `source` into a concrete syntax tree with the default options.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> ParseResult {
    debug!("parsing {} bytes", source.len());

    let mut parser = Parser::new(tokenize(source), options.clone());
    let root = parser.parse_source_file();
    let diagnostics = parser.into_diagnostics();

    debug!(
        "parsed {} top-level statements with {} diagnostics",
        root.children.len(),
        diagnostics.len()
    );

    ParseResult { root, diagnostics }
}

/// Finds the line containing byte `position`.
///
/// Returns the 1-based line number, the line text (including its trailing
/// newline) and the byte offset of `position` within that line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, &str, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line, pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character.
    if content.is_empty() || content.ends_with('\n') {
        Some((line_number, "", 0))
    } else {
        let last = content.rsplit('\n').next().unwrap_or("");
        Some((line_number - 1, last, last.len()))
    }
}

/// Renders a diagnostic with a caret under the offending column.
///
/// ```text
/// error: ExpectedExpression (Expected an expression, found `)`)
/// -> main.ejs
///    |
/// 20 | x = )
///    | ----^
/// ```
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) -> String {
    let mut out = String::new();

    let level = match diagnostic.severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    };

    match diagnostic.notes.first() {
        Some(note) => out.push_str(&format!("{}: {} ({})\n", level, diagnostic.name, note)),
        None => out.push_str(&format!("{}: {}\n", level, diagnostic.name)),
    }
    out.push_str(&format!("-> {}\n", file));

    let Some((line, line_text, line_pos)) =
        get_line_at_position(source, diagnostic.span.start.offset)
    else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let column = line_text[..line_pos.min(line_text.len())].chars().count();
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}

use log::debug;
use thiserror::Error;

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::Diagnostic,
    lexer::lexer::Lexer,
    parse_with_options,
    parser::parser::Parser,
    ParseOptions, ParseResult, Position, Span,
};

/// A single text replacement: `old_length` bytes at `start_offset` are
/// replaced by `new_text`, which is `new_length` bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start_offset: usize,
    pub old_length: usize,
    pub new_length: usize,
    pub new_text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edit range {start}..{end} is outside of the {len} byte source")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("edit declares {declared} new bytes but carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

impl Edit {
    pub fn new(start_offset: usize, old_length: usize, new_text: impl Into<String>) -> Self {
        let new_text = new_text.into();
        Edit {
            start_offset,
            old_length,
            new_length: new_text.len(),
            new_text,
        }
    }

    pub fn old_end(&self) -> usize {
        self.start_offset + self.old_length
    }

    /// Returns `source` with this edit applied.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        let end = self.old_end();

        if end > source.len() {
            return Err(EditError::OutOfBounds {
                start: self.start_offset,
                end,
                len: source.len(),
            });
        }

        for offset in [self.start_offset, end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        if self.new_text.len() != self.new_length {
            return Err(EditError::LengthMismatch {
                declared: self.new_length,
                actual: self.new_text.len(),
            });
        }

        let mut edited = String::with_capacity(source.len() - self.old_length + self.new_length);
        edited.push_str(&source[..self.start_offset]);
        edited.push_str(&self.new_text);
        edited.push_str(&source[end..]);
        Ok(edited)
    }
}

/// How many leading top-level statements of `root` survive an edit starting
/// at `edit_start` unchanged.
///
/// A statement is kept only when the statement after it also ends before the
/// edit, since the parser may look one token past a statement (for `elif` and
/// `else`). Parsing restarts at that following statement, which must be a
/// real statement start rather than an error node.
pub fn reusable_statements(root: &Node, edit_start: usize) -> usize {
    let before_edit = root
        .children
        .iter()
        .take_while(|child| (child.span.end.offset as usize) < edit_start)
        .count();

    let Some(mut restart) = before_edit.checked_sub(1) else {
        return 0;
    };

    while restart > 0 && root.children[restart].is_error() {
        restart -= 1;
    }

    restart
}

/// Applies `edit` to `old_source` and parses the result, reusing what it can
/// of `old_result`.
pub fn reparse(
    old_source: &str,
    old_result: &ParseResult,
    edit: &Edit,
    options: &ParseOptions,
) -> Result<(String, ParseResult), EditError> {
    let new_source = edit.apply(old_source)?;
    let reused = reusable_statements(&old_result.root, edit.start_offset);

    if reused == 0 {
        debug!("nothing reusable before offset {}, parsing from scratch", edit.start_offset);
        let result = parse_with_options(&new_source, options);
        return Ok((new_source, result));
    }

    let restart_at = old_result.root.children[reused].span.start;
    debug!(
        "reusing {} statements, reparsing from {}:{}",
        reused, restart_at.line, restart_at.column
    );

    let mut parser = Parser::new(Lexer::starting_at(&new_source, restart_at), options.clone());
    let tail = parser.parse_source_file();
    let tail_diagnostics = parser.into_diagnostics();

    let mut children = old_result.root.children[..reused].to_vec();
    children.extend(tail.children);

    let mut diagnostics: Vec<Diagnostic> = old_result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.span.start.offset < restart_at.offset)
        .cloned()
        .collect();
    diagnostics.extend(tail_diagnostics);

    let root = Node::new(
        NodeKind::SourceFile,
        Span::new(Position::start(), tail.span.end),
        children,
    );

    Ok((new_source, ParseResult { root, diagnostics }))
}

//! Parser state and panic-mode recovery.
//!
//! This module contains the main Parser struct. The parser owns the
//! significant tokens of one source text (trivia is dropped up front, but
//! the position of every comment is remembered), the stack of delimiters
//! currently open, and the diagnostics collected so far.
//!
//! Handlers return `Result<Node, Error>`. An `Err` unwinds to the nearest
//! statement list, which records it, skips to the next statement boundary
//! and leaves an `ErrorNode` in place of the broken statement.

use log::debug;

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Diagnostic, Error, ErrorCategory, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    ParseOptions, Position, Span, MK_TOKEN,
};

use super::stmt::parse_stmt;

/// How deep expressions and blocks may nest before the parser gives up on
/// the statement. Operator chains count one level per operator.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A delimiter the parser is currently inside of.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
    closer: TokenKind,
    /// Arguments, array elements or object entries, as opposed to a block
    /// or a parameter list.
    expression_list: bool,
}

/// The main parser structure that maintains parsing state.
pub struct Parser<'a> {
    /// Significant tokens, always ending with `EOF`
    tokens: Vec<Token<'a>>,
    /// For each token, the comment directly preceding it (if any). A line
    /// comment is always followed by a newline token or `EOF`, so no token
    /// has more than one.
    comment_before: Vec<Option<Span>>,
    /// Current position in the token stream
    pos: usize,
    /// Where lexing started
    start: Position,
    /// Delimiters currently open, innermost last
    delimiters: Vec<Delimiter>,
    /// Nesting levels entered by the expressions and blocks being parsed
    depth: usize,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Creates a new Parser, draining `lexer` and setting trivia aside.
    pub fn new(lexer: Lexer<'a>, options: ParseOptions) -> Self {
        let start = lexer.position();
        let mut tokens = Vec::new();
        let mut comment_before = Vec::new();
        let mut pending_comment = None;

        for token in lexer {
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Comment => pending_comment = Some(token.span),
                _ => {
                    tokens.push(token);
                    comment_before.push(pending_comment.take());
                }
            }
        }

        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map_or(start, |t| t.span.end);
            tokens.push(MK_TOKEN!(TokenKind::EOF, "", Span::empty(end)));
            comment_before.push(None);
        }

        Parser {
            tokens,
            comment_before,
            pos: 0,
            start,
            delimiters: Vec::new(),
            depth: 0,
            diagnostics: Vec::new(),
            options,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token<'a> {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Looks `n` tokens ahead; stays on `EOF` past the end.
    pub fn peek(&self, n: usize) -> &Token<'a> {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    /// The kind of the first token that is not a newline.
    pub fn peek_past_newlines(&self) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|kind| *kind != TokenKind::Newline)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the one just consumed.
    /// Never moves past `EOF`.
    pub fn advance(&mut self) -> Token<'a> {
        let token = *self.current_token();
        if token.kind != TokenKind::EOF {
            self.note_comment(self.pos);
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token<'a>, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected(&describe(expected_kind))),
            }
        } else {
            Ok(self.advance())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token<'a>, Error> {
        self.expect_error(expected_kind, None)
    }

    pub fn skip_newlines(&mut self) {
        while self.current_token_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    pub fn skip_separators(&mut self) {
        while self.current_token_kind().is_separator() {
            self.advance();
        }
    }

    /// True where a statement may end: a separator, `}` or the end of input.
    pub fn at_statement_end(&self) -> bool {
        let kind = self.current_token_kind();
        kind.is_separator() || kind == TokenKind::RBrace || kind == TokenKind::EOF
    }

    /// True when the current token can only close something, so a missing
    /// expression in front of it can be patched over without skipping.
    pub fn at_boundary(&self) -> bool {
        let kind = self.current_token_kind();
        kind.is_separator()
            || kind == TokenKind::EOF
            || self.delimiters.last().is_some_and(|d| d.closer == kind)
    }

    /// Runs `parse` inside a delimited region closed by `closer`.
    pub fn delimited<T>(
        &mut self,
        closer: TokenKind,
        expression_list: bool,
        parse: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.delimiters.push(Delimiter {
            closer,
            expression_list,
        });
        let result = parse(self);
        self.delimiters.pop();
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enters one more nesting level, failing once `MAX_NESTING_DEPTH` is
    /// reached. Callers restore the previous level with `leave_nesting`.
    pub fn enter_nesting(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                self.current_token().span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_nesting(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// End of the last consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos {
            0 => self.start,
            pos => self.tokens[pos - 1].span.end,
        }
    }

    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous_end())
    }

    /// Builds the error for an unexpected current token. Lexical error
    /// tokens report their own problem instead.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        let error_impl = match token.kind {
            TokenKind::Error(kind) => ErrorImpl::from_lexical(kind, token.text),
            _ => ErrorImpl::ExpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
            },
        };
        Error::new(error_impl, token.span)
    }

    pub fn report(&mut self, error: Error) {
        self.diagnostics.push(Diagnostic::from(error));
    }

    pub fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A comment right before the current token, if one is still unclaimed.
    pub fn comment_before_current(&self) -> Option<Span> {
        self.comment_before.get(self.pos).copied().flatten()
    }

    fn note_comment(&mut self, index: usize) {
        if !self.options.report_comment_expressions
            || !self.delimiters.last().is_some_and(|d| d.expression_list)
        {
            return;
        }

        if let Some(span) = self.comment_before.get_mut(index).and_then(Option::take) {
            self.diagnostics.push(
                Diagnostic::warning(
                    ErrorCategory::Syntax,
                    "CommentInExpression",
                    "comment inside an expression list is treated as trivia",
                    span,
                )
                .with_note("comments are never expressions; move it outside the list"),
            );
        }
    }

    /// Parses statements until `EOF`, or until `}` when `in_block`.
    ///
    /// Statements are separated by one or more newlines or `;`. A statement
    /// that fails to parse becomes an `ErrorNode` covering everything
    /// skipped while resynchronising.
    pub fn parse_statement_list(&mut self, in_block: bool) -> Vec<Node> {
        let mut body = Vec::new();

        loop {
            self.skip_separators();

            let kind = self.current_token_kind();
            if kind == TokenKind::EOF || (in_block && kind == TokenKind::RBrace) {
                break;
            }

            let start_index = self.pos;
            match parse_stmt(self) {
                Ok(stmt) => {
                    body.push(stmt);
                    if let Some(error_node) = self.expect_separator(in_block) {
                        body.push(error_node);
                    }
                }
                Err(error) => {
                    self.report(error);
                    body.push(self.recover(start_index, in_block));
                }
            }
        }

        body
    }

    /// Consumes the separators after a statement. A missing separator is
    /// fine before `}` (inside a block) and at the end of input.
    fn expect_separator(&mut self, in_block: bool) -> Option<Node> {
        let kind = self.current_token_kind();
        if kind.is_separator() {
            self.skip_separators();
            return None;
        }
        if kind == TokenKind::EOF || (in_block && kind == TokenKind::RBrace) {
            return None;
        }

        let error = self.missing_separator();
        self.report(error);
        Some(self.recover(self.pos, in_block))
    }

    /// The error for a statement running into the next one on the same line.
    pub fn missing_separator(&self) -> Error {
        let token = self.current_token();
        let error_impl = match token.kind {
            TokenKind::Error(kind) => ErrorImpl::from_lexical(kind, token.text),
            _ => ErrorImpl::MissingSeparator {
                found: token.to_string(),
            },
        };
        Error::new(error_impl, token.span)
    }

    /// Panic-mode recovery: skips to the next statement separator that is
    /// not inside a brace opened since `start_index`, never consuming the `}`
    /// that closes the enclosing block. Returns an `ErrorNode` spanning every
    /// token from `start_index` to the stopping point.
    pub fn recover(&mut self, start_index: usize, in_block: bool) -> Node {
        let mut open = self.open_delimiters(start_index);

        loop {
            let kind = self.current_token_kind();
            match kind {
                TokenKind::EOF => break,
                _ if kind.is_separator() && !open.contains(&TokenKind::RBrace) => break,
                TokenKind::RBrace if in_block && !open.contains(&TokenKind::RBrace) => break,
                TokenKind::LBrace => open.push(TokenKind::RBrace),
                TokenKind::LBracket => open.push(TokenKind::RBracket),
                TokenKind::LParen => open.push(TokenKind::RParen),
                TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen => {
                    if let Some(index) = open.iter().rposition(|closer| *closer == kind) {
                        open.truncate(index);
                    }
                }
                _ => {}
            }
            self.advance();
        }

        let start = self.tokens[start_index.min(self.tokens.len() - 1)].span.start;
        let span = if self.pos > start_index {
            self.span_from(start)
        } else {
            Span::empty(start)
        };

        debug!(
            "recovered at {}:{}, skipped {} tokens",
            span.end.line,
            span.end.column,
            self.pos.saturating_sub(start_index)
        );

        Node::new(NodeKind::ErrorNode, span, Vec::new())
    }

    /// Closers still owed for brackets opened between `from` and the current
    /// token, innermost last.
    fn open_delimiters(&self, from: usize) -> Vec<TokenKind> {
        let mut open = Vec::new();

        for token in &self.tokens[from.min(self.pos)..self.pos] {
            match token.kind {
                TokenKind::LBrace => open.push(TokenKind::RBrace),
                TokenKind::LBracket => open.push(TokenKind::RBracket),
                TokenKind::LParen => open.push(TokenKind::RParen),
                TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen => {
                    if let Some(index) = open.iter().rposition(|closer| *closer == token.kind) {
                        open.truncate(index);
                    }
                }
                _ => {}
            }
        }

        open
    }

    /// Parses every statement up to `EOF` into a `SourceFile` node.
    pub fn parse_source_file(&mut self) -> Node {
        let body = self.parse_statement_list(false);
        let end = self.tokens[self.tokens.len() - 1].span.end;

        Node::new(NodeKind::SourceFile, Span::new(self.start, end), body)
    }

    /// Hands back the diagnostics in source order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.span.start.offset);
        diagnostics
    }
}

/// How a token kind reads in an "expected ..." message.
pub fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::EOF => String::from("end of file"),
        TokenKind::Identifier => String::from("an identifier"),
        TokenKind::Number => String::from("a number"),
        TokenKind::String => String::from("a string"),
        TokenKind::Boolean => String::from("a boolean"),
        TokenKind::Keyword(keyword) => format!("`{}`", format!("{:?}", keyword).to_lowercase()),
        TokenKind::Operator(operator) => format!("operator {:?}", operator),
        TokenKind::Newline | TokenKind::Semicolon => String::from("a newline or `;`"),
        TokenKind::Comment => String::from("a comment"),
        TokenKind::Whitespace => String::from("whitespace"),
        TokenKind::LBrace => String::from("`{`"),
        TokenKind::RBrace => String::from("`}`"),
        TokenKind::LBracket => String::from("`[`"),
        TokenKind::RBracket => String::from("`]`"),
        TokenKind::LParen => String::from("`(`"),
        TokenKind::RParen => String::from("`)`"),
        TokenKind::Comma => String::from("`,`"),
        TokenKind::Colon => String::from("`:`"),
        TokenKind::Dot => String::from("`.`"),
        TokenKind::Error(_) => String::from("a valid token"),
    }
}

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{LexicalErrorKind, Operator, Token, TokenKind, RESERVED_LOOKUP};

/// Classifies the text a pattern matched.
pub type RegexHandler = fn(&str) -> TokenKind;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        // Every pattern only ever matches at the start of the remainder.
        let regex = Regex::new(&format!("^(?:{})", pattern))
            .unwrap_or_else(|err| panic!("invalid token pattern {pattern:?}: {err}"));
        RegexPattern { regex, handler }
    }
}

lazy_static! {
    /// Tried in order, first match wins. Longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("[ \\t\\r]+", MK_DEFAULT_HANDLER!(TokenKind::Whitespace)),
        RegexPattern::new("\\n", MK_DEFAULT_HANDLER!(TokenKind::Newline)),
        RegexPattern::new("//[^\\n]*", MK_DEFAULT_HANDLER!(TokenKind::Comment)),
        RegexPattern::new("[a-zA-Z][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new("[0-9]+(\\.[0-9]+)?", MK_DEFAULT_HANDLER!(TokenKind::Number)),
        RegexPattern::new("\"(?:[^\"\\\\\\n]|\\\\.)*\"", MK_DEFAULT_HANDLER!(TokenKind::String)),
        RegexPattern::new("'(?:[^'\\\\\\n]|\\\\.)*'", MK_DEFAULT_HANDLER!(TokenKind::String)),
        RegexPattern::new("\"(?:[^\"\\\\\\n]|\\\\.)*", MK_DEFAULT_HANDLER!(TokenKind::Error(LexicalErrorKind::UnterminatedString))),
        RegexPattern::new("'(?:[^'\\\\\\n]|\\\\.)*", MK_DEFAULT_HANDLER!(TokenKind::Error(LexicalErrorKind::UnterminatedString))),
        RegexPattern::new("==", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::EqualEqual))),
        RegexPattern::new("!=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::NotEqual))),
        RegexPattern::new(">=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::GreaterEqual))),
        RegexPattern::new("<=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::LessEqual))),
        RegexPattern::new("&&", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::AndAnd))),
        RegexPattern::new("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::OrOr))),
        RegexPattern::new("\\+=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::PlusAssign))),
        RegexPattern::new("-=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::MinusAssign))),
        RegexPattern::new("\\*=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::StarAssign))),
        RegexPattern::new("/=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::SlashAssign))),
        RegexPattern::new(":=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::ColonAssign))),
        RegexPattern::new("\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::DotDot))),
        RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Plus))),
        RegexPattern::new("-", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Minus))),
        RegexPattern::new("\\*", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Star))),
        RegexPattern::new("/", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Slash))),
        RegexPattern::new("%", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Percent))),
        RegexPattern::new(">", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Greater))),
        RegexPattern::new("<", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Less))),
        RegexPattern::new("=", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Assign))),
        RegexPattern::new("!", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Bang))),
        RegexPattern::new("\\$", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Dollar))),
        RegexPattern::new("@", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::At))),
        RegexPattern::new("\\{", MK_DEFAULT_HANDLER!(TokenKind::LBrace)),
        RegexPattern::new("\\}", MK_DEFAULT_HANDLER!(TokenKind::RBrace)),
        RegexPattern::new("\\[", MK_DEFAULT_HANDLER!(TokenKind::LBracket)),
        RegexPattern::new("\\]", MK_DEFAULT_HANDLER!(TokenKind::RBracket)),
        RegexPattern::new("\\(", MK_DEFAULT_HANDLER!(TokenKind::LParen)),
        RegexPattern::new("\\)", MK_DEFAULT_HANDLER!(TokenKind::RParen)),
        RegexPattern::new(",", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        RegexPattern::new(":", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
        RegexPattern::new("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot)),
        RegexPattern::new(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
    ];
}

fn symbol_handler(text: &str) -> TokenKind {
    RESERVED_LOOKUP
        .get(text)
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

/// A lazy tokenizer over a borrowed source buffer.
///
/// Yields every token including trivia, then a single `EOF`, then nothing.
/// Cloning a lexer snapshots its position, so a stream can be restarted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    position: Position,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer::starting_at(source, Position::start())
    }

    /// Starts lexing at `position`, which must lie on a token boundary.
    pub fn starting_at(source: &'a str, position: Position) -> Lexer<'a> {
        Lexer {
            source,
            pos: position.offset as usize,
            position,
            finished: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn match_length(&self) -> (usize, TokenKind) {
        let remaining = self.remainder();

        for pattern in PATTERNS.iter() {
            if let Some(found) = pattern.regex.find(remaining) {
                if found.end() > 0 {
                    return (found.end(), (pattern.handler)(found.as_str()));
                }
            }
        }

        // Nothing matched: swallow one character so we always make progress.
        let width = remaining.chars().next().map_or(1, char::len_utf8);
        (width, TokenKind::Error(LexicalErrorKind::IllegalCharacter))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }

        if self.at_eof() {
            self.finished = true;
            return Some(MK_TOKEN!(TokenKind::EOF, "", Span::empty(self.position)));
        }

        let (length, kind) = self.match_length();
        let text = &self.source[self.pos..self.pos + length];
        let start = self.position;
        let end = start.advanced_by(text);

        self.pos += length;
        self.position = end;

        Some(MK_TOKEN!(kind, text, Span::new(start, end)))
    }
}

/// Tokenizes `source` lazily. See [`Lexer`].
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

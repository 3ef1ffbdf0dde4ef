use lazy_static::lazy_static;
use serde::Serialize;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Keyword(Keyword::Fn));
        map.insert("macro", TokenKind::Keyword(Keyword::Macro));
        map.insert("struct", TokenKind::Keyword(Keyword::Struct));
        map.insert("return", TokenKind::Keyword(Keyword::Return));
        map.insert("use", TokenKind::Keyword(Keyword::Use));
        map.insert("as", TokenKind::Keyword(Keyword::As));
        map.insert("from", TokenKind::Keyword(Keyword::From));
        map.insert("for", TokenKind::Keyword(Keyword::For));
        map.insert("if", TokenKind::Keyword(Keyword::If));
        map.insert("elif", TokenKind::Keyword(Keyword::Elif));
        map.insert("else", TokenKind::Keyword(Keyword::Else));
        map.insert("async", TokenKind::Keyword(Keyword::Async));
        map.insert("await", TokenKind::Keyword(Keyword::Await));
        map.insert("and", TokenKind::Keyword(Keyword::And));
        map.insert("or", TokenKind::Keyword(Keyword::Or));
        map.insert("not", TokenKind::Keyword(Keyword::Not));
        map.insert("in", TokenKind::Keyword(Keyword::In));
        map.insert("true", TokenKind::Boolean);
        map.insert("false", TokenKind::Boolean);
        map
    };
}

/// Prefixes accepted in `use prefix:path`.
pub const IMPORT_PREFIXES: [&str; 6] = ["core", "runtime", "npm", "js", "browser", "base"];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Keyword {
    Fn,
    Macro,
    Struct,
    Return,
    Use,
    As,
    From,
    For,
    If,
    Elif,
    Else,
    Async,
    Await,
    And,
    Or,
    Not,
    In,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Operator {
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    EqualEqual,   // ==
    NotEqual,     // !=
    Greater,      // >
    Less,         // <
    GreaterEqual, // >=
    LessEqual,    // <=

    AndAnd, // &&
    OrOr,   // ||

    Assign,      // =
    PlusAssign,  // +=
    MinusAssign, // -=
    StarAssign,  // *=
    SlashAssign, // /=
    ColonAssign, // :=

    DotDot, // ..
    Bang,   // !
    Dollar, // $
    At,     // @
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum LexicalErrorKind {
    UnterminatedString,
    IllegalCharacter,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenKind {
    EOF,
    Identifier,
    Number,
    String,
    Boolean,
    Keyword(Keyword),
    Operator(Operator),

    Newline,
    Semicolon,

    // Trivia
    Comment,
    Whitespace,

    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,

    Comma,
    Colon,
    Dot,

    Error(LexicalErrorKind),
}

impl TokenKind {
    /// Trivia never reaches the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "Keyword({:?})", keyword),
            TokenKind::Operator(operator) => write!(f, "Operator({:?})", operator),
            TokenKind::Error(error) => write!(f, "Error({:?})", error),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// A classified slice of the source. Tokens borrow their text from the
/// source buffer they were produced from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of file"),
            TokenKind::Newline => write!(f, "newline"),
            _ => write!(f, "{}", self.text),
        }
    }
}

impl Token<'_> {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_operator(&self, operator: Operator) -> bool {
        self.kind == TokenKind::Operator(operator)
    }

    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Number,
            TokenKind::Boolean,
        ]) {
            format!("{} ({})", self.kind, self.text)
        } else {
            format!("{} ()", self.kind)
        }
    }
}

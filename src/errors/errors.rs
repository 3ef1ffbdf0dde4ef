use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::{lexer::tokens::LexicalErrorKind, Span};

/// A recoverable problem found while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } | ErrorImpl::IllegalCharacter { .. } => {
                ErrorCategory::Lexical
            }
            ErrorImpl::ExpectedToken { .. }
            | ErrorImpl::ExpectedExpression { .. }
            | ErrorImpl::MissingSeparator { .. }
            | ErrorImpl::UnterminatedBlock { .. }
            | ErrorImpl::InvalidImportPrefix { .. }
            | ErrorImpl::NestingTooDeep { .. } => ErrorCategory::Syntax,
            ErrorImpl::FieldAfterMethod { .. }
            | ErrorImpl::DuplicateElse
            | ErrorImpl::ElifAfterElse
            | ErrorImpl::InvalidAssignmentTarget { .. } => ErrorCategory::Structural,
        }
    }

    pub fn get_error_name(&self) -> &'static str {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::MissingSeparator { .. } => "MissingSeparator",
            ErrorImpl::UnterminatedBlock { .. } => "UnterminatedBlock",
            ErrorImpl::InvalidImportPrefix { .. } => "InvalidImportPrefix",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::FieldAfterMethod { .. } => "FieldAfterMethod",
            ErrorImpl::DuplicateElse => "DuplicateElse",
            ErrorImpl::ElifAfterElse => "ElifAfterElse",
            ErrorImpl::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => ErrorTip::Suggestion(String::from(
                "Strings must be closed with a matching quote on the same line",
            )),
            ErrorImpl::IllegalCharacter { .. } => ErrorTip::None,
            ErrorImpl::ExpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected {}, found `{}`",
                expected, found
            )),
            ErrorImpl::ExpectedExpression { found } => ErrorTip::Suggestion(format!(
                "Expected an expression, found `{}`",
                found
            )),
            ErrorImpl::MissingSeparator { found } => ErrorTip::Suggestion(format!(
                "Statements end with a newline or `;`, found `{}`",
                found
            )),
            ErrorImpl::UnterminatedBlock { opened_at } => ErrorTip::Suggestion(format!(
                "Block opened at line {} is never closed with `}}`",
                opened_at
            )),
            ErrorImpl::InvalidImportPrefix { prefix } => ErrorTip::Suggestion(format!(
                "Unknown import prefix `{}`, expected one of core, runtime, npm, js, browser, base",
                prefix
            )),
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "Split the expression into smaller pieces with intermediate variables",
            )),
            ErrorImpl::FieldAfterMethod { field } => ErrorTip::Suggestion(format!(
                "Move field `{}` above the first method of the struct",
                field
            )),
            ErrorImpl::DuplicateElse => {
                ErrorTip::Suggestion(String::from("An `if` statement takes at most one `else`"))
            }
            ErrorImpl::ElifAfterElse => {
                ErrorTip::Suggestion(String::from("`elif` clauses must come before `else`"))
            }
            ErrorImpl::InvalidAssignmentTarget { target } => ErrorTip::Suggestion(format!(
                "Only identifiers and member accesses can be assigned to, found {}",
                target
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unterminated string literal: {token:?}")]
    UnterminatedString { token: String },
    #[error("illegal character: {token:?}")]
    IllegalCharacter { token: String },

    // Syntax
    #[error("expected {expected}, found {found:?}")]
    ExpectedToken { expected: String, found: String },
    #[error("expected expression, found {found:?}")]
    ExpectedExpression { found: String },
    #[error("expected statement separator, found {found:?}")]
    MissingSeparator { found: String },
    #[error("unterminated block opened at line {opened_at}")]
    UnterminatedBlock { opened_at: u32 },
    #[error("invalid import prefix {prefix:?}")]
    InvalidImportPrefix { prefix: String },
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    // Structural
    #[error("struct field {field:?} declared after a method")]
    FieldAfterMethod { field: String },
    #[error("multiple else clauses")]
    DuplicateElse,
    #[error("elif clause after else")]
    ElifAfterElse,
    #[error("invalid assignment target: {target}")]
    InvalidAssignmentTarget { target: String },
}

impl ErrorImpl {
    pub fn from_lexical(kind: LexicalErrorKind, token: &str) -> Self {
        match kind {
            LexicalErrorKind::UnterminatedString => ErrorImpl::UnterminatedString {
                token: token.to_string(),
            },
            LexicalErrorKind::IllegalCharacter => ErrorImpl::IllegalCharacter {
                token: token.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic attached to a source range, as handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub name: &'static str,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn warning(
        category: ErrorCategory,
        name: &'static str,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Diagnostic {
            message: message.into(),
            span,
            severity: Severity::Warning,
            category,
            name,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        let notes = match error.get_tip() {
            ErrorTip::None => Vec::new(),
            ErrorTip::Suggestion(tip) => vec![tip],
        };

        Diagnostic {
            message: error.to_string(),
            span: *error.get_span(),
            severity: Severity::Error,
            category: error.category(),
            name: error.get_error_name(),
            notes,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}[{}]: {} ({}:{})",
            level, self.name, self.message, self.span.start.line, self.span.start.column
        )
    }
}

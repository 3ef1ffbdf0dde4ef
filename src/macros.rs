//! Utility macros for the syntax engine.
//!
//! This module defines helper macros used by the lexer and parser:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a classifier for patterns with a fixed kind
//! - `MK_NODE!` - Creates a Node instance
//!
//! These macros reduce boilerplate in the lexer and parser implementations.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$text` - The slice of source the token covers
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42", span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $text:expr, $span:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            text: $text,
            span: $span,
        }
    };
}

/// Creates a classifier for patterns that always produce the same kind.
///
/// # Example
///
/// ```ignore
/// RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Operator(Operator::Plus)));
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |_text: &str| -> $crate::lexer::tokens::TokenKind { $kind }
    };
}

/// Creates a Node instance.
///
/// The literal is optional; children default to none.
///
/// ```ignore
/// let node = MK_NODE!(NodeKind::BinaryExpr, span, vec![left, right], "+");
/// let leaf = MK_NODE!(NodeKind::Identifier, span; "x");
/// ```
#[macro_export]
macro_rules! MK_NODE {
    ($kind:expr, $span:expr, $children:expr) => {
        $crate::ast::ast::Node {
            kind: $kind,
            children: $children,
            span: $span,
            literal: None,
        }
    };
    ($kind:expr, $span:expr, $children:expr, $literal:expr) => {
        $crate::ast::ast::Node {
            kind: $kind,
            children: $children,
            span: $span,
            literal: Some(String::from($literal)),
        }
    };
    ($kind:expr, $span:expr; $literal:expr) => {
        $crate::ast::ast::Node {
            kind: $kind,
            children: Vec::new(),
            span: $span,
            literal: Some(String::from($literal)),
        }
    };
}

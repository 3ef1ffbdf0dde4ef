//! Error types and diagnostics for the syntax engine.
//!
//! Nothing in here aborts a parse. Every problem the lexer or parser runs into
//! is described by an [`errors::Error`], grouped into one of three categories:
//!
//! - Lexical: unterminated strings, illegal characters
//! - Syntax: unexpected or missing tokens, unterminated blocks, bad import prefixes
//! - Structural: misplaced struct fields, extra `else` clauses, bad assignment targets
//!
//! Errors are converted into [`errors::Diagnostic`]s and collected alongside the tree.

pub mod errors;

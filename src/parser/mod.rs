//! Parser module for building the concrete syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a tree of [`crate::ast::ast::Node`]s. It uses a Pratt parser for
//! expressions and recursive descent for statements, and handles:
//!
//! - Statement parsing (declarations, assignments, control flow, imports, structs)
//! - Expression parsing (binary/unary operators, member access, calls, literals)
//! - Statement separators (newline or `;`)
//! - Error recovery and diagnostics
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;

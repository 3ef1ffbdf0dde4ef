//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a lazy stream of tokens for parsing. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line/column tracking for every token
//! - Trivia (whitespace and comments) and lexical error tokens
//!
//! The lexer never fails: anything it cannot classify becomes an error
//! token one character wide.

pub mod lexer;
pub mod tokens;

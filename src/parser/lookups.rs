//! Precedence table and handler registration.
//!
//! The tables are built once per process and only ever read afterwards, so
//! any number of parses can share them across threads.
//!
//! Several expression forms overlap at the start of an expression. They are
//! resolved in this fixed order:
//!
//! 1. `member_access` / `subscript`: postfix `.` and `[`, bound at
//!    `BindingPower::Member` and folded left to right.
//! 2. `await_expression`: the `await` prefix owns everything that binds
//!    tighter than `Unary` to its right.
//! 3. `function_call`: an identifier immediately followed by `(`.
//! 4. `macro_call`: only with a `$` or `@` sigil; a bare `name(...)` is
//!    always a function call.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::ast::Node,
    errors::errors::Error,
    lexer::tokens::{Keyword, LexicalErrorKind, Operator, TokenKind},
};

use super::{expr::*, parser::Parser, stmt::*};

/// Binding strength, weakest first.
///
/// The `binary` tier is split into four sub-tiers so that `*` binds tighter
/// than `+`, which binds tighter than comparisons, which bind tighter than
/// logical operators. `in` sits below `..` so `i in 0..10` reads as
/// `i in (0..10)`. Calls are formed by the identifier prefix handler rather
/// than through the table.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    In,
    Range,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Member,
    Primary,
}

impl BindingPower {
    /// The tier used for the right operand of a right-associative operator,
    /// so that a following operator of the same tier keeps climbing.
    pub fn right_associative(self) -> BindingPower {
        match self {
            BindingPower::Default | BindingPower::Assignment => BindingPower::Default,
            BindingPower::In => BindingPower::Assignment,
            BindingPower::Range => BindingPower::In,
            BindingPower::Logical => BindingPower::Range,
            BindingPower::Relational => BindingPower::Logical,
            BindingPower::Additive => BindingPower::Relational,
            BindingPower::Multiplicative => BindingPower::Additive,
            BindingPower::Unary => BindingPower::Multiplicative,
            BindingPower::Call => BindingPower::Unary,
            BindingPower::Member => BindingPower::Call,
            BindingPower::Primary => BindingPower::Member,
        }
    }
}

pub type StmtHandler = fn(&mut Parser<'_>) -> Result<Node, Error>;
pub type NUDHandler = fn(&mut Parser<'_>) -> Result<Node, Error>;
pub type LEDHandler = fn(&mut Parser<'_>, Node, BindingPower) -> Result<Node, Error>;

// Lookup tables, shared by every parser
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

#[derive(Default)]
pub struct Lookups {
    pub stmt_lookup: StmtLookup,
    pub nud_lookup: NUDLookup,
    pub led_lookup: LEDLookup,
    pub binding_power_lookup: BPLookup,
}

impl Lookups {
    /// Registers a left denotation (infix/postfix) handler.
    fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler.
    fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler keyed on the first token.
    fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn binding_power(&self, kind: &TokenKind) -> Option<BindingPower> {
        self.binding_power_lookup.get(kind).copied()
    }
}

lazy_static! {
    pub static ref LOOKUPS: Lookups = create_token_lookups();
}

pub fn create_token_lookups() -> Lookups {
    let mut lookups = Lookups::default();

    // Membership and ranges
    lookups.led(TokenKind::Keyword(Keyword::In), BindingPower::In, parse_in_expr);
    lookups.led(TokenKind::Operator(Operator::DotDot), BindingPower::Range, parse_range_expr);

    // Logical
    lookups.led(TokenKind::Operator(Operator::AndAnd), BindingPower::Logical, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::OrOr), BindingPower::Logical, parse_binary_expr);
    lookups.led(TokenKind::Keyword(Keyword::And), BindingPower::Logical, parse_binary_expr);
    lookups.led(TokenKind::Keyword(Keyword::Or), BindingPower::Logical, parse_binary_expr);

    // Relational
    lookups.led(TokenKind::Operator(Operator::Less), BindingPower::Relational, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::LessEqual), BindingPower::Relational, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::Greater), BindingPower::Relational, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::GreaterEqual), BindingPower::Relational, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::EqualEqual), BindingPower::Relational, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::NotEqual), BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    lookups.led(TokenKind::Operator(Operator::Plus), BindingPower::Additive, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::Minus), BindingPower::Additive, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::Star), BindingPower::Multiplicative, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::Slash), BindingPower::Multiplicative, parse_binary_expr);
    lookups.led(TokenKind::Operator(Operator::Percent), BindingPower::Multiplicative, parse_binary_expr);

    // Member
    lookups.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);
    lookups.led(TokenKind::LBracket, BindingPower::Member, parse_subscript_expr);

    // Literals and symbols
    lookups.nud(TokenKind::Number, parse_primary_expr);
    lookups.nud(TokenKind::String, parse_primary_expr);
    lookups.nud(TokenKind::Boolean, parse_primary_expr);
    lookups.nud(TokenKind::Identifier, parse_identifier_expr);
    lookups.nud(TokenKind::LBracket, parse_array_expr);
    lookups.nud(TokenKind::LBrace, parse_object_expr);
    lookups.nud(TokenKind::Keyword(Keyword::Fn), parse_lambda_expr);
    lookups.nud(TokenKind::Operator(Operator::Dollar), parse_macro_call_expr);
    lookups.nud(TokenKind::Operator(Operator::At), parse_macro_call_expr);

    // Prefix
    lookups.nud(TokenKind::Keyword(Keyword::Await), parse_await_expr);
    lookups.nud(TokenKind::Operator(Operator::Bang), parse_bang_expr);
    lookups.nud(TokenKind::Keyword(Keyword::Not), parse_bang_expr);

    // Lexical errors occupy the expression slot they appear in
    lookups.nud(TokenKind::Error(LexicalErrorKind::UnterminatedString), parse_lexical_error_expr);
    lookups.nud(TokenKind::Error(LexicalErrorKind::IllegalCharacter), parse_lexical_error_expr);

    // Statements
    lookups.stmt(TokenKind::Keyword(Keyword::Fn), parse_fn_decl_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::Async), parse_fn_decl_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::Macro), parse_macro_decl_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::Struct), parse_struct_decl_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::Use), parse_import_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::For), parse_for_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::If), parse_if_stmt);
    lookups.stmt(TokenKind::Keyword(Keyword::Return), parse_return_stmt);

    lookups
}

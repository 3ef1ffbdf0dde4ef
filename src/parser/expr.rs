use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Diagnostic, Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span, MK_NODE,
};

use super::{
    lookups::{BindingPower, LOOKUPS},
    parser::Parser,
    stmt::parse_block,
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    let depth = parser.depth();
    let result = parse_nested_expr(parser, bp);
    parser.leave_nesting(depth);
    result
}

/// Each prefix handler and each operator folded into `left` takes one
/// nesting level, so the height of the tree built here stays bounded.
fn parse_nested_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    parser.enter_nesting()?;

    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = LOOKUPS.nud_lookup.get(&token_kind) else {
        return parse_missing_expr(parser);
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let Some(next_bp) = LOOKUPS.binding_power(&token_kind) else {
            break;
        };
        if next_bp <= bp {
            break;
        }
        let Some(led_fn) = LOOKUPS.led_lookup.get(&token_kind) else {
            break;
        };

        parser.enter_nesting()?;
        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

/// No expression can start at the current token. Right before a token that
/// closes the surrounding construct the gap is patched with an empty
/// `ErrorNode`; anywhere else the statement is abandoned.
fn parse_missing_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = *parser.current_token();
    let error = Error::new(
        ErrorImpl::ExpectedExpression {
            found: token.to_string(),
        },
        token.span,
    );

    if !parser.at_boundary() {
        return Err(error);
    }

    let mut diagnostic = Diagnostic::from(error);
    if parser.comment_before_current().is_some() {
        diagnostic = diagnostic.with_note("comments are not expressions");
    }
    parser.report_diagnostic(diagnostic);

    Ok(Node::new(
        NodeKind::ErrorNode,
        Span::empty(token.span.start),
        Vec::new(),
    ))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::Number => NodeKind::NumberLit,
        TokenKind::String => NodeKind::StringLit,
        TokenKind::Boolean => NodeKind::BoolLit,
        _ => return Err(parser.unexpected("a literal")),
    };

    let token = parser.advance();
    Ok(MK_NODE!(kind, token.span; token.text))
}

pub fn parse_identifier(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(MK_NODE!(NodeKind::Identifier, token.span; token.text))
}

/// An identifier, or a function call when `(` follows directly.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Node, Error> {
    let identifier = parse_identifier(parser)?;

    if parser.current_token_kind() != TokenKind::LParen {
        return Ok(identifier);
    }

    let (arguments, arguments_span) = parse_arguments(parser)?;
    let span = identifier.span.to(&arguments_span);

    let mut children = vec![identifier];
    children.extend(arguments);

    Ok(MK_NODE!(NodeKind::FunctionCall, span, children))
}

/// `$name(args)` or `@name(args)`.
pub fn parse_macro_call_expr(parser: &mut Parser) -> Result<Node, Error> {
    let sigil = parser.advance();
    let name = parse_identifier(parser)?;

    if parser.current_token_kind() != TokenKind::LParen {
        return Err(parser.unexpected("`(` after macro name"));
    }

    let (arguments, arguments_span) = parse_arguments(parser)?;

    let mut children = vec![name];
    children.extend(arguments);

    Ok(MK_NODE!(
        NodeKind::MacroCall,
        sigil.span.to(&arguments_span),
        children,
        sigil.text
    ))
}

/// Parses `open item (, item)* close`, allowing newlines anywhere inside.
/// Returns the items and the span from `open` to `close`.
pub fn parse_list<'a>(
    parser: &mut Parser<'a>,
    open: TokenKind,
    close: TokenKind,
    expression_list: bool,
    mut item: impl FnMut(&mut Parser<'a>) -> Result<Node, Error>,
) -> Result<(Vec<Node>, Span), Error> {
    let open_token = parser.expect(open)?;

    parser.delimited(close, expression_list, |parser| {
        let mut items = Vec::new();

        parser.skip_newlines();
        if parser.current_token_kind() != close {
            loop {
                items.push(item(parser)?);
                parser.skip_newlines();

                if parser.current_token_kind() != TokenKind::Comma {
                    break;
                }
                parser.advance();
                parser.skip_newlines();
            }
        }

        let close_token = parser.expect(close)?;
        Ok((items, open_token.span.to(&close_token.span)))
    })
}

pub fn parse_arguments(parser: &mut Parser) -> Result<(Vec<Node>, Span), Error> {
    parse_list(parser, TokenKind::LParen, TokenKind::RParen, true, |parser| {
        parse_expr(parser, BindingPower::Default)
    })
}

pub fn parse_parameter_list(parser: &mut Parser) -> Result<Node, Error> {
    let (parameters, span) = parse_list(
        parser,
        TokenKind::LParen,
        TokenKind::RParen,
        false,
        parse_identifier,
    )?;

    Ok(MK_NODE!(NodeKind::ParameterList, span, parameters))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Node, Error> {
    let (elements, span) = parse_list(parser, TokenKind::LBracket, TokenKind::RBracket, true, |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(MK_NODE!(NodeKind::ArrayLit, span, elements))
}

pub fn parse_object_expr(parser: &mut Parser) -> Result<Node, Error> {
    let (entries, span) = parse_list(
        parser,
        TokenKind::LBrace,
        TokenKind::RBrace,
        true,
        parse_key_value_pair,
    )?;

    Ok(MK_NODE!(NodeKind::ObjectLit, span, entries))
}

fn parse_key_value_pair(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() != TokenKind::String {
        return Err(parser.unexpected("a string key"));
    }
    let key = parse_primary_expr(parser)?;

    parser.expect(TokenKind::Colon)?;
    parser.skip_newlines();

    let value = parse_expr(parser, BindingPower::Default)?;
    let span = key.span.to(&value.span);

    Ok(MK_NODE!(NodeKind::KeyValuePair, span, vec![key, value]))
}

/// `fn(params) { body }`
pub fn parse_lambda_expr(parser: &mut Parser) -> Result<Node, Error> {
    let fn_token = parser.advance();
    let parameters = parse_parameter_list(parser)?;
    let body = parse_block(parser)?;

    let span = fn_token.span.to(&body.span);
    Ok(MK_NODE!(NodeKind::Lambda, span, vec![parameters, body]))
}

pub fn parse_await_expr(parser: &mut Parser) -> Result<Node, Error> {
    let await_token = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = await_token.span.to(&operand.span);
    Ok(MK_NODE!(NodeKind::AwaitExpr, span, vec![operand]))
}

/// `!expr` and `not expr`
pub fn parse_bang_expr(parser: &mut Parser) -> Result<Node, Error> {
    let operator_token = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = operator_token.span.to(&operand.span);
    Ok(MK_NODE!(
        NodeKind::UnaryBang,
        span,
        vec![operand],
        operator_token.text
    ))
}

/// A token the lexer could not classify stands in for the expression it
/// interrupts.
pub fn parse_lexical_error_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.advance();
    if let TokenKind::Error(kind) = token.kind {
        parser.report(Error::new(
            ErrorImpl::from_lexical(kind, token.text),
            token.span,
        ));
    }

    Ok(Node::new(NodeKind::ErrorNode, token.span, Vec::new()))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    let operator_token = parser.advance();
    parser.skip_newlines();

    let right = parse_expr(parser, bp)?;

    let span = left.span.to(&right.span);
    Ok(MK_NODE!(
        NodeKind::BinaryExpr,
        span,
        vec![left, right],
        operator_token.text
    ))
}

/// `a in b`, left-associative.
pub fn parse_in_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    parser.advance();
    parser.skip_newlines();

    let right = parse_expr(parser, bp)?;

    let span = left.span.to(&right.span);
    Ok(MK_NODE!(NodeKind::InExpr, span, vec![left, right]))
}

/// `a..b`, right-associative: `a..b..c` is `a..(b..c)`.
pub fn parse_range_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    parser.advance();
    parser.skip_newlines();

    let right = parse_expr(parser, bp.right_associative())?;

    let span = left.span.to(&right.span);
    Ok(MK_NODE!(NodeKind::RangeExpr, span, vec![left, right]))
}

pub fn parse_member_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    parser.advance();
    parser.skip_newlines();

    let member = parse_expr(parser, bp)?;

    let span = left.span.to(&member.span);
    Ok(MK_NODE!(NodeKind::MemberAccess, span, vec![left, member]))
}

pub fn parse_subscript_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    parser.advance();

    parser.delimited(TokenKind::RBracket, true, |parser| {
        parser.skip_newlines();
        let index = parse_expr(parser, BindingPower::Default)?;
        parser.skip_newlines();

        let close = parser.expect(TokenKind::RBracket)?;

        let span = left.span.to(&close.span);
        Ok(MK_NODE!(NodeKind::Subscript, span, vec![left, index]))
    })
}

use log::trace;

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Keyword, Operator, TokenKind, IMPORT_PREFIXES},
    MK_NODE,
};

use super::{
    expr::{parse_expr, parse_identifier, parse_list, parse_parameter_list, parse_primary_expr},
    lookups::{BindingPower, LOOKUPS},
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let token = *parser.current_token();
    trace!(
        "statement at {}:{} starting with {}",
        token.span.start.line,
        token.span.start.column,
        token.kind
    );

    if let Some(stmt_fn) = LOOKUPS.stmt_lookup.get(&token.kind) {
        return stmt_fn(parser);
    }

    parse_assignment_or_expression_stmt(parser)
}

/// `{ statements }`. A block left open at the end of input is reported once
/// and comes back as an `ErrorNode` holding the statements parsed so far.
pub fn parse_block(parser: &mut Parser) -> Result<Node, Error> {
    let depth = parser.depth();
    let result = parse_nested_block(parser);
    parser.leave_nesting(depth);
    result
}

fn parse_nested_block(parser: &mut Parser) -> Result<Node, Error> {
    parser.enter_nesting()?;
    let open = parser.expect(TokenKind::LBrace)?;

    let body = parser.delimited(TokenKind::RBrace, false, |parser| {
        Ok(parser.parse_statement_list(true))
    })?;

    if parser.current_token_kind() == TokenKind::RBrace {
        let close = parser.advance();
        return Ok(MK_NODE!(NodeKind::Block, open.span.to(&close.span), body));
    }

    parser.report(Error::new(
        ErrorImpl::UnterminatedBlock {
            opened_at: open.span.start.line,
        },
        open.span,
    ));

    Ok(Node::new(
        NodeKind::ErrorNode,
        parser.span_from(open.span.start),
        body,
    ))
}

/// Assignments, compound assignments and constant declarations all start
/// with an expression; the operator after it decides which one this is.
pub fn parse_assignment_or_expression_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let target = parse_expr(parser, BindingPower::Assignment)?;

    let (kind, operator) = match parser.current_token_kind() {
        TokenKind::Operator(Operator::Assign) => (NodeKind::VariableAssign, None),
        TokenKind::Operator(Operator::ColonAssign) => (NodeKind::ConstantDecl, None),
        TokenKind::Operator(
            Operator::PlusAssign | Operator::MinusAssign | Operator::StarAssign | Operator::SlashAssign,
        ) => (NodeKind::CompoundAssign, Some(parser.current_token().text)),
        _ => {
            let span = target.span;
            return Ok(MK_NODE!(NodeKind::ExpressionStmt, span, vec![target]));
        }
    };

    parser.advance();
    let value = parse_expr(parser, BindingPower::Assignment)?;

    let target = check_assignment_target(parser, target, kind);
    let span = target.span.to(&value.span);

    Ok(match operator {
        Some(operator) => MK_NODE!(kind, span, vec![target, value], operator),
        None => MK_NODE!(kind, span, vec![target, value]),
    })
}

fn check_assignment_target(parser: &mut Parser, target: Node, kind: NodeKind) -> Node {
    let valid = match kind {
        NodeKind::ConstantDecl => target.is(NodeKind::Identifier),
        _ => is_member_path(&target),
    };

    if valid || target.is_error() {
        return target;
    }

    parser.report(Error::new(
        ErrorImpl::InvalidAssignmentTarget {
            target: target.kind.to_string(),
        },
        target.span,
    ));
    Node::error_wrapping(target)
}

/// `name` or `name.field.field...`: every member access has a path on its
/// left and a plain identifier on its right.
fn is_member_path(node: &Node) -> bool {
    match node.kind {
        NodeKind::Identifier => true,
        NodeKind::MemberAccess => match node.children.as_slice() {
            [object, member] => member.is(NodeKind::Identifier) && is_member_path(object),
            _ => false,
        },
        _ => false,
    }
}

/// `fn name(params) { body }`, `async fn name...` or `fn async name...`.
/// A `fn` directly followed by `(` is a lambda used as an expression.
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::Keyword(Keyword::Fn)
        && parser.peek(1).kind == TokenKind::LParen
    {
        return parse_assignment_or_expression_stmt(parser);
    }

    parse_fn_decl(parser)
}

pub fn parse_fn_decl(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.current_token().span.start;
    let mut is_async = false;

    if parser.current_token_kind() == TokenKind::Keyword(Keyword::Async) {
        parser.advance();
        is_async = true;
    }

    parser.expect(TokenKind::Keyword(Keyword::Fn))?;

    if !is_async && parser.current_token_kind() == TokenKind::Keyword(Keyword::Async) {
        parser.advance();
        is_async = true;
    }

    let name = parse_identifier(parser)?;
    let parameters = parse_parameter_list(parser)?;
    let body = parse_block(parser)?;

    let span = parser.span_from(start);
    let children = vec![name, parameters, body];

    if is_async {
        Ok(MK_NODE!(NodeKind::FunctionDecl, span, children, "async"))
    } else {
        Ok(MK_NODE!(NodeKind::FunctionDecl, span, children))
    }
}

pub fn parse_macro_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let macro_token = parser.advance();

    let name = parse_identifier(parser)?;
    let parameters = parse_parameter_list(parser)?;
    let body = parse_block(parser)?;

    let span = macro_token.span.to(&body.span);
    Ok(MK_NODE!(NodeKind::MacroDecl, span, vec![name, parameters, body]))
}

/// `struct Name { fields... methods... }`
///
/// Fields are `name = default` and must all come before the first method.
pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let struct_token = parser.advance();
    let name = parse_identifier(parser)?;
    let open = parser.expect(TokenKind::LBrace)?;

    let members = parser.delimited(TokenKind::RBrace, false, |parser| {
        let mut members = Vec::new();
        let mut seen_method = false;

        loop {
            parser.skip_separators();

            match parser.current_token_kind() {
                TokenKind::RBrace => break,
                TokenKind::EOF => {
                    return Err(Error::new(
                        ErrorImpl::UnterminatedBlock {
                            opened_at: open.span.start.line,
                        },
                        open.span,
                    ))
                }
                TokenKind::Keyword(Keyword::Fn) | TokenKind::Keyword(Keyword::Async) => {
                    members.push(parse_fn_decl(parser)?);
                    seen_method = true;
                }
                TokenKind::Identifier => {
                    let field = parse_struct_field(parser)?;

                    if seen_method {
                        parser.report(Error::new(
                            ErrorImpl::FieldAfterMethod {
                                field: field.name().unwrap_or_default().to_string(),
                            },
                            field.span,
                        ));
                        members.push(Node::error_wrapping(field));
                    } else {
                        members.push(field);
                    }
                }
                _ => return Err(parser.unexpected("a struct field or method")),
            }

            if !parser.at_statement_end() {
                return Err(parser.missing_separator());
            }
        }

        Ok(members)
    })?;

    let close = parser.expect(TokenKind::RBrace)?;

    let mut children = vec![name];
    children.extend(members);

    Ok(MK_NODE!(
        NodeKind::StructDecl,
        struct_token.span.to(&close.span),
        children
    ))
}

fn parse_struct_field(parser: &mut Parser) -> Result<Node, Error> {
    let name = parse_identifier(parser)?;
    parser.expect(TokenKind::Operator(Operator::Assign))?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = name.span.to(&value.span);
    Ok(MK_NODE!(NodeKind::StructField, span, vec![name, value]))
}

/// `use prefix:path [as alias]` or `use {names} from prefix:path`
pub fn parse_import_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let use_token = parser.advance();
    let mut children = Vec::new();

    if parser.current_token_kind() == TokenKind::LBrace {
        let (names, names_span) = parse_list(
            parser,
            TokenKind::LBrace,
            TokenKind::RBrace,
            false,
            parse_identifier,
        )?;

        if names.is_empty() {
            return Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: String::from("at least one imported name"),
                    found: String::from("}"),
                },
                names_span,
            ));
        }

        parser.expect(TokenKind::Keyword(Keyword::From))?;

        children.extend(names);
        children.push(parse_import_path(parser)?);
    } else {
        children.push(parse_import_path(parser)?);

        if parser.current_token_kind() == TokenKind::Keyword(Keyword::As) {
            parser.advance();
            children.push(parse_identifier(parser)?);
        }
    }

    let span = parser.span_from(use_token.span.start);
    Ok(MK_NODE!(NodeKind::ImportStmt, span, children))
}

/// `prefix:segment(.segment)*` or `prefix:"url"`
fn parse_import_path(parser: &mut Parser) -> Result<Node, Error> {
    let prefix = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;

    let segments = if parser.current_token_kind() == TokenKind::String {
        vec![parse_primary_expr(parser)?]
    } else {
        let mut segments = vec![parse_identifier(parser)?];
        while parser.current_token_kind() == TokenKind::Dot {
            parser.advance();
            segments.push(parse_identifier(parser)?);
        }
        segments
    };

    let path = MK_NODE!(
        NodeKind::ImportPath,
        parser.span_from(prefix.span.start),
        segments,
        prefix.text
    );

    if !IMPORT_PREFIXES.contains(&prefix.text) {
        parser.report(Error::new(
            ErrorImpl::InvalidImportPrefix {
                prefix: prefix.text.to_string(),
            },
            prefix.span,
        ));
        return Ok(Node::error_wrapping(path));
    }

    Ok(path)
}

/// `for expr { body }`; the controlling expression is kept as written.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let for_token = parser.advance();
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    let span = for_token.span.to(&body.span);
    Ok(MK_NODE!(NodeKind::ForStmt, span, vec![condition, body]))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let if_token = parser.advance();
    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    let mut children = vec![condition, body];
    let mut seen_else = false;

    loop {
        let is_else = match parser.peek_past_newlines() {
            TokenKind::Keyword(Keyword::Elif) => false,
            TokenKind::Keyword(Keyword::Else) => true,
            _ => break,
        };
        parser.skip_newlines();

        let clause_token = parser.advance();
        let clause = if is_else {
            let body = parse_block(parser)?;
            let span = clause_token.span.to(&body.span);
            MK_NODE!(NodeKind::ElseClause, span, vec![body])
        } else {
            let condition = parse_expr(parser, BindingPower::Default)?;
            let body = parse_block(parser)?;
            let span = clause_token.span.to(&body.span);
            MK_NODE!(NodeKind::ElifClause, span, vec![condition, body])
        };

        if seen_else {
            let error_impl = if is_else {
                ErrorImpl::DuplicateElse
            } else {
                ErrorImpl::ElifAfterElse
            };
            parser.report(Error::new(error_impl, clause_token.span));
            children.push(Node::error_wrapping(clause));
        } else {
            children.push(clause);
        }

        seen_else |= is_else;
    }

    let span = parser.span_from(if_token.span.start);
    Ok(MK_NODE!(NodeKind::IfStmt, span, children))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let return_token = parser.advance();

    if parser.at_statement_end() {
        return Ok(MK_NODE!(NodeKind::ReturnStmt, return_token.span, Vec::new()));
    }

    let value = parse_expr(parser, BindingPower::Default)?;

    let span = return_token.span.to(&value.span);
    Ok(MK_NODE!(NodeKind::ReturnStmt, span, vec![value]))
}

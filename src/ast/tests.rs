//! Unit tests for the node model and its renderings.

use crate::{
    ast::ast::{Node, NodeKind},
    parse, Position, Span, MK_NODE,
};

fn span(start: u32, end: u32) -> Span {
    Span::new(
        Position {
            offset: start,
            line: 1,
            column: start + 1,
        },
        Position {
            offset: end,
            line: 1,
            column: end + 1,
        },
    )
}

#[test]
fn test_node_kind_names() {
    assert_eq!(NodeKind::SourceFile.name(), "source_file");
    assert_eq!(NodeKind::KeyValuePair.to_string(), "key_value_pair");
    assert_eq!(NodeKind::ErrorNode.name(), "ERROR");
    assert!(NodeKind::IfStmt.is_statement());
    assert!(!NodeKind::ElifClause.is_statement());
    assert_eq!(NodeKind::BinaryExpr.fixed_arity(), Some(2));
    assert_eq!(NodeKind::Block.fixed_arity(), None);
}

#[test]
fn test_to_sexp() {
    let node = MK_NODE!(
        NodeKind::BinaryExpr,
        span(0, 5),
        vec![
            MK_NODE!(NodeKind::NumberLit, span(0, 1); "1"),
            MK_NODE!(NodeKind::Identifier, span(4, 5); "x"),
        ],
        "+"
    );

    assert_eq!(node.to_sexp(), "(binary_expr + (number_lit 1) (identifier x))");
}

#[test]
fn test_to_pretty_sexp() {
    let result = parse("x = 1");

    assert_eq!(
        result.root.to_pretty_sexp(),
        "(source_file [1:1 - 1:6]\n  (variable_assign [1:1 - 1:6]\n    (identifier [1:1 - 1:2] \"x\")\n    (number_lit [1:5 - 1:6] \"1\")))\n"
    );
}

#[test]
fn test_error_wrapping() {
    let inner = MK_NODE!(NodeKind::NumberLit, span(2, 3); "1");
    let wrapped = Node::error_wrapping(inner.clone());

    assert!(wrapped.is_error());
    assert_eq!(wrapped.span, inner.span);
    assert_eq!(wrapped.children, vec![inner]);
    assert!(wrapped.contains_errors());
}

#[test]
fn test_walk_is_pre_order() {
    let result = parse("a = b + c");
    let kinds: Vec<NodeKind> = result.root.walk().map(|node| node.kind).collect();

    assert_eq!(
        kinds,
        vec![
            NodeKind::SourceFile,
            NodeKind::VariableAssign,
            NodeKind::Identifier,
            NodeKind::BinaryExpr,
            NodeKind::Identifier,
            NodeKind::Identifier,
        ]
    );
}

#[test]
fn test_find_all_and_leaves() {
    let source = "fn f(a) { return a }\nf(1)\n";
    let result = parse(source);

    let identifiers: Vec<&str> = result
        .root
        .find_all(NodeKind::Identifier)
        .into_iter()
        .filter_map(Node::literal)
        .collect();
    assert_eq!(identifiers, vec!["f", "a", "a", "f"]);

    let leaves: Vec<&str> = result.root.leaves().map(|leaf| leaf.text(source)).collect();
    assert_eq!(leaves, vec!["f", "a", "a", "f", "1"]);
}

#[test]
fn test_declaration_names() {
    let result = parse("struct P { x = 1 }\nmacro m() {}\ny := 2\n");
    let names: Vec<Option<&str>> = result.root.children.iter().map(Node::name).collect();

    assert_eq!(names, vec![Some("P"), Some("m"), Some("y")]);
    assert_eq!(result.root.children[0].children[1].name(), Some("x"));
}

#[test]
fn test_node_text() {
    let source = "total = price * 2\n";
    let result = parse(source);
    let value = &result.root.children[0].children[1];

    assert_eq!(value.text(source), "price * 2");
}

#[test]
fn test_node_serializes() {
    let result = parse("x = 1");
    let json = serde_json::to_value(&result.root).unwrap();

    assert_eq!(json["kind"], "SourceFile");
    assert_eq!(json["children"][0]["kind"], "VariableAssign");
    assert_eq!(json["children"][0]["children"][0]["literal"], "x");
    assert!(json["children"][0].get("literal").is_none());
}

//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Operator precedence and associativity
//! - Assignments, constants and declarations
//! - Structs, imports and control flow
//! - Statement separators and error recovery

use rstest::rstest;

use crate::{
    ast::ast::NodeKind,
    errors::errors::{ErrorCategory, Severity},
    parse, parse_with_options, ParseOptions, ParseResult,
};

fn sexp(source: &str) -> String {
    parse(source).root.to_sexp()
}

/// The expression of the first (expression) statement.
fn expr_sexp(source: &str) -> String {
    let result = parse(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let stmt = &result.root.children[0];
    assert_eq!(stmt.kind, NodeKind::ExpressionStmt);
    stmt.children[0].to_sexp()
}

fn names(result: &ParseResult) -> Vec<&'static str> {
    result.diagnostics.iter().map(|d| d.name).collect()
}

#[rstest]
#[case("1 + 2 * 3", "(binary_expr + (number_lit 1) (binary_expr * (number_lit 2) (number_lit 3)))")]
#[case("1 * 2 + 3", "(binary_expr + (binary_expr * (number_lit 1) (number_lit 2)) (number_lit 3))")]
#[case("1 - 2 - 3", "(binary_expr - (binary_expr - (number_lit 1) (number_lit 2)) (number_lit 3))")]
#[case("a < b and c", "(binary_expr and (binary_expr < (identifier a) (identifier b)) (identifier c))")]
#[case("a == b || c != d", "(binary_expr || (binary_expr == (identifier a) (identifier b)) (binary_expr != (identifier c) (identifier d)))")]
#[case("a.b.c", "(member_access (member_access (identifier a) (identifier b)) (identifier c))")]
#[case("a..b..c", "(range_expr (identifier a) (range_expr (identifier b) (identifier c)))")]
#[case("i in 0..10", "(in_expr (identifier i) (range_expr (number_lit 0) (number_lit 10)))")]
#[case("a.b[c].d", "(member_access (subscript (member_access (identifier a) (identifier b)) (identifier c)) (identifier d))")]
#[case("not a and b", "(binary_expr and (unary_bang not (identifier a)) (identifier b))")]
#[case("!x", "(unary_bang ! (identifier x))")]
#[case("await f(x)", "(await_expr (function_call (identifier f) (identifier x)))")]
#[case("await a.b + 1", "(binary_expr + (await_expr (member_access (identifier a) (identifier b))) (number_lit 1))")]
fn test_expression_precedence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexp(source), expected);
}

#[rstest]
#[case("f(1)", "(function_call (identifier f) (number_lit 1))")]
#[case("f()", "(function_call (identifier f))")]
#[case("$log(1, 2)", "(macro_call $ (identifier log) (number_lit 1) (number_lit 2))")]
#[case("@html(x)", "(macro_call @ (identifier html) (identifier x))")]
#[case("a.b(1)", "(member_access (identifier a) (function_call (identifier b) (number_lit 1)))")]
#[case("[1, \"a\", true]", "(array_lit (number_lit 1) (string_lit \"a\") (bool_lit true))")]
#[case("{\"a\": 1, 'b': [2]}", "(object_lit (key_value_pair (string_lit \"a\") (number_lit 1)) (key_value_pair (string_lit 'b') (array_lit (number_lit 2))))")]
#[case("fn(x) { return x }", "(lambda (parameter_list (identifier x)) (block (return_stmt (identifier x))))")]
#[case("xs[0]", "(subscript (identifier xs) (number_lit 0))")]
fn test_expression_forms(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(expr_sexp(source), expected);
}

#[test]
fn test_newlines_inside_delimiters_and_after_operators() {
    assert_eq!(
        expr_sexp("f(\n  1,\n  2\n)"),
        "(function_call (identifier f) (number_lit 1) (number_lit 2))"
    );
    assert_eq!(
        expr_sexp("1 +\n 2"),
        "(binary_expr + (number_lit 1) (number_lit 2))"
    );
    assert_eq!(
        expr_sexp("{\n  \"a\":\n 1\n}"),
        "(object_lit (key_value_pair (string_lit \"a\") (number_lit 1)))"
    );
}

#[test]
fn test_constant_and_variable_are_distinct() {
    let constant = parse("x := 5\n");
    let variable = parse("x = 5\n");

    assert_eq!(
        constant.root.to_sexp(),
        "(source_file (constant_decl (identifier x) (number_lit 5)))"
    );
    assert_eq!(
        variable.root.to_sexp(),
        "(source_file (variable_assign (identifier x) (number_lit 5)))"
    );
    assert_eq!(
        constant.root.children[0].children.len(),
        variable.root.children[0].children.len()
    );
}

#[rstest]
#[case("x += 1", "+=")]
#[case("x -= 1", "-=")]
#[case("x *= 1", "*=")]
#[case("x /= 1", "/=")]
fn test_compound_assign(#[case] source: &str, #[case] operator: &str) {
    let result = parse(source);
    let stmt = &result.root.children[0];

    assert!(result.diagnostics.is_empty());
    assert_eq!(stmt.kind, NodeKind::CompoundAssign);
    assert_eq!(stmt.literal(), Some(operator));
}

#[test]
fn test_member_assignment() {
    assert_eq!(
        sexp("a.b = 1"),
        "(source_file (variable_assign (member_access (identifier a) (identifier b)) (number_lit 1)))"
    );
}

#[test]
fn test_invalid_assignment_target() {
    let result = parse("1 = 2\n");
    assert_eq!(names(&result), vec!["InvalidAssignmentTarget"]);
    assert_eq!(result.diagnostics[0].category, ErrorCategory::Structural);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (variable_assign (ERROR (number_lit 1)) (number_lit 2)))"
    );

    let result = parse("a.b := 1\n");
    assert_eq!(names(&result), vec!["InvalidAssignmentTarget"]);
    assert_eq!(result.root.children[0].kind, NodeKind::ConstantDecl);
}

#[rstest]
#[case("a.1 = 2\n")]
#[case("f().x = 1\n")]
#[case("a[0].b = 1\n")]
#[case("a.b() = 1\n")]
#[case("a.[1] += 2\n")]
fn test_invalid_member_assignment_target(#[case] source: &str) {
    let result = parse(source);

    assert_eq!(names(&result), vec!["InvalidAssignmentTarget"]);
    assert!(result.root.children[0].children[0].is_error());
}

#[test]
fn test_member_path_targets() {
    let result = parse("a.b.c = 1\na.b += 2\nf().x\n");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.root.children[0].kind, NodeKind::VariableAssign);
    assert_eq!(result.root.children[1].kind, NodeKind::CompoundAssign);
    assert_eq!(
        result.root.children[2].to_sexp(),
        "(expression_stmt (member_access (function_call (identifier f)) (identifier x)))"
    );
}

#[test]
fn test_function_declarations() {
    assert_eq!(
        sexp("fn add(a, b) { return a + b }"),
        "(source_file (function_decl (identifier add) (parameter_list (identifier a) (identifier b)) (block (return_stmt (binary_expr + (identifier a) (identifier b))))))"
    );

    for source in ["async fn f() {}", "fn async f() {}"] {
        let result = parse(source);
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result.root.to_sexp(),
            "(source_file (function_decl async (identifier f) (parameter_list) (block)))"
        );
        assert!(result.root.children[0].is_async());
    }
}

#[test]
fn test_macro_declaration() {
    assert_eq!(
        sexp("macro log(msg) {\n  print(msg)\n}\n"),
        "(source_file (macro_decl (identifier log) (parameter_list (identifier msg)) (block (expression_stmt (function_call (identifier print) (identifier msg))))))"
    );
}

#[test]
fn test_lambda_statements() {
    assert_eq!(
        sexp("f := fn(x) { return x }"),
        "(source_file (constant_decl (identifier f) (lambda (parameter_list (identifier x)) (block (return_stmt (identifier x))))))"
    );
    assert_eq!(
        sexp("fn() {}"),
        "(source_file (expression_stmt (lambda (parameter_list) (block))))"
    );
}

#[test]
fn test_return_without_value() {
    assert_eq!(
        sexp("fn f() { return }"),
        "(source_file (function_decl (identifier f) (parameter_list) (block (return_stmt))))"
    );
}

#[test]
fn test_import_with_alias() {
    let result = parse("use core:math as m\n");
    let import = &result.root.children[0];

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (import_stmt (import_path core (identifier math)) (identifier m)))"
    );
    assert_eq!(import.import_path().and_then(|p| p.literal()), Some("core"));
    assert_eq!(import.import_alias(), Some("m"));
}

#[test]
fn test_import_forms() {
    let result = parse("use {add, sub} from core:math.utils");
    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (import_stmt (identifier add) (identifier sub) (import_path core (identifier math) (identifier utils))))"
    );
    assert_eq!(result.root.children[0].import_names(), vec!["add", "sub"]);

    assert_eq!(
        sexp("use npm:\"https://cdn.example.com/lib.js\""),
        "(source_file (import_stmt (import_path npm (string_lit \"https://cdn.example.com/lib.js\"))))"
    );
}

#[test]
fn test_invalid_import_prefix() {
    let result = parse("use std:math\n");

    assert_eq!(names(&result), vec!["InvalidImportPrefix"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (import_stmt (ERROR (import_path std (identifier math)))))"
    );
    assert!(result.root.children[0].import_path().is_some());
}

#[test]
fn test_empty_import_list() {
    let result = parse("use {} from core:math\nx = 1\n");

    assert_eq!(names(&result), vec!["ExpectedToken"]);
    assert_eq!(result.root.children.len(), 2);
    assert!(result.root.children[0].is_error());
}

#[test]
fn test_struct_fields_then_methods() {
    let result = parse("struct P { name = \"\" \n fn greet() { return name } }");

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (struct_decl (identifier P) (struct_field (identifier name) (string_lit \"\")) (function_decl (identifier greet) (parameter_list) (block (return_stmt (identifier name))))))"
    );
}

#[test]
fn test_struct_field_after_method() {
    let result = parse("struct P { fn greet() { return 1 }\n name = \"\" }");
    let decl = &result.root.children[0];

    assert_eq!(names(&result), vec!["FieldAfterMethod"]);
    assert_eq!(result.diagnostics[0].category, ErrorCategory::Structural);
    assert_eq!(decl.kind, NodeKind::StructDecl);
    assert_eq!(decl.children[1].kind, NodeKind::FunctionDecl);
    assert!(decl.children[2].is_error());
    assert_eq!(decl.children[2].children[0].kind, NodeKind::StructField);
}

#[test]
fn test_unterminated_struct() {
    let result = parse("struct P {\n  a = 1\n");

    assert_eq!(names(&result), vec!["UnterminatedBlock"]);
    assert_eq!(result.root.to_sexp(), "(source_file (ERROR))");
}

#[test]
fn test_if_elif_else() {
    let expected = "(source_file (if_stmt (identifier a) (block (expression_stmt (identifier x))) (elif_clause (identifier b) (block (expression_stmt (identifier y)))) (else_clause (block (expression_stmt (identifier z))))))";

    assert_eq!(sexp("if a { x } elif b { y } else { z }"), expected);
    assert_eq!(
        sexp("if a {\n  x\n}\nelif b {\n  y\n}\n\nelse {\n  z\n}\n"),
        expected
    );
}

#[test]
fn test_if_followed_by_statement() {
    assert_eq!(
        sexp("if a { x }\ny = 1\n"),
        "(source_file (if_stmt (identifier a) (block (expression_stmt (identifier x)))) (variable_assign (identifier y) (number_lit 1)))"
    );
}

#[test]
fn test_duplicate_else() {
    let result = parse("if a {} else {} else {}");
    let stmt = &result.root.children[0];

    assert_eq!(names(&result), vec!["DuplicateElse"]);
    assert_eq!(stmt.children[2].kind, NodeKind::ElseClause);
    assert!(stmt.children[3].is_error());
}

#[test]
fn test_elif_after_else() {
    let result = parse("if a {} else {} elif b {}");

    assert_eq!(names(&result), vec!["ElifAfterElse"]);
    assert_eq!(
        result.root.children[0].children[3].children[0].kind,
        NodeKind::ElifClause
    );
}

#[test]
fn test_for_statement() {
    assert_eq!(
        sexp("for i in 0..10 { print(i) }"),
        "(source_file (for_stmt (in_expr (identifier i) (range_expr (number_lit 0) (number_lit 10))) (block (expression_stmt (function_call (identifier print) (identifier i))))))"
    );
}

#[test]
fn test_separators_collapse() {
    let result = parse("a; b\n\n;c;\n");

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (expression_stmt (identifier a)) (expression_stmt (identifier b)) (expression_stmt (identifier c)))"
    );
}

#[test]
fn test_missing_separator() {
    let result = parse("a b\nc\n");

    assert_eq!(names(&result), vec!["MissingSeparator"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (expression_stmt (identifier a)) (ERROR) (expression_stmt (identifier c)))"
    );
}

#[test]
fn test_unterminated_block() {
    let result = parse("if x { \n");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].name, "UnterminatedBlock");
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (if_stmt (identifier x) (ERROR)))"
    );
}

#[test]
fn test_nested_unterminated_block() {
    let result = parse("fn f() {\n  if x {\n    y\n  }\n");

    assert_eq!(names(&result), vec!["UnterminatedBlock"]);
    assert_eq!(result.diagnostics[0].span.start.line, 1);
}

#[test]
fn test_recovery_resumes_at_next_statement() {
    let result = parse("x = )\ny = 2\n");

    assert_eq!(names(&result), vec!["ExpectedExpression"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (ERROR) (variable_assign (identifier y) (number_lit 2)))"
    );
    assert_eq!(result.root.children[0].text("x = )\ny = 2\n"), "x = )");
}

#[test]
fn test_recovery_inside_block() {
    let result = parse("fn f() {\n  x = )\n  y = 1\n}\nz = 2\n");

    assert_eq!(names(&result), vec!["ExpectedExpression"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (function_decl (identifier f) (parameter_list) (block (ERROR) (variable_assign (identifier y) (number_lit 1)))) (variable_assign (identifier z) (number_lit 2)))"
    );
}

#[test]
fn test_recovery_does_not_eat_enclosing_brace() {
    let result = parse("if a { f(1 }\nb\n");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (if_stmt (identifier a) (block (ERROR))) (expression_stmt (identifier b)))"
    );
}

#[test]
fn test_missing_expression_before_closer() {
    let result = parse("xs = [1,]\n");

    assert_eq!(names(&result), vec!["ExpectedExpression"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (variable_assign (identifier xs) (array_lit (number_lit 1) (ERROR))))"
    );
}

#[test]
fn test_lexical_errors_in_expressions() {
    let result = parse("x = \"abc\ny = 1\n");
    assert_eq!(names(&result), vec!["UnterminatedString"]);
    assert_eq!(result.diagnostics[0].category, ErrorCategory::Lexical);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (variable_assign (identifier x) (ERROR)) (variable_assign (identifier y) (number_lit 1)))"
    );

    let result = parse("x = 1 # 2\n");
    assert_eq!(names(&result), vec!["IllegalCharacter"]);
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (variable_assign (identifier x) (number_lit 1)) (ERROR))"
    );
}

#[test]
fn test_comments_are_trivia() {
    let result = parse("// header\nx = 1 // trailing\n// footer\n");

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (variable_assign (identifier x) (number_lit 1)))"
    );
}

#[test]
fn test_comment_in_argument_list_warns() {
    let source = "f(1, // one\n  2)\n";

    let result = parse(source);
    assert_eq!(names(&result), vec!["CommentInExpression"]);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert!(!result.has_errors());
    assert_eq!(
        result.root.to_sexp(),
        "(source_file (expression_stmt (function_call (identifier f) (number_lit 1) (number_lit 2))))"
    );

    let quiet = parse_with_options(
        source,
        &ParseOptions {
            report_comment_expressions: false,
        },
    );
    assert!(quiet.diagnostics.is_empty());
}

#[test]
fn test_each_comment_line_in_list_warns() {
    let result = parse("f(1, // one\n  // two\n  2)\n");

    assert_eq!(names(&result), vec!["CommentInExpression", "CommentInExpression"]);
    assert_eq!(result.diagnostics[0].span.start.line, 1);
    assert_eq!(result.diagnostics[1].span.start.line, 2);
}

#[test]
fn test_comment_where_expression_expected() {
    let result = parse("x = // not a value");

    assert_eq!(names(&result), vec!["ExpectedExpression"]);
    assert!(result.diagnostics[0]
        .notes
        .iter()
        .any(|note| note == "comments are not expressions"));
}

#[test]
fn test_diagnostics_are_ordered() {
    let result = parse("a = )\nb = 1\nc = )\n");
    let lines: Vec<u32> = result.diagnostics.iter().map(|d| d.span.start.line).collect();

    assert_eq!(lines, vec![1, 3]);
}

#[test]
fn test_spans() {
    let result = parse("x = 1\nfoo(bar)\n");
    let assign = &result.root.children[0];
    let call = &result.root.children[1].children[0];

    assert_eq!(assign.span.start.offset, 0);
    assert_eq!(assign.span.end.offset, 5);
    assert_eq!(call.span.start.line, 2);
    assert_eq!(call.span.start.column, 1);
    assert_eq!(call.span.end.column, 9);
    assert_eq!(result.root.span.end.offset, 15);
}

#[test]
fn test_parse_is_deterministic() {
    let source = "use core:math\nstruct P { a = 1\n fn f() { return a } }\nfor x in xs { $log(x) }\n";
    assert_eq!(parse(source), parse(source));
}

#[test]
fn test_parses_share_tables_across_threads() {
    let sources = ["a = 1 + 2", "fn f() { return }", "if x { y } else { z }"];

    std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || parse(source)))
            .collect();

        for (handle, source) in handles.into_iter().zip(sources) {
            let result = handle.join().unwrap();
            assert_eq!(result, parse(source));
        }
    });
}

fn parse_on_thread(source: String) -> ParseResult {
    std::thread::spawn(move || parse(&source))
        .join()
        .expect("parser thread panicked")
}

#[test]
fn test_deeply_nested_arrays() {
    let source = format!("x = {}1{}\ny = 2\n", "[".repeat(5000), "]".repeat(5000));
    let result = parse_on_thread(source);

    assert_eq!(names(&result), vec!["NestingTooDeep"]);
    assert_eq!(result.diagnostics[0].category, ErrorCategory::Syntax);
    assert_eq!(result.root.children.len(), 2);
    assert!(result.root.children[0].is_error());
    assert_eq!(
        result.root.children[1].to_sexp(),
        "(variable_assign (identifier y) (number_lit 2))"
    );
}

#[test]
fn test_deeply_nested_prefix_operators() {
    let result = parse_on_thread(format!("{}x\n", "!".repeat(20000)));

    assert_eq!(names(&result), vec!["NestingTooDeep"]);
    assert!(result.root.children[0].is_error());
}

#[test]
fn test_deeply_nested_blocks() {
    let source = format!("{}x = 1{}\n", "if a {\n".repeat(1000), "\n}".repeat(1000));
    let result = parse_on_thread(source);

    assert!(names(&result).contains(&"NestingTooDeep"));
    assert!(result.root.contains_errors());
}

#[test]
fn test_long_operator_chain_is_bounded() {
    let source = format!("x = {}1\n", "1 + ".repeat(1000));
    let result = parse_on_thread(source);

    assert_eq!(names(&result), vec!["NestingTooDeep"]);
}

#[test]
fn test_moderate_nesting_parses() {
    let source = format!("x = {}1{}\n", "[".repeat(100), "]".repeat(100));
    let result = parse(&source);

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.root.find_all(NodeKind::ArrayLit).len(), 100);
}

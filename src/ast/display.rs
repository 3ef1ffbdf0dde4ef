use std::fmt::Write;

use super::ast::Node;

impl Node {
    /// Single-line s-expression: `(kind literal? children...)`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self, &mut out);
        out
    }

    /// Indented s-expression, one node per line, with line:column ranges.
    pub fn to_pretty_sexp(&self) -> String {
        let mut out = String::new();
        write_pretty(self, 0, &mut out);
        out
    }
}

fn write_sexp(node: &Node, out: &mut String) {
    out.push('(');
    out.push_str(node.kind.name());
    if let Some(literal) = node.literal() {
        out.push(' ');
        out.push_str(literal);
    }
    for child in &node.children {
        out.push(' ');
        write_sexp(child, out);
    }
    out.push(')');
}

fn write_pretty(node: &Node, depth: usize, out: &mut String) {
    let _ = write!(
        out,
        "{}({} [{}:{} - {}:{}]",
        "  ".repeat(depth),
        node.kind.name(),
        node.span.start.line,
        node.span.start.column,
        node.span.end.line,
        node.span.end.column
    );
    if let Some(literal) = node.literal() {
        let _ = write!(out, " {:?}", literal);
    }
    for child in &node.children {
        out.push('\n');
        write_pretty(child, depth + 1, out);
    }
    out.push(')');
    if depth == 0 {
        out.push('\n');
    }
}

use std::fmt::Display;

use serde::Serialize;

use crate::Span;

/// Node Kinds
///
/// One tag per grammar rule. Downstream tools (highlighters, linters, tree
/// queries) match on these, so variants are never renamed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    SourceFile,

    // Statements
    VariableAssign,
    CompoundAssign,
    ConstantDecl,
    FunctionDecl,
    MacroDecl,
    StructDecl,
    StructField,
    ExpressionStmt,
    ReturnStmt,
    ImportStmt,
    ImportPath,
    ForStmt,
    IfStmt,
    ElifClause,
    ElseClause,
    Block,

    // Literals
    Identifier,
    NumberLit,
    StringLit,
    BoolLit,
    ArrayLit,
    ObjectLit,
    KeyValuePair,

    // Expressions
    BinaryExpr,
    UnaryBang,
    AwaitExpr,
    RangeExpr,
    InExpr,
    MemberAccess,
    Subscript,
    Lambda,
    FunctionCall,
    MacroCall,
    ParameterList,

    ErrorNode,
}

impl NodeKind {
    /// The snake_case name used in s-expression output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::VariableAssign => "variable_assign",
            NodeKind::CompoundAssign => "compound_assign",
            NodeKind::ConstantDecl => "constant_decl",
            NodeKind::FunctionDecl => "function_decl",
            NodeKind::MacroDecl => "macro_decl",
            NodeKind::StructDecl => "struct_decl",
            NodeKind::StructField => "struct_field",
            NodeKind::ExpressionStmt => "expression_stmt",
            NodeKind::ReturnStmt => "return_stmt",
            NodeKind::ImportStmt => "import_stmt",
            NodeKind::ImportPath => "import_path",
            NodeKind::ForStmt => "for_stmt",
            NodeKind::IfStmt => "if_stmt",
            NodeKind::ElifClause => "elif_clause",
            NodeKind::ElseClause => "else_clause",
            NodeKind::Block => "block",
            NodeKind::Identifier => "identifier",
            NodeKind::NumberLit => "number_lit",
            NodeKind::StringLit => "string_lit",
            NodeKind::BoolLit => "bool_lit",
            NodeKind::ArrayLit => "array_lit",
            NodeKind::ObjectLit => "object_lit",
            NodeKind::KeyValuePair => "key_value_pair",
            NodeKind::BinaryExpr => "binary_expr",
            NodeKind::UnaryBang => "unary_bang",
            NodeKind::AwaitExpr => "await_expr",
            NodeKind::RangeExpr => "range_expr",
            NodeKind::InExpr => "in_expr",
            NodeKind::MemberAccess => "member_access",
            NodeKind::Subscript => "subscript",
            NodeKind::Lambda => "lambda",
            NodeKind::FunctionCall => "function_call",
            NodeKind::MacroCall => "macro_call",
            NodeKind::ParameterList => "parameter_list",
            NodeKind::ErrorNode => "ERROR",
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableAssign
                | NodeKind::CompoundAssign
                | NodeKind::ConstantDecl
                | NodeKind::FunctionDecl
                | NodeKind::MacroDecl
                | NodeKind::StructDecl
                | NodeKind::ExpressionStmt
                | NodeKind::ReturnStmt
                | NodeKind::ImportStmt
                | NodeKind::ForStmt
                | NodeKind::IfStmt
        )
    }

    /// Kinds that always carry exactly `n` children in a well-formed tree.
    pub fn fixed_arity(&self) -> Option<usize> {
        match self {
            NodeKind::BinaryExpr
            | NodeKind::MemberAccess
            | NodeKind::Subscript
            | NodeKind::RangeExpr
            | NodeKind::InExpr
            | NodeKind::KeyValuePair => Some(2),
            NodeKind::UnaryBang | NodeKind::AwaitExpr | NodeKind::ExpressionStmt => Some(1),
            _ => None,
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node of the concrete syntax tree.
///
/// `literal` holds the source text that distinguishes the node beyond its
/// kind: the name of an identifier, the text of a literal, the operator of a
/// binary/compound/bang node, the sigil of a macro call, the prefix of an
/// import path, or `async` on an async function declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        Node {
            kind,
            children,
            span,
            literal: None,
        }
    }

    /// Wraps `node` in an error node covering the same range.
    pub fn error_wrapping(node: Node) -> Self {
        Node::new(NodeKind::ErrorNode, node.span, vec![node])
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub fn is_error(&self) -> bool {
        self.kind == NodeKind::ErrorNode
    }

    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |child| child.kind == kind)
    }

    /// The source text this node spans.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start.offset as usize..self.span.end.offset as usize]
    }

    /// Pre-order traversal, this node first.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn find_all(&self, kind: NodeKind) -> Vec<&Node> {
        self.walk().filter(|node| node.kind == kind).collect()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.walk().filter(|node| node.children.is_empty())
    }

    pub fn contains_errors(&self) -> bool {
        self.walk().any(Node::is_error)
    }

    /// The bound name of a declaration (`fn`, `macro`, `struct`, fields and
    /// bindings), if this node has one.
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::FunctionDecl
            | NodeKind::MacroDecl
            | NodeKind::StructDecl
            | NodeKind::StructField
            | NodeKind::ConstantDecl
            | NodeKind::VariableAssign
            | NodeKind::CompoundAssign
            | NodeKind::FunctionCall
            | NodeKind::MacroCall => self
                .children
                .first()
                .filter(|child| child.kind == NodeKind::Identifier)
                .and_then(Node::literal),
            _ => None,
        }
    }

    pub fn is_async(&self) -> bool {
        self.kind == NodeKind::FunctionDecl && self.literal() == Some("async")
    }

    /// For an `ImportStmt`: the path node (valid or not).
    pub fn import_path(&self) -> Option<&Node> {
        if self.kind != NodeKind::ImportStmt {
            return None;
        }
        self.children.iter().find(|child| {
            child.kind == NodeKind::ImportPath
                || (child.is_error()
                    && child
                        .children
                        .first()
                        .is_some_and(|inner| inner.kind == NodeKind::ImportPath))
        })
    }

    /// For an `ImportStmt`: the `as` alias, if any.
    pub fn import_alias(&self) -> Option<&str> {
        let path = self.import_path()?;
        let path_index = self.children.iter().position(|child| std::ptr::eq(child, path))?;
        self.children
            .get(path_index + 1)
            .and_then(Node::literal)
    }

    /// For an `ImportStmt`: the names of a `use {a, b} from ...` import.
    pub fn import_names(&self) -> Vec<&str> {
        if self.kind != NodeKind::ImportStmt {
            return Vec::new();
        }
        self.children
            .iter()
            .take_while(|child| child.kind == NodeKind::Identifier)
            .filter_map(Node::literal)
            .collect()
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// CST (Concrete Syntax Tree) module
/// Contains the node model shared by the statement and expression parsers
///
/// Submodules:
/// - ast: Node and NodeKind definitions plus traversal helpers
/// - display: s-expression rendering used by the CLI and tests
pub mod ast;
pub mod display;

#[cfg(test)]
mod tests;

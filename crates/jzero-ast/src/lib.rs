//! The jzero abstract syntax tree and its annotated pretty-printer.

pub mod pos;
pub mod pretty;
pub mod tree;

pub use pos::Pos;
pub use pretty::{print_expr, print_program};
pub use tree::{BinOp, ClassDecl, Expr, ExprKind, Field, Formal, Method, Program, UnOp};

//! Convenience facade over the Jzero compiler workspace.
//!
//! Re-exports the pipeline crates (AST, parser, semantic analysis,
//! codegen, VM) under a single dependency — this is the crate a
//! downstream consumer would add to `Cargo.toml` instead of naming
//! every workspace member individually. `jzero-cli` depends on the
//! member crates directly rather than through this facade, since it
//! already lives inside the workspace.

pub use jzero_ast as ast;
pub use jzero_codegen as codegen;
pub use jzero_parser as parser;
pub use jzero_semantic as semantic;
pub use jzero_vm as vm;

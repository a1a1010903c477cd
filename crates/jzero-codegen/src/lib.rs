//! Code generation seam for the Jzero compiler.
//!
//! `spec.md` §1 scopes this repository to the semantic-analysis pipeline:
//! "LLVM IR generation and linking — assumed to consume the annotated
//! tree" is explicitly out of scope. This crate is the documented
//! boundary a future backend would occupy, positioned downstream of
//! `jzero-semantic` exactly as the teacher repository places it — it
//! does not implement TAC or bytecode emission, and says so plainly
//! rather than quietly degrading to a no-op.

use jzero_ast::Program;
use jzero_semantic::Tables;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("code generation is not implemented in this analyzer")]
    Unimplemented,
}

/// Accept a fully type-checked program and its symbol tables and report
/// that code generation hasn't been built. The `-i` CLI mode surfaces
/// this as a clean, typed error rather than a panic or a silent `-c`.
pub fn generate(_program: &Program, _tables: &Tables) -> Result<(), CodegenError> {
    Err(CodegenError::Unimplemented)
}

//! Bytecode interpreter seam for the Jzero compiler.
//!
//! Depends on `jzero-codegen`'s (currently unimplemented) bytecode
//! output — `spec.md` §1 scopes this repository to semantic analysis,
//! so there is nothing for a VM to execute yet. Kept as its own crate,
//! matching the teacher repository's split between "emit bytecode" and
//! "run bytecode", so a future backend has the same two seams to fill.

use jzero_codegen::CodegenError;

#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("no bytecode to run: {0}")]
    NoBytecode(#[from] CodegenError),
}

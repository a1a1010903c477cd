//! Semantic analysis for the jzero compiler: four sequential
//! tree-walking passes over a parsed [`jzero_ast::Program`] (`spec.md`
//! §2). Each pass reads immutable results from earlier passes and
//! produces one new table; the final pass mutates expression nodes in
//! place, attaching a resolved type annotation. A semantic error from
//! any pass aborts the whole analyzer — there is no accumulation or
//! recovery (`spec.md` §1's Non-goals).

mod declare;
mod error;
mod overrides;
mod resolve;
mod signatures;
mod typing;

#[cfg(test)]
mod tests;

pub use error::SemanticError;
pub use jzero_symtab::{ClassTable, FieldTable, FormalTable, MethodTable};

use jzero_ast::Program;

/// The global tables produced by P1–P3, handed to codegen alongside the
/// now fully type-annotated [`Program`].
#[derive(Debug, Clone)]
pub struct Tables {
    pub classes: ClassTable,
    pub methods: MethodTable,
    pub fields: FieldTable,
    pub formals: FormalTable,
}

/// Run the four semantic passes over `program` in order, mutating it to
/// add the implicit `Object` root and, on success, a type annotation on
/// every expression node. `file` is the source filename, used only for
/// error positions that have no more specific node to point at.
pub fn analyze(program: &mut Program, file: &str) -> Result<Tables, SemanticError> {
    tracing::debug!(pass = "P1", "declaring classes");
    let classes = declare::declare(program, file)?;

    tracing::debug!(pass = "P2", "checking signatures");
    let (methods, fields) = signatures::check_signatures(program, &classes, file)?;

    tracing::debug!(pass = "P3", "checking overrides, formals, and the main contract");
    let formals = overrides::check_overrides(program, &classes, &methods, &fields)?;

    tracing::debug!(pass = "P4", "type-checking expressions");
    typing::check_types(program, &classes, &methods, &fields, &formals)?;

    Ok(Tables { classes, methods, fields, formals })
}

//! P2 — the signature pass (`spec.md` §4.2): records every class's own
//! methods and fields into the global `MethodTable`/`FieldTable`,
//! checks that a named parent actually exists, and requires a `Main`
//! class once every class has been visited. Method bodies and field
//! initializers are not inspected here — that's P4's job.

use jzero_ast::{Pos, Program};
use jzero_symtab::{ClassTable, FieldTable, MethodTable};

use crate::error::SemanticError;

pub(crate) fn check_signatures(
    program: &Program,
    classes: &ClassTable,
    file: &str,
) -> Result<(MethodTable, FieldTable), SemanticError> {
    let mut methods = MethodTable::new();
    let mut fields = FieldTable::new();
    let mut has_main = false;

    for class in &program.classes {
        if class.name == "Main" {
            has_main = true;
        }

        if class.name != "Object" {
            let parent = class.parent.as_deref().unwrap_or("Object");
            if parent != "Object" && !classes.contains(parent) {
                return Err(SemanticError::UndefinedParent {
                    class: class.name.clone(),
                    parent: parent.to_string(),
                    pos: class.pos.clone(),
                });
            }
        }

        for method in &class.methods {
            if methods.declared_locally(&class.name, &method.name) {
                return Err(SemanticError::DuplicateMethod {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    pos: method.pos.clone(),
                });
            }
            methods.insert(&class.name, &method.name, &method.ret_ty);
        }

        for field in &class.fields {
            if fields.declared_locally(&class.name, &field.name) {
                return Err(SemanticError::DuplicateField {
                    class: class.name.clone(),
                    field: field.name.clone(),
                    pos: field.pos.clone(),
                });
            }
            fields.insert(&class.name, &field.name, &field.ty);
        }
    }

    if !has_main {
        return Err(SemanticError::MainClassMissing { pos: Pos::new(file, 0, 0) });
    }

    Ok((methods, fields))
}

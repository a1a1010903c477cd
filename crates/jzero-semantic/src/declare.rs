//! P1 — the declaration pass (`spec.md` §4.1): synthesizes the implicit
//! root class, registers every class and its parent, defaults an
//! unspecified `extends` clause to `Object`, and rejects duplicate
//! classes, a parented root, or an inheritance cycle.

use jzero_ast::{ClassDecl, Pos, Program};
use jzero_symtab::ClassTable;

use crate::error::SemanticError;

/// Run P1 over `program`, mutating it in place: the synthesized
/// `Object` class is inserted at the head of `program.classes`, and
/// every other class's `parent` is rewritten from `None` to
/// `Some("Object")`. Returns the populated `ClassTable` on success.
pub(crate) fn declare(program: &mut Program, file: &str) -> Result<ClassTable, SemanticError> {
    program.classes.insert(0, ClassDecl::synthesize_object());
    register_and_check(&mut program.classes, file)
}

/// The registration/validation core of P1, factored out so tests can
/// exercise it on a class list that already has its root prepended —
/// `declare` itself always prepends a parent-free synthesized root, so
/// `RootHasParent` can never fire through that entry point.
fn register_and_check(classes_in: &mut [ClassDecl], file: &str) -> Result<ClassTable, SemanticError> {
    let mut classes = ClassTable::new();
    for class in classes_in.iter_mut() {
        if classes.contains(&class.name) {
            return Err(SemanticError::DuplicateClass { name: class.name.clone(), pos: class.pos.clone() });
        }

        if class.name == "Object" {
            if class.parent.is_some() {
                return Err(SemanticError::RootHasParent { pos: class.pos.clone() });
            }
            classes.insert(&class.name, "");
        } else {
            let parent = class.parent.clone().unwrap_or_else(|| "Object".to_string());
            class.parent = Some(parent.clone());
            classes.insert(&class.name, &parent);
        }
    }

    for name in classes.classes().map(str::to_string).collect::<Vec<_>>() {
        if classes.find_cycle_from(&name).is_some() {
            let pos = classes_in
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.pos.clone())
                .unwrap_or_else(|| Pos::new(file, 0, 0));
            return Err(SemanticError::InheritanceCycle { class: name, pos });
        }
    }

    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, parent: Option<&str>) -> ClassDecl {
        ClassDecl {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            fields: Vec::new(),
            methods: Vec::new(),
            pos: Pos::new("t.vsop", 1, 1),
        }
    }

    #[test]
    fn unspecified_parent_defaults_to_object() {
        let mut program = Program { classes: vec![class("A", None)] };
        let classes = declare(&mut program, "t.vsop").expect("should declare");
        assert_eq!(classes.parent_of("A"), Some("Object"));
        assert_eq!(program.classes.iter().find(|c| c.name == "A").unwrap().parent.as_deref(), Some("Object"));
    }

    #[test]
    fn duplicate_class_is_rejected() {
        let mut program = Program { classes: vec![class("A", None), class("A", None)] };
        let err = declare(&mut program, "t.vsop").unwrap_err();
        assert!(matches!(err, SemanticError::DuplicateClass { name, .. } if name == "A"));
    }

    #[test]
    fn cycle_is_detected() {
        let mut program = Program {
            classes: vec![class("A", Some("B")), class("B", Some("A"))],
        };
        let err = declare(&mut program, "t.vsop").unwrap_err();
        assert!(matches!(err, SemanticError::InheritanceCycle { .. }));
        assert!(err.to_string().contains("Cycle detected in class inheritance"));
    }

    #[test]
    fn object_is_synthesized_and_inserted_first() {
        let mut program = Program { classes: vec![class("A", None)] };
        declare(&mut program, "t.vsop").unwrap();
        assert_eq!(program.classes[0].name, "Object");
        assert!(program.classes[0].methods.iter().any(|m| m.name == "print"));
    }

    #[test]
    fn a_root_declared_with_a_parent_is_rejected() {
        let mut classes = vec![class("Object", Some("Foo"))];
        let err = register_and_check(&mut classes, "t.vsop").unwrap_err();
        assert!(matches!(err, SemanticError::RootHasParent { .. }));
    }
}

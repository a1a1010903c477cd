//! P3 — the override, formal, and main-method pass (`spec.md` §4.3):
//! validates method overriding against the nearest ancestor that
//! declares the same name, forbids field shadowing, resolves every
//! declared type reference, records ordered formal-parameter lists,
//! and enforces the `Main.main()` contract.

use std::collections::HashSet;

use jzero_ast::{Pos, Program};
use jzero_symtab::{ClassTable, FieldTable, FormalTable, MethodTable};

use crate::error::SemanticError;
use crate::resolve::resolve_declared_type;

pub(crate) fn check_overrides(
    program: &Program,
    classes: &ClassTable,
    methods: &MethodTable,
    fields: &FieldTable,
) -> Result<FormalTable, SemanticError> {
    let formals = collect_formals_and_resolve_types(program, classes)?;
    check_override_rules(program, classes, methods, &formals)?;
    check_field_shadowing(program, classes, fields)?;
    check_main_contract(program)?;
    Ok(formals)
}

/// First walk: record every method's ordered formals and validate that
/// every declared type reference (return types, formal types, field
/// types) resolves to a primitive or a defined class. Done before any
/// override check so that an ancestor declared later in source order
/// already has its formals on hand (`spec.md` doesn't mandate
/// parent-before-child declaration order).
fn collect_formals_and_resolve_types(program: &Program, classes: &ClassTable) -> Result<FormalTable, SemanticError> {
    let mut formals = FormalTable::new();

    for class in &program.classes {
        for method in &class.methods {
            resolve_declared_type(&method.ret_ty, &class.name, classes)
                .ok_or_else(|| SemanticError::UndefinedType { ty: method.ret_ty.clone(), pos: method.pos.clone() })?;

            let mut seen = HashSet::new();
            let mut ordered = Vec::with_capacity(method.formals.len());
            for formal in &method.formals {
                if !seen.insert(formal.name.clone()) {
                    return Err(SemanticError::DuplicateFormal {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        formal: formal.name.clone(),
                        pos: formal.pos.clone(),
                    });
                }
                resolve_declared_type(&formal.ty, &class.name, classes)
                    .ok_or_else(|| SemanticError::UndefinedType { ty: formal.ty.clone(), pos: formal.pos.clone() })?;
                ordered.push((formal.name.clone(), formal.ty.clone()));
            }
            formals.insert(&class.name, &method.name, ordered);
        }

        for field in &class.fields {
            resolve_declared_type(&field.ty, &class.name, classes)
                .ok_or_else(|| SemanticError::UndefinedType { ty: field.ty.clone(), pos: field.pos.clone() })?;
        }
    }

    Ok(formals)
}

/// Second walk: for every method that overrides an ancestor method of
/// the same name, check (in priority order) return type, arity,
/// per-index formal type, per-index formal name.
fn check_override_rules(
    program: &Program,
    classes: &ClassTable,
    methods: &MethodTable,
    formals: &FormalTable,
) -> Result<(), SemanticError> {
    for class in &program.classes {
        for method in &class.methods {
            let Some(ancestor) = classes.ancestors(&class.name).find(|a| methods.declared_locally(a, &method.name)) else {
                continue;
            };

            let ancestor_ret = methods.return_type_of(&ancestor, &method.name).expect("declared_locally implies present");
            if ancestor_ret != method.ret_ty {
                return Err(SemanticError::OverrideReturnTypeMismatch {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    pos: method.pos.clone(),
                });
            }

            let ancestor_formals = formals.of(&ancestor, &method.name).unwrap_or(&[]);
            if ancestor_formals.len() != method.formals.len() {
                return Err(SemanticError::OverrideArityMismatch {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    pos: method.pos.clone(),
                });
            }

            for (index, formal) in method.formals.iter().enumerate() {
                let (ancestor_name, ancestor_ty) = &ancestor_formals[index];
                if *ancestor_ty != formal.ty {
                    return Err(SemanticError::OverrideFormalTypeMismatch {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        index,
                        pos: method.pos.clone(),
                    });
                }
                if *ancestor_name != formal.name {
                    return Err(SemanticError::OverrideFormalNameMismatch {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        index,
                        pos: method.pos.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_field_shadowing(program: &Program, classes: &ClassTable, fields: &FieldTable) -> Result<(), SemanticError> {
    for class in &program.classes {
        for field in &class.fields {
            if classes.ancestors(&class.name).any(|ancestor| fields.declared_locally(&ancestor, &field.name)) {
                return Err(SemanticError::FieldShadowsAncestor {
                    class: class.name.clone(),
                    field: field.name.clone(),
                    pos: field.pos.clone(),
                });
            }
        }
    }
    Ok(())
}

/// `spec.md` §4.3: "require a `Main.main()` with no formals returning
/// `int32`". `Main`'s existence itself was already checked by P2; a
/// missing `Main` here would mean P2's check was bypassed, so this
/// falls back to a synthetic position rather than panicking.
fn check_main_contract(program: &Program) -> Result<(), SemanticError> {
    let main_class = match program.classes.iter().find(|c| c.name == "Main") {
        Some(c) => c,
        None => return Err(SemanticError::MainMethodMissing { pos: Pos::new("<unknown>", 0, 0) }),
    };

    match main_class.methods.iter().find(|m| m.name == "main") {
        None => Err(SemanticError::MainMethodMissing { pos: main_class.pos.clone() }),
        Some(main_method) => {
            if main_method.formals.is_empty() && main_method.ret_ty == "int32" {
                Ok(())
            } else {
                Err(SemanticError::MainIllTyped { pos: main_method.pos.clone() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jzero_ast::{ClassDecl, Expr, ExprKind, Field, Formal, Method};

    fn pos() -> Pos {
        Pos::new("t.vsop", 1, 1)
    }

    fn hierarchy() -> ClassTable {
        let mut t = ClassTable::new();
        t.insert("Object", "");
        t.insert("P", "Object");
        t.insert("C", "P");
        t
    }

    fn method(name: &str, formals: Vec<(&str, &str)>, ret_ty: &str) -> Method {
        Method {
            name: name.to_string(),
            formals: formals
                .into_iter()
                .map(|(n, t)| Formal { name: n.to_string(), ty: t.to_string(), pos: pos() })
                .collect(),
            ret_ty: ret_ty.to_string(),
            body: Expr::new(ExprKind::Unit, pos()),
            pos: pos(),
        }
    }

    #[test]
    fn return_type_mismatch_is_reported_before_arity() {
        let p = ClassDecl { name: "P".to_string(), parent: Some("Object".to_string()), fields: vec![], methods: vec![method("f", vec![], "int32")], pos: pos() };
        let c = ClassDecl { name: "C".to_string(), parent: Some("P".to_string()), fields: vec![], methods: vec![method("f", vec![("x", "int32")], "bool")], pos: pos() };
        let program = Program { classes: vec![p, c] };
        let classes = hierarchy();
        let mut methods = MethodTable::new();
        methods.insert("P", "f", "int32");
        methods.insert("C", "f", "bool");
        let formals = FormalTable::new();
        let err = check_override_rules(&program, &classes, &methods, &formals).unwrap_err();
        assert!(matches!(err, SemanticError::OverrideReturnTypeMismatch { .. }));
    }

    #[test]
    fn formal_name_mismatch_is_caught_after_type_matches() {
        let p = ClassDecl { name: "P".to_string(), parent: Some("Object".to_string()), fields: vec![], methods: vec![method("f", vec![("a", "int32")], "int32")], pos: pos() };
        let c = ClassDecl { name: "C".to_string(), parent: Some("P".to_string()), fields: vec![], methods: vec![method("f", vec![("b", "int32")], "int32")], pos: pos() };
        let program = Program { classes: vec![p, c] };
        let classes = hierarchy();
        let mut methods = MethodTable::new();
        methods.insert("P", "f", "int32");
        methods.insert("C", "f", "int32");
        let mut formals = FormalTable::new();
        formals.insert("P", "f", vec![("a".to_string(), "int32".to_string())]);
        formals.insert("C", "f", vec![("b".to_string(), "int32".to_string())]);
        let err = check_override_rules(&program, &classes, &methods, &formals).unwrap_err();
        assert!(matches!(err, SemanticError::OverrideFormalNameMismatch { .. }));
    }

    #[test]
    fn field_shadowing_an_ancestor_is_rejected() {
        let p = ClassDecl { name: "P".to_string(), parent: Some("Object".to_string()), fields: vec![Field { name: "x".to_string(), ty: "int32".to_string(), init: None, pos: pos() }], methods: vec![], pos: pos() };
        let c = ClassDecl { name: "C".to_string(), parent: Some("P".to_string()), fields: vec![Field { name: "x".to_string(), ty: "int32".to_string(), init: None, pos: pos() }], methods: vec![], pos: pos() };
        let program = Program { classes: vec![p, c] };
        let classes = hierarchy();
        let mut fields = FieldTable::new();
        fields.insert("P", "x", "int32");
        fields.insert("C", "x", "int32");
        let err = check_field_shadowing(&program, &classes, &fields).unwrap_err();
        assert!(matches!(err, SemanticError::FieldShadowsAncestor { .. }));
        assert_eq!(err.to_string(), "t.vsop:1:1: semantic error: Field x is already defined in an ancestor of class C");
    }

    #[test]
    fn main_without_formals_and_int32_return_passes() {
        let main = ClassDecl { name: "Main".to_string(), parent: Some("Object".to_string()), fields: vec![], methods: vec![method("main", vec![], "int32")], pos: pos() };
        let program = Program { classes: vec![main] };
        check_main_contract(&program).expect("should pass");
    }

    #[test]
    fn main_with_formals_is_ill_typed() {
        let main = ClassDecl { name: "Main".to_string(), parent: Some("Object".to_string()), fields: vec![], methods: vec![method("main", vec![("x", "int32")], "int32")], pos: pos() };
        let program = Program { classes: vec![main] };
        let err = check_main_contract(&program).unwrap_err();
        assert!(matches!(err, SemanticError::MainIllTyped { .. }));
    }

    #[test]
    fn missing_main_method_on_the_main_class_is_reported() {
        let main = ClassDecl { name: "Main".to_string(), parent: Some("Object".to_string()), fields: vec![], methods: vec![], pos: pos() };
        let program = Program { classes: vec![main] };
        let err = check_main_contract(&program).unwrap_err();
        assert!(matches!(err, SemanticError::MainMethodMissing { .. }));
    }
}

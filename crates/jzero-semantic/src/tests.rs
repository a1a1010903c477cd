//! End-to-end scenarios (`spec.md` §8): parse a whole program, run
//! [`crate::analyze`], and check the semantic outcome or the annotated
//! pretty-printed tree against the documented exact output.

use jzero_ast::print_program;

use crate::{analyze, SemanticError};

fn analyze_str(src: &str) -> Result<jzero_ast::Program, SemanticError> {
    let mut program = jzero_parser::parse(src, "t.vsop").expect("parse should succeed");
    analyze(&mut program, "t.vsop")?;
    Ok(program)
}

#[test]
fn minimal_program_prints_its_annotated_tree() {
    let program = analyze_str("class Main { main() : int32 { 0 } }").expect("should typecheck");
    assert_eq!(
        print_program(&program, true),
        "[Class(Main, Object, [], [Method(main, [], int32, [0 : int32] : int32)])]"
    );
}

#[test]
fn a_class_list_with_no_main_is_rejected() {
    let err = analyze_str("class Foo { }").unwrap_err();
    assert!(matches!(err, SemanticError::MainClassMissing { .. }));
    assert_eq!(err.to_string(), "t.vsop:0:0: semantic error: Undefined Main class");
}

#[test]
fn an_inheritance_cycle_is_rejected() {
    let src = "class A extends B { } class B extends A { } class Main { main():int32 { 0 } }";
    let err = analyze_str(src).unwrap_err();
    assert!(err.to_string().contains("Cycle detected in class inheritance"));
}

#[test]
fn if_branches_of_sibling_classes_join_at_their_common_ancestor() {
    let src = "class A { } \
               class B extends A { } \
               class C extends A { } \
               class Main { main():int32 { if true then new B else new C ; 0 } }";
    let program = analyze_str(src).expect("should typecheck");
    let rendered = print_program(&program, true);
    assert!(rendered.contains("If(true : bool, New(B) : A, New(C) : A) : A"));
}

#[test]
fn overriding_with_a_different_return_type_is_rejected() {
    let src = "class P { f():int32{0} } class C extends P { f():bool{true} } class Main{main():int32{0}}";
    let err = analyze_str(src).unwrap_err();
    assert!(err.to_string().contains("Overridden method f in class C has a different return type"));
}

#[test]
fn a_field_shadowing_an_ancestors_field_is_rejected() {
    let src = "class P { x : int32; } class C extends P { x : int32; } class Main{main():int32{0}}";
    let err = analyze_str(src).unwrap_err();
    assert!(err.to_string().contains("Field x is already defined in an ancestor of class C"));
}

#[test]
fn an_empty_block_has_unit_type() {
    let program = analyze_str("class Main { main():int32 { { } ; 0 } }").expect("should typecheck");
    assert!(print_program(&program, true).contains("[] : unit"));
}

#[test]
fn a_missing_else_branch_makes_the_if_unit_typed() {
    let program = analyze_str("class Main { main():int32 { if true then 1 ; 0 } }").expect("should typecheck");
    assert!(print_program(&program, true).contains("If(true : bool, 1 : int32) : unit"));
}

#[test]
fn a_let_without_an_initializer_types_as_its_scope() {
    let program = analyze_str("class Main { main():int32 { let x : int32 in x } }").expect("should typecheck");
    assert!(print_program(&program, true).contains("Let(x, int32, x : int32) : int32"));
}

#[test]
fn overriding_three_levels_deep_still_checks_against_the_nearest_declaring_ancestor() {
    let src = "class A { f():int32{0} } \
               class B extends A { } \
               class C extends B { f():bool{true} } \
               class Main{main():int32{0}}";
    let err = analyze_str(src).unwrap_err();
    assert!(err.to_string().contains("Overridden method f in class C has a different return type"));
}

#[test]
fn self_dispatch_resolves_a_method_defined_on_the_enclosing_class() {
    let src = "class Main { helper():int32 { 1 } main():int32 { self.helper() } }";
    let program = analyze_str(src).expect("should typecheck");
    assert!(print_program(&program, true).contains("Call(self : Main, helper, []) : int32"));
}

#[test]
fn isnull_applied_to_a_primitive_is_rejected() {
    let err = analyze_str("class Main { main():int32 { isnull 0 ; 0 } }").unwrap_err();
    assert!(matches!(err, SemanticError::OperandKindMismatch { .. }));
}

#[test]
fn duplicate_class_names_are_rejected() {
    let src = "class A { } class A { } class Main{main():int32{0}}";
    let err = analyze_str(src).unwrap_err();
    assert!(matches!(err, SemanticError::DuplicateClass { name, .. } if name == "A"));
}

#[test]
fn an_undefined_parent_class_is_rejected() {
    let src = "class A extends Ghost { } class Main{main():int32{0}}";
    let err = analyze_str(src).unwrap_err();
    assert!(matches!(err, SemanticError::UndefinedParent { parent, .. } if parent == "Ghost"));
}

#[test]
fn calling_an_undeclared_method_is_rejected() {
    let src = "class Main { main():int32 { self.ghost() ; 0 } }";
    let err = analyze_str(src).unwrap_err();
    assert!(matches!(err, SemanticError::UnknownMethod { method, .. } if method == "ghost"));
}

#[test]
fn an_unbound_variable_reference_is_rejected() {
    let src = "class Main { main():int32 { ghost } }";
    let err = analyze_str(src).unwrap_err();
    assert!(matches!(err, SemanticError::UnboundVariable { name, .. } if name == "ghost"));
}

#[test]
fn a_field_initializer_cannot_reference_self_or_other_fields() {
    let src = "class Main { x : int32 <- self.helper(); main():int32 { 0 } helper():int32 { 1 } }";
    let err = analyze_str(src).unwrap_err();
    assert!(matches!(err, SemanticError::SelfInFieldInit { .. }));
}

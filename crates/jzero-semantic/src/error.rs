//! The semantic error taxonomy (`spec.md` §7): one variant per error
//! kind, each carrying the `Pos` it was raised at. `Display` renders
//! the wire format `filename:line:column: semantic error: message` —
//! the first error any pass raises is fatal, so a `SemanticError` is
//! always the whole story; there is no accumulation or recovery.

use jzero_ast::Pos;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SemanticError {
    // ── P1: declaration ────────────────────────────────────────────
    #[error("{pos}: semantic error: class {name} is already defined")]
    DuplicateClass { name: String, pos: Pos },

    #[error("{pos}: semantic error: the root class Object may not declare a parent")]
    RootHasParent { pos: Pos },

    #[error("{pos}: semantic error: Cycle detected in class inheritance involving class {class}")]
    InheritanceCycle { class: String, pos: Pos },

    // ── P2: signatures ─────────────────────────────────────────────
    #[error("{pos}: semantic error: class {class} extends undefined class {parent}")]
    UndefinedParent { class: String, parent: String, pos: Pos },

    #[error("{pos}: semantic error: Undefined Main class")]
    MainClassMissing { pos: Pos },

    #[error("{pos}: semantic error: method {method} is already defined in class {class}")]
    DuplicateMethod { class: String, method: String, pos: Pos },

    #[error("{pos}: semantic error: field {field} is already defined in class {class}")]
    DuplicateField { class: String, field: String, pos: Pos },

    // ── P3: overrides, formals, main contract ──────────────────────
    #[error("{pos}: semantic error: formal {formal} is already defined in method {class}.{method}")]
    DuplicateFormal { class: String, method: String, formal: String, pos: Pos },

    #[error(
        "{pos}: semantic error: Overridden method {method} in class {class} has a different return type than the method it overrides"
    )]
    OverrideReturnTypeMismatch { class: String, method: String, pos: Pos },

    #[error(
        "{pos}: semantic error: Overridden method {method} in class {class} has a different number of formals than the method it overrides"
    )]
    OverrideArityMismatch { class: String, method: String, pos: Pos },

    #[error(
        "{pos}: semantic error: Overridden method {method} in class {class} has a different type for formal {index} than the method it overrides"
    )]
    OverrideFormalTypeMismatch { class: String, method: String, index: usize, pos: Pos },

    #[error(
        "{pos}: semantic error: Overridden method {method} in class {class} has a different name for formal {index} than the method it overrides"
    )]
    OverrideFormalNameMismatch { class: String, method: String, index: usize, pos: Pos },

    #[error("{pos}: semantic error: Field {field} is already defined in an ancestor of class {class}")]
    FieldShadowsAncestor { class: String, field: String, pos: Pos },

    #[error("{pos}: semantic error: undefined type {ty}")]
    UndefinedType { ty: String, pos: Pos },

    #[error("{pos}: semantic error: class Main does not declare a method main")]
    MainMethodMissing { pos: Pos },

    #[error("{pos}: semantic error: Main.main must take no formals and return int32")]
    MainIllTyped { pos: Pos },

    // ── P4: typing ──────────────────────────────────────────────────
    #[error("{pos}: semantic error: the branches of this if have incompatible types")]
    IfBranchMismatch { pos: Pos },

    #[error("{pos}: semantic error: initializer of let {name} does not conform to its declared type")]
    LetInitNonConformance { name: String, pos: Pos },

    #[error("{pos}: semantic error: right-hand side of assignment to {name} does not conform to its declared type")]
    AssignNonConformance { name: String, pos: Pos },

    #[error("{pos}: semantic error: operand of {construct} has the wrong type")]
    OperandKindMismatch { construct: String, pos: Pos },

    #[error("{pos}: semantic error: while condition must have type bool")]
    WhileConditionNotBool { pos: Pos },

    #[error("{pos}: semantic error: if condition must have type bool")]
    IfConditionNotBool { pos: Pos },

    #[error("{pos}: semantic error: initializer of field {field} does not conform to its declared type")]
    FieldInitNonConformance { class: String, field: String, pos: Pos },

    #[error("{pos}: semantic error: body of method {method} in class {class} does not conform to its declared return type")]
    MethodBodyNonConformance { class: String, method: String, pos: Pos },

    #[error("{pos}: semantic error: class {receiver} has no method {method}")]
    UnknownMethod { receiver: String, method: String, pos: Pos },

    #[error("{pos}: semantic error: method {method} expects {expected} argument(s) but got {found}")]
    ArgumentCountMismatch { method: String, expected: usize, found: usize, pos: Pos },

    #[error("{pos}: semantic error: argument {index} to method {method} does not conform to its formal type")]
    ArgumentTypeMismatch { method: String, index: usize, pos: Pos },

    #[error("{pos}: semantic error: unbound variable {name}")]
    UnboundVariable { name: String, pos: Pos },

    #[error("{pos}: semantic error: self cannot be used inside a field initializer")]
    SelfInFieldInit { pos: Pos },

    #[error("{pos}: semantic error: field {name} cannot be used inside a field initializer")]
    FieldInFieldInit { name: String, pos: Pos },
}

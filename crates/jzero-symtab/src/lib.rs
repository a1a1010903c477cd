//! Symbol table types for the jzero compiler.
//!
//! Unlike a lexically-scoped language, VSOP-derived class hierarchies are
//! resolved through four flat, name-keyed tables rather than a nested
//! scope tree: a class's members are visible to every descendant by
//! walking the `parent` chain, not by nesting `Rc<RefCell<Scope>>`
//! frames. `ClassTable`, `MethodTable`, `FieldTable`, and `FormalTable`
//! are exactly `spec.md` §3's "Global tables (authoritative shapes)".

pub mod tables;
pub mod types;

pub use tables::{Ancestors, ClassTable, FieldTable, FormalTable, MethodTable};
pub use types::{resolve_primitive, StaticType, TypeKind};

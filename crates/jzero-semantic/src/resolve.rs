//! Type-spelling resolution shared by P3 (validating declarations) and
//! P4 (typing expressions): `spec.md` §4.3's rule for turning a declared
//! type's raw spelling into a `StaticType`.

use jzero_symtab::{resolve_primitive, ClassTable, StaticType};

/// Resolve a declared type spelling against the primitive table and,
/// failing that, the class hierarchy. An empty spelling — the parser's
/// placeholder for `self`'s type at parse time — is rewritten to
/// `enclosing_class` before resolution. Returns `None` for a spelling
/// that names neither a primitive nor a defined class.
pub(crate) fn resolve_declared_type(
    spelling: &str,
    enclosing_class: &str,
    classes: &ClassTable,
) -> Option<StaticType> {
    let spelling = if spelling.is_empty() { enclosing_class } else { spelling };
    if let Some(kind) = resolve_primitive(spelling) {
        Some(StaticType { kind, name: spelling.to_string() })
    } else if classes.contains(spelling) {
        Some(StaticType::class(spelling))
    } else {
        None
    }
}

//! The four global tables produced by P1–P3 (`spec.md` §3's "Global
//! tables (authoritative shapes)"), plus the class-hierarchy queries
//! (ancestry, conformance, least-upper-bound) every later pass needs.

use std::collections::HashMap;

/// `ClassTable`: class name → its declared parent name.
///
/// Every class other than `Object` has a parent present in this table
/// (invariant 1 of `spec.md` §3); `Object` itself has no parent.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    parents: HashMap<String, String>,
    /// Source order the classes were declared in (used by the pretty
    /// printer and by nothing else — lookups go through `parents`).
    order: Vec<String>,
}

impl ClassTable {
    pub fn new() -> Self {
        ClassTable::default()
    }

    /// Register a class. `Object` is registered with an empty parent by
    /// convention; every other class must be given a (possibly
    /// already-defaulted-to-`Object`) parent name.
    pub fn insert(&mut self, name: &str, parent: &str) {
        self.order.push(name.to_string());
        self.parents.insert(name.to_string(), parent.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// The declared parent of `name`, or `None` for `Object` or an
    /// undefined class.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parents.get(name).map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// `true` if `ancestor` occurs on `start`'s ancestor chain, up to and
    /// including `start` itself and `Object`. This is exactly the
    /// conformance relation on class types (`spec.md` §4.4).
    pub fn is_ancestor_or_self(&self, start: &str, ancestor: &str) -> bool {
        let mut cur = start;
        loop {
            if cur == ancestor {
                return true;
            }
            match self.parent_of(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// `true` if `ancestor` is a *proper* ancestor of `start` (does not
    /// match `start` itself). Used by field-shadowing and
    /// method-override lookups, which walk strictly-proper ancestors.
    pub fn is_proper_ancestor(&self, start: &str, ancestor: &str) -> bool {
        match self.parent_of(start) {
            Some(p) => self.is_ancestor_or_self(p, ancestor),
            None => false,
        }
    }

    /// Iterate the proper ancestors of `name`, nearest first, ending at
    /// (and including) `Object`.
    pub fn ancestors(&self, name: &str) -> Ancestors<'_> {
        Ancestors { table: self, current: self.parent_of(name).map(|s| s.to_string()) }
    }

    /// The least common ancestor of two classes: walk each class's own
    /// chain (itself included) up to `Object`, then return the first
    /// name from `a`'s chain that also occurs in `b`'s chain. Falls back
    /// to `Object` (`spec.md` §4.4's if-then-else join rule).
    pub fn lca(&self, a: &str, b: &str) -> String {
        let mut b_chain = std::collections::HashSet::new();
        let mut cur = Some(b.to_string());
        while let Some(c) = cur {
            b_chain.insert(c.clone());
            cur = self.parent_of(&c).map(|s| s.to_string());
        }

        let mut cur = Some(a.to_string());
        while let Some(c) = cur {
            if b_chain.contains(&c) {
                return c;
            }
            cur = self.parent_of(&c).map(|s| s.to_string());
        }
        "Object".to_string()
    }

    /// Walk the parent-of chain starting at `name`, returning the name
    /// that re-occurs if a cycle exists. Used by P1's cycle detection —
    /// a linear per-class walk with on-path marking, not a generic SCC
    /// algorithm (`spec.md` §4.1: the structure is a forest of chains).
    pub fn find_cycle_from(&self, name: &str) -> Option<String> {
        let mut on_path = std::collections::HashSet::new();
        let mut cur = name.to_string();
        loop {
            if !on_path.insert(cur.clone()) {
                return Some(cur);
            }
            match self.parent_of(&cur) {
                Some(p) => cur = p.to_string(),
                None => return None,
            }
        }
    }
}

/// Iterator over the proper ancestors of a class, nearest first.
pub struct Ancestors<'a> {
    table: &'a ClassTable,
    current: Option<String>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let cur = self.current.take()?;
        self.current = self.table.parent_of(&cur).map(|s| s.to_string());
        Some(cur)
    }
}

/// `MethodTable`: class name → method name → declared return-type
/// spelling (pre-resolution; P3 resolves spellings to `StaticType`).
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, HashMap<String, String>>,
}

impl MethodTable {
    pub fn new() -> Self {
        MethodTable::default()
    }

    pub fn insert(&mut self, class: &str, method: &str, ret_type: &str) {
        self.methods
            .entry(class.to_string())
            .or_default()
            .insert(method.to_string(), ret_type.to_string());
    }

    pub fn declared_locally(&self, class: &str, method: &str) -> bool {
        self.methods.get(class).is_some_and(|m| m.contains_key(method))
    }

    pub fn return_type_of(&self, class: &str, method: &str) -> Option<&str> {
        self.methods.get(class)?.get(method).map(|s| s.as_str())
    }

    /// Find the nearest class in `class`'s own-or-ancestor chain (via
    /// `classes`) that declares `method`, returning that class's name.
    pub fn find_declaring_class(&self, classes: &ClassTable, class: &str, method: &str) -> Option<String> {
        if self.declared_locally(class, method) {
            return Some(class.to_string());
        }
        for anc in classes.ancestors(class) {
            if self.declared_locally(&anc, method) {
                return Some(anc);
            }
        }
        None
    }
}

/// `FieldTable`: class name → field name → declared-type spelling.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    fields: HashMap<String, HashMap<String, String>>,
}

impl FieldTable {
    pub fn new() -> Self {
        FieldTable::default()
    }

    pub fn insert(&mut self, class: &str, field: &str, ty: &str) {
        self.fields
            .entry(class.to_string())
            .or_default()
            .insert(field.to_string(), ty.to_string());
    }

    pub fn declared_locally(&self, class: &str, field: &str) -> bool {
        self.fields.get(class).is_some_and(|m| m.contains_key(field))
    }

    pub fn type_of(&self, class: &str, field: &str) -> Option<&str> {
        self.fields.get(class)?.get(field).map(|s| s.as_str())
    }

    /// Find the nearest class in `class`'s own-or-ancestor chain that
    /// declares `field`.
    pub fn find_declaring_class(&self, classes: &ClassTable, class: &str, field: &str) -> Option<String> {
        if self.declared_locally(class, field) {
            return Some(class.to_string());
        }
        for anc in classes.ancestors(class) {
            if self.declared_locally(&anc, field) {
                return Some(anc);
            }
        }
        None
    }
}

/// `FormalTable`: class name → method name → ordered list of
/// `(formal_name, type_spelling)`. Order is significant for arity and
/// per-index override checks.
#[derive(Debug, Clone, Default)]
pub struct FormalTable {
    formals: HashMap<String, HashMap<String, Vec<(String, String)>>>,
}

impl FormalTable {
    pub fn new() -> Self {
        FormalTable::default()
    }

    pub fn insert(&mut self, class: &str, method: &str, formals: Vec<(String, String)>) {
        self.formals
            .entry(class.to_string())
            .or_default()
            .insert(method.to_string(), formals);
    }

    pub fn of(&self, class: &str, method: &str) -> Option<&[(String, String)]> {
        self.formals.get(class)?.get(method).map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hierarchy() -> ClassTable {
        let mut t = ClassTable::new();
        t.insert("Object", "");
        t.insert("A", "Object");
        t.insert("B", "A");
        t.insert("C", "A");
        t.insert("D", "B");
        t
    }

    #[test]
    fn ancestor_chain_is_reflexive_and_transitive() {
        let t = sample_hierarchy();
        assert!(t.is_ancestor_or_self("D", "D"));
        assert!(t.is_ancestor_or_self("D", "B"));
        assert!(t.is_ancestor_or_self("D", "A"));
        assert!(t.is_ancestor_or_self("D", "Object"));
        assert!(!t.is_ancestor_or_self("D", "C"));
    }

    #[test]
    fn proper_ancestor_excludes_self() {
        let t = sample_hierarchy();
        assert!(!t.is_proper_ancestor("D", "D"));
        assert!(t.is_proper_ancestor("D", "B"));
    }

    #[test]
    fn lca_of_siblings_is_their_shared_parent() {
        let t = sample_hierarchy();
        assert_eq!(t.lca("B", "C"), "A");
        assert_eq!(t.lca("D", "C"), "A");
        assert_eq!(t.lca("D", "D"), "D");
    }

    #[test]
    fn lca_falls_back_to_object_for_unrelated_roots() {
        let mut t = ClassTable::new();
        t.insert("Object", "");
        t.insert("X", "Object");
        t.insert("Y", "Object");
        assert_eq!(t.lca("X", "Y"), "Object");
    }

    #[test]
    fn cycle_detection_finds_the_repeated_name() {
        let mut t = ClassTable::new();
        t.insert("Object", "");
        t.insert("A", "B");
        t.insert("B", "A");
        assert_eq!(t.find_cycle_from("A"), Some("A".to_string()));
    }

    #[test]
    fn no_cycle_on_a_plain_chain() {
        let t = sample_hierarchy();
        assert_eq!(t.find_cycle_from("D"), None);
    }

    #[test]
    fn method_lookup_walks_up_to_the_declaring_ancestor() {
        let t = sample_hierarchy();
        let mut m = MethodTable::new();
        m.insert("A", "f", "int32");
        assert_eq!(m.find_declaring_class(&t, "D", "f"), Some("A".to_string()));
        assert_eq!(m.find_declaring_class(&t, "D", "g"), None);
    }
}

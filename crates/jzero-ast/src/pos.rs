//! Source positions attached to every expression and declaration.

use std::fmt;

/// A `(filename, line, column)` triple, 1-based, populated by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pos {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Pos { file: file.into(), line, column }
    }

    /// A position used for synthesized nodes (the implicit `Object`
    /// class and its built-in methods) that have no source location.
    pub fn synthetic() -> Self {
        Pos { file: "<builtin>".to_string(), line: 0, column: 0 }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

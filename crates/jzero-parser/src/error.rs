//! Parse errors: `spec.md`'s error taxonomy covers semantic analysis
//! only, so this crate's own failures are a strict superset rendered in
//! the same `filename:line:column: <kind> error: message` shape.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}:{line}:{column}: lexical error: unrecognized character {text:?}")]
    Lexical { file: String, line: usize, column: usize, text: String },

    #[error("{file}:{line}:{column}: syntax error: {message}")]
    Syntax { file: String, line: usize, column: usize, message: String },

    #[error("{file}: syntax error: unexpected end of input, {message}")]
    UnexpectedEof { file: String, message: String },
}

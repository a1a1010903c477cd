//! Lexical analysis for VSOP source files.
//!
//! Out of scope for the semantic-analysis core this repository centers
//! on (`spec.md` §1), but the four type-checking passes need *something*
//! upstream of them to exercise end to end — this crate and
//! `jzero-parser` are that external collaborator, built just solidly
//! enough to hand `jzero-semantic` a real [`jzero_ast::Program`].

pub mod token;

use logos::Logos;
use token::{LexerExtras, Token};

/// A token paired with its source text and 1-based line number.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Lex the input source, returning all meaningful tokens with line/column.
///
/// Hidden tokens (newlines, comments) are consumed for position tracking
/// but not included in the output.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, Vec<LexError>> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut line_start = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let line = lexer.extras.line;
        let text = lexer.slice().to_string();
        let column = span.start.saturating_sub(line_start) + 1;

        if text.contains('\n') {
            line_start = span.start + text.rfind('\n').map(|i| i + 1).unwrap_or(0);
        }

        match result {
            Ok(tok) if tok.is_hidden() => continue,
            Ok(tok) => {
                tokens.push(SpannedToken { token: tok, text, line, column });
            }
            Err(_) => {
                errors.push(LexError { line, column, text });
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// A lexical error with location info.
#[derive(Debug, Clone)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: unrecognized character: {:?}", self.line, self.text)
    }
}

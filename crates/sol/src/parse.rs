//! Recursive-descent parser producing the Sol expression tree.
//!
//! The grammar is whitespace-insensitive and period-terminated. Application
//! is greedy prefix: inside an application, any atom that can start an
//! expression continues it until a pipeline operator, an if-keyword, a
//! closing bracket, a comma, a colon, or the statement period. Pipelines bind
//! looser than application, and if-expressions bind looser than pipelines.

use crate::{
    error::SolError,
    expressions::{Expr, ExprLoc, Literal, Node, PathSegment},
    fstring,
    lexer::{Lexer, Token, TokenKind},
};

/// Maximum nesting depth for expressions during parsing.
///
/// This prevents stack overflow from deeply nested structures like `((((x))))`.
#[cfg(not(debug_assertions))]
const MAX_NESTING_DEPTH: u16 = 200;
/// In debug builds stack frames are much larger (no inlining, debug info), so
/// the limit is set conservatively.
#[cfg(debug_assertions)]
const MAX_NESTING_DEPTH: u16 = 60;

/// Lexes and parses a whole source text into statements.
pub(crate) fn parse_source(source: &str) -> Result<Vec<Node>, SolError> {
    let tokens = Lexer::tokenize(source)?;
    Parser::new(tokens).parse_statements()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: u16,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|token| &token.kind)
    }

    fn line(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(token) => token.line,
            None => self.tokens.last().map_or(1, |token| token.line),
        }
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, expected: &str) -> SolError {
        let got = match self.tokens.get(self.pos) {
            Some(token) => token.kind.describe(),
            None => "end of input".to_owned(),
        };
        SolError::parse_error(format!("expected {expected}, got {got}"), self.line())
    }

    fn expect_period(&mut self) -> Result<(), SolError> {
        match self.peek() {
            Some(TokenKind::Period) => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error_here("'.' to end the statement")),
        }
    }

    fn parse_statements(mut self) -> Result<Vec<Node>, SolError> {
        let mut nodes = Vec::new();
        while self.peek().is_some() {
            nodes.push(self.parse_statement()?);
        }
        Ok(nodes)
    }

    fn parse_statement(&mut self) -> Result<Node, SolError> {
        if let Some(node) = self.try_parse_assignment()? {
            return Ok(node);
        }
        let expr = self.parse_expression()?;
        self.expect_period()?;
        Ok(Node::Expr(expr))
    }

    /// Probes for `IDENT { IDENT } '='` and rolls back when the statement is
    /// an expression instead.
    fn try_parse_assignment(&mut self) -> Result<Option<Node>, SolError> {
        let start = self.pos;
        let line = self.line();
        let mut names: Vec<String> = Vec::new();
        while let Some(TokenKind::Ident(name)) = self.peek() {
            names.push(name.clone());
            self.bump();
        }
        if names.is_empty() || !matches!(self.peek(), Some(TokenKind::Assign)) {
            self.pos = start;
            return Ok(None);
        }
        self.bump();
        let value = self.parse_expression()?;
        self.expect_period()?;
        let name = names.remove(0);
        Ok(Some(Node::Assign {
            name,
            params: names,
            value,
            line,
        }))
    }

    fn parse_expression(&mut self) -> Result<ExprLoc, SolError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SolError::parse_error("expression is nested too deeply", self.line()));
        }
        self.depth += 1;
        let result = if matches!(self.peek(), Some(TokenKind::If)) {
            self.parse_if()
        } else {
            self.parse_pipeline()
        };
        self.depth -= 1;
        result
    }

    fn parse_if(&mut self) -> Result<ExprLoc, SolError> {
        let line = self.line();
        self.bump();
        let test = self.parse_expression()?;
        if !matches!(self.peek(), Some(TokenKind::Then)) {
            return Err(self.error_here("'then' after the if condition"));
        }
        self.bump();
        let then = self.parse_expression()?;
        if !matches!(self.peek(), Some(TokenKind::Else)) {
            return Err(self.error_here("'else' after the then branch"));
        }
        self.bump();
        let orelse = self.parse_expression()?;
        Ok(ExprLoc::new(
            line,
            Expr::If {
                test: Box::new(test),
                then: Box::new(then),
                orelse: Box::new(orelse),
            },
        ))
    }

    /// `application { '|>' application }`, left-folded.
    fn parse_pipeline(&mut self) -> Result<ExprLoc, SolError> {
        let mut left = self.parse_application()?;
        while matches!(self.peek(), Some(TokenKind::PipeOp)) {
            let line = self.line();
            self.bump();
            let right = self.parse_application()?;
            left = ExprLoc::new(
                line,
                Expr::Pipe {
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        }
        Ok(left)
    }

    /// `atom { atom }`, greedy; a single atom stays bare.
    fn parse_application(&mut self) -> Result<ExprLoc, SolError> {
        let first = self.parse_atom()?;
        let mut args = Vec::new();
        while self.starts_atom() {
            args.push(self.parse_atom()?);
        }
        if args.is_empty() {
            Ok(first)
        } else {
            let line = first.line;
            Ok(ExprLoc::new(
                line,
                Expr::Apply {
                    callee: Box::new(first),
                    args,
                },
            ))
        }
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                TokenKind::Ident(_)
                    | TokenKind::Int(_)
                    | TokenKind::Float(_)
                    | TokenKind::Str(_)
                    | TokenKind::FStr(_)
                    | TokenKind::Bool(_)
                    | TokenKind::Null
                    | TokenKind::Op(_)
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
            )
        )
    }

    fn parse_atom(&mut self) -> Result<ExprLoc, SolError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SolError::parse_error("expression is nested too deeply", self.line()));
        }
        self.depth += 1;
        let result = self.parse_atom_inner();
        self.depth -= 1;
        result
    }

    fn parse_atom_inner(&mut self) -> Result<ExprLoc, SolError> {
        let line = self.line();
        let Some(token) = self.bump() else {
            return Err(self.error_here("an expression"));
        };
        let expr = match token.kind {
            TokenKind::Int(i) => Expr::Literal(Literal::Int(i)),
            TokenKind::Float(f) => Expr::Literal(Literal::Float(f)),
            TokenKind::Str(s) => Expr::Literal(Literal::Str(s)),
            TokenKind::Bool(b) => Expr::Literal(Literal::Bool(b)),
            TokenKind::Null => Expr::Literal(Literal::Null),
            TokenKind::FStr(raw) => {
                let parts =
                    fstring::parse_template(&raw).map_err(|message| SolError::parse_error(message, line))?;
                if fstring::is_literal(&parts) {
                    Expr::Literal(Literal::Str(fstring::literal_text(&parts)))
                } else {
                    Expr::FString(parts)
                }
            }
            TokenKind::Op(builtin) => Expr::Builtin(builtin),
            TokenKind::Ident(name) => {
                if matches!(self.peek(), Some(TokenKind::Bar)) {
                    self.parse_path(name)?
                } else {
                    Expr::Name(name)
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                if !matches!(self.peek(), Some(TokenKind::RParen)) {
                    return Err(self.error_here("')'"));
                }
                self.bump();
                return Ok(ExprLoc::new(line, inner.expr));
            }
            TokenKind::LBracket => self.parse_array()?,
            TokenKind::LBrace => self.parse_dict()?,
            other => {
                return Err(SolError::parse_error(
                    format!("expected an expression, got {}", other.describe()),
                    line,
                ));
            }
        };
        Ok(ExprLoc::new(line, expr))
    }

    /// `IDENT { '|' ( IDENT | NUMBER | '(' expression ')' ) }`
    fn parse_path(&mut self, base: String) -> Result<Expr, SolError> {
        let mut segments = Vec::new();
        while matches!(self.peek(), Some(TokenKind::Bar)) {
            self.bump();
            let line = self.line();
            match self.bump().map(|token| token.kind) {
                Some(TokenKind::Ident(key)) => segments.push(PathSegment::Key(key)),
                Some(TokenKind::Int(i)) => segments.push(PathSegment::Index(i)),
                Some(TokenKind::Float(f)) => {
                    // a fractional component can only be a coerced dict key
                    segments.push(PathSegment::Key(ryu::Buffer::new().format(f).to_owned()));
                }
                Some(TokenKind::LParen) => {
                    let inner = self.parse_expression()?;
                    if !matches!(self.peek(), Some(TokenKind::RParen)) {
                        return Err(self.error_here("')' after the path component"));
                    }
                    self.bump();
                    segments.push(PathSegment::Dynamic(Box::new(inner)));
                }
                _ => {
                    return Err(SolError::parse_error(
                        "expected a path component: identifier, number, or '(expression)'",
                        line,
                    ));
                }
            }
        }
        Ok(Expr::Path { base, segments })
    }

    /// `'[' [ expression { ',' expression } ] ']'`
    fn parse_array(&mut self) -> Result<Expr, SolError> {
        let mut items = Vec::new();
        if matches!(self.peek(), Some(TokenKind::RBracket)) {
            self.bump();
            return Ok(Expr::Array(items));
        }
        loop {
            items.push(self.parse_expression()?);
            match self.peek() {
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                Some(TokenKind::RBracket) => {
                    self.bump();
                    return Ok(Expr::Array(items));
                }
                _ => return Err(self.error_here("',' or ']' in the array literal")),
            }
        }
    }

    /// `'{' [ pair { ',' pair } ] '}'` where `pair := key ':' expression`.
    fn parse_dict(&mut self) -> Result<Expr, SolError> {
        let mut entries = Vec::new();
        if matches!(self.peek(), Some(TokenKind::RBrace)) {
            self.bump();
            return Ok(Expr::Dict(entries));
        }
        loop {
            let key = self.parse_dict_key()?;
            if !matches!(self.peek(), Some(TokenKind::Colon)) {
                return Err(self.error_here("':' after the dict key"));
            }
            self.bump();
            let value = self.parse_expression()?;
            entries.push((key, value));
            match self.peek() {
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                Some(TokenKind::RBrace) => {
                    self.bump();
                    return Ok(Expr::Dict(entries));
                }
                _ => return Err(self.error_here("',' or '}' in the dict literal")),
            }
        }
    }

    /// Dict keys: quoted strings (slot-free), bareword identifiers as if
    /// single-quoted, and numbers coerced to their canonical decimal form.
    fn parse_dict_key(&mut self) -> Result<String, SolError> {
        let line = self.line();
        match self.bump().map(|token| token.kind) {
            Some(TokenKind::Str(key) | TokenKind::Ident(key)) => Ok(key),
            Some(TokenKind::FStr(raw)) => {
                let parts =
                    fstring::parse_template(&raw).map_err(|message| SolError::parse_error(message, line))?;
                if fstring::is_literal(&parts) {
                    Ok(fstring::literal_text(&parts))
                } else {
                    Err(SolError::parse_error(
                        "interpolation is not allowed in dict keys",
                        line,
                    ))
                }
            }
            Some(TokenKind::Int(i)) => Ok(i.to_string()),
            Some(TokenKind::Float(f)) => Ok(ryu::Buffer::new().format(f).to_owned()),
            _ => Err(SolError::parse_error(
                "expected a dict key: string, identifier, or number",
                line,
            )),
        }
    }
}

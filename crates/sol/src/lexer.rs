//! Character-level lexer for Sol source text.
//!
//! Periods terminate statements and newlines are plain whitespace, so the
//! lexer's main duties are string scanning (both quote forms may span lines),
//! comment stripping, and deciding whether a `-` starts a negative number
//! literal or is the subtraction operator.

use crate::{builtins::Builtins, error::SolError};

/// One lexical token with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Identifier: letter or `_` start, letters/digits/`_` continuation, and
    /// optionally a single trailing apostrophe (e.g. `res'`).
    Ident(String),
    Int(i64),
    Float(f64),
    /// Single-quoted string, escapes already processed, no interpolation.
    Str(String),
    /// Double-quoted template, raw text; slot parsing is the parser's job.
    FStr(String),
    Bool(bool),
    Null,
    If,
    Then,
    Else,
    /// An operator symbol, carried as the builtin callable it denotes.
    Op(Builtins),
    /// `=` in an assignment head.
    Assign,
    /// `.` statement terminator.
    Period,
    Comma,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// `|` path separator.
    Bar,
    /// `|>` pipeline operator.
    PipeOp,
}

impl TokenKind {
    /// Short description for "expected X, got Y" parse errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Int(i) => format!("number {i}"),
            Self::Float(f) => format!("number {f}"),
            Self::Str(_) | Self::FStr(_) => "a string".to_owned(),
            Self::Bool(b) => format!("'{b}'"),
            Self::Null => "'null'".to_owned(),
            Self::If => "'if'".to_owned(),
            Self::Then => "'then'".to_owned(),
            Self::Else => "'else'".to_owned(),
            Self::Op(op) => format!("'{op}'"),
            Self::Assign => "'='".to_owned(),
            Self::Period => "'.'".to_owned(),
            Self::Comma => "','".to_owned(),
            Self::Colon => "':'".to_owned(),
            Self::LParen => "'('".to_owned(),
            Self::RParen => "')'".to_owned(),
            Self::LBracket => "'['".to_owned(),
            Self::RBracket => "']'".to_owned(),
            Self::LBrace => "'{'".to_owned(),
            Self::RBrace => "'}'".to_owned(),
            Self::Bar => "'|'".to_owned(),
            Self::PipeOp => "'|>'".to_owned(),
        }
    }

    /// Whether a token of this kind can end a value, which decides if a
    /// following `-` is subtraction rather than a negative literal.
    fn ends_value(&self) -> bool {
        matches!(
            self,
            Self::Ident(_)
                | Self::Int(_)
                | Self::Float(_)
                | Self::Str(_)
                | Self::FStr(_)
                | Self::Bool(_)
                | Self::Null
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }
}

pub(crate) struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Tokenizes a whole source text.
    ///
    /// Consecutive statement terminators collapse to one and leading
    /// terminators are dropped, so empty statements never reach the parser.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, SolError> {
        let mut lexer = Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        };
        lexer.run()?;
        Ok(lexer.tokens)
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token { kind, line: self.line });
    }

    fn prev_ends_value(&self) -> bool {
        self.tokens.last().is_some_and(|token| token.kind.ends_value())
    }

    fn run(&mut self) -> Result<(), SolError> {
        while let Some(ch) = self.current() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '#' => {
                    while let Some(c) = self.current() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                '.' => {
                    self.advance();
                    // empty statements are elided: never two periods in a row
                    match self.tokens.last() {
                        None | Some(Token {
                            kind: TokenKind::Period,
                            ..
                        }) => {}
                        _ => self.push(TokenKind::Period),
                    }
                }
                ',' => {
                    self.advance();
                    self.push(TokenKind::Comma);
                }
                ':' => {
                    self.advance();
                    self.push(TokenKind::Colon);
                }
                '(' => {
                    self.advance();
                    self.push(TokenKind::LParen);
                }
                ')' => {
                    self.advance();
                    self.push(TokenKind::RParen);
                }
                '[' => {
                    self.advance();
                    self.push(TokenKind::LBracket);
                }
                ']' => {
                    self.advance();
                    self.push(TokenKind::RBracket);
                }
                '{' => {
                    self.advance();
                    self.push(TokenKind::LBrace);
                }
                '}' => {
                    self.advance();
                    self.push(TokenKind::RBrace);
                }
                '|' => {
                    self.advance();
                    if self.current() == Some('>') {
                        self.advance();
                        self.push(TokenKind::PipeOp);
                    } else {
                        self.push(TokenKind::Bar);
                    }
                }
                '=' => {
                    self.advance();
                    if self.current() == Some('=') {
                        self.advance();
                        self.push(TokenKind::Op(Builtins::Eq));
                    } else {
                        self.push(TokenKind::Assign);
                    }
                }
                '+' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Add));
                }
                '*' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Mul));
                }
                '/' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Div));
                }
                '%' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Mod));
                }
                '<' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Lt));
                }
                '>' => {
                    self.advance();
                    self.push(TokenKind::Op(Builtins::Gt));
                }
                '-' => {
                    if self.peek().is_some_and(|c| c.is_ascii_digit()) && !self.prev_ends_value() {
                        self.advance();
                        self.number(true)?;
                    } else {
                        self.advance();
                        self.push(TokenKind::Op(Builtins::Sub));
                    }
                }
                '\'' => self.single_string()?,
                '"' => self.double_string()?,
                c if c.is_ascii_digit() => self.number(false)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
                other => {
                    return Err(SolError::lex_error(
                        format!("unexpected character '{other}'"),
                        self.line,
                    ));
                }
            }
        }
        Ok(())
    }

    fn number(&mut self, negative: bool) -> Result<(), SolError> {
        let mut digits = String::new();
        if negative {
            digits.push('-');
        }
        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        // a '.' is part of the number only when a digit follows; otherwise it
        // is the statement terminator
        let mut is_float = false;
        if self.current() == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            digits.push('.');
            self.advance();
            while let Some(c) = self.current() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if is_float {
            let value: f64 = digits
                .parse()
                .map_err(|_| SolError::lex_error(format!("invalid number '{digits}'"), self.line))?;
            self.push(TokenKind::Float(value));
        } else {
            let value: i64 = digits
                .parse()
                .map_err(|_| SolError::lex_error(format!("number '{digits}' is out of range"), self.line))?;
            self.push(TokenKind::Int(value));
        }
        Ok(())
    }

    fn identifier(&mut self) {
        let mut name = String::new();
        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.current() == Some('\'') {
            name.push('\'');
            self.advance();
        }
        let kind = match name.as_str() {
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(name),
        };
        self.push(kind);
    }

    /// Scans a single-quoted string, processing escapes. No interpolation.
    fn single_string(&mut self) -> Result<(), SolError> {
        let start_line = self.line;
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some('\\') => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(other) => text.push(other),
                    None => return Err(unterminated(start_line)),
                },
                Some(other) => text.push(other),
                None => return Err(unterminated(start_line)),
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::Str(text),
            line: start_line,
        });
        Ok(())
    }

    /// Scans a double-quoted template, keeping the text raw so the parser can
    /// process slots and escapes together (`\{` must still suppress a slot).
    fn double_string(&mut self) -> Result<(), SolError> {
        let start_line = self.line;
        self.advance();
        let mut raw = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('"') => raw.push('"'),
                    Some(other) => {
                        raw.push('\\');
                        raw.push(other);
                    }
                    None => return Err(unterminated(start_line)),
                },
                Some(other) => raw.push(other),
                None => return Err(unterminated(start_line)),
            }
        }
        self.tokens.push(Token {
            kind: TokenKind::FStr(raw),
            line: start_line,
        });
        Ok(())
    }
}

fn unterminated(start_line: usize) -> SolError {
    SolError::lex_error("unterminated string", start_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn periods_collapse_and_lead_nowhere() {
        assert_eq!(kinds(".. x .."), vec![TokenKind::Ident("x".to_owned()), TokenKind::Period]);
    }

    #[test]
    fn pipeline_vs_path_bar() {
        assert_eq!(
            kinds("d|x |> f"),
            vec![
                TokenKind::Ident("d".to_owned()),
                TokenKind::Bar,
                TokenKind::Ident("x".to_owned()),
                TokenKind::PipeOp,
                TokenKind::Ident("f".to_owned()),
            ]
        );
    }

    #[test]
    fn trailing_apostrophe_identifier() {
        assert_eq!(kinds("res'"), vec![TokenKind::Ident("res'".to_owned())]);
    }

    #[test]
    fn minus_is_subtraction_after_a_value() {
        assert_eq!(
            kinds("x -1"),
            vec![
                TokenKind::Ident("x".to_owned()),
                TokenKind::Op(Builtins::Sub),
                TokenKind::Int(1),
            ]
        );
        assert_eq!(kinds("[-1]"), vec![TokenKind::LBracket, TokenKind::Int(-1), TokenKind::RBracket]);
    }

    #[test]
    fn number_period_is_a_terminator() {
        assert_eq!(kinds("1."), vec![TokenKind::Int(1), TokenKind::Period]);
        assert_eq!(kinds("1.5."), vec![TokenKind::Float(1.5), TokenKind::Period]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("#!/usr/bin/env sol\nx. # trailing\n"),
            vec![TokenKind::Ident("x".to_owned()), TokenKind::Period]
        );
    }

    #[test]
    fn unterminated_string_reports_opening_line() {
        let err = Lexer::tokenize("x.\n'open\nmore").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, crate::error::ErrorKind::LexError);
    }

    #[test]
    fn double_equals_is_the_operator() {
        assert_eq!(
            kinds("x == 1"),
            vec![
                TokenKind::Ident("x".to_owned()),
                TokenKind::Op(Builtins::Eq),
                TokenKind::Int(1),
            ]
        );
        assert_eq!(
            kinds("x = 1"),
            vec![
                TokenKind::Ident("x".to_owned()),
                TokenKind::Assign,
                TokenKind::Int(1),
            ]
        );
    }
}

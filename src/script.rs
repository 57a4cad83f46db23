//! Lexer and evaluator for directive expressions.
//!
//! The language is deliberately small: an expression names a directive and
//! chains field accesses and builtin calls onto it, with string, integer
//! and boolean literals as the only argument forms:
//!
//! ```text
//! image.asset('cat.png').alt('a cat').linked(true)
//! ```
//!
//! Evaluation drives [`Value::access`] and [`Value::call`] and never
//! coerces between value tags. The first error value ends the expression.

use std::borrow::Cow;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Ident(&'a str),
    Str(Cow<'a, str>),
    Int(i64),
    Bool(bool),
    Dot,
    LParen,
    RParen,
    Comma,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    peeked: Option<Option<Token<'a>>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            peeked: None,
        }
    }

    fn next(&mut self) -> Result<Option<Token<'a>>, String> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token<'a>>, String> {
        if self.peeked.is_none() {
            let token = self.scan()?;
            self.peeked = Some(token);
        }
        Ok(self.peeked.as_ref().and_then(|token| token.as_ref()))
    }

    fn scan(&mut self) -> Result<Option<Token<'a>>, String> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return Ok(None);
        }

        match bytes[self.pos] {
            b'.' => {
                self.pos += 1;
                Ok(Some(Token::Dot))
            }
            b'(' => {
                self.pos += 1;
                Ok(Some(Token::LParen))
            }
            b')' => {
                self.pos += 1;
                Ok(Some(Token::RParen))
            }
            b',' => {
                self.pos += 1;
                Ok(Some(Token::Comma))
            }
            b'\'' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_int(),
            c if c == b'_' || c.is_ascii_alphabetic() => Ok(Some(self.scan_ident())),
            _ => {
                let Some(c) = self.src[self.pos..].chars().next() else {
                    return Err("unexpected end of expression".to_string());
                };
                Err(format!("unexpected character '{c}'"))
            }
        }
    }

    fn scan_ident(&mut self) -> Token<'a> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos] == b'_' || bytes[self.pos].is_ascii_alphanumeric())
        {
            self.pos += 1;
        }
        match &self.src[start..self.pos] {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            ident => Token::Ident(ident),
        }
    }

    fn scan_int(&mut self) -> Result<Option<Token<'a>>, String> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        if bytes[self.pos] == b'-' {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err("invalid integer literal".to_string());
        }
        match self.src[start..self.pos].parse::<i64>() {
            Ok(n) => Ok(Some(Token::Int(n))),
            Err(_) => Err("invalid integer literal".to_string()),
        }
    }

    /// Single-quoted string; a backslash escapes the following character.
    /// Borrows from the source unless an escape forces an owned copy.
    fn scan_string(&mut self) -> Result<Option<Token<'a>>, String> {
        self.pos += 1;
        let start = self.pos;
        let mut owned: Option<String> = None;
        let bytes = self.src.as_bytes();

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    let token = match owned {
                        Some(s) => Token::Str(Cow::Owned(s)),
                        None => Token::Str(Cow::Borrowed(&self.src[start..self.pos])),
                    };
                    self.pos += 1;
                    return Ok(Some(token));
                }
                b'\\' => {
                    let mut s = owned
                        .take()
                        .unwrap_or_else(|| self.src[start..self.pos].to_string());
                    self.pos += 1;
                    let Some(c) = self.src.get(self.pos..).and_then(|rest| rest.chars().next())
                    else {
                        return Err("unterminated string literal".to_string());
                    };
                    s.push(c);
                    self.pos += c.len_utf8();
                    owned = Some(s);
                }
                _ => {
                    let Some(c) = self.src.get(self.pos..).and_then(|rest| rest.chars().next())
                    else {
                        return Err("unterminated string literal".to_string());
                    };
                    if let Some(s) = &mut owned {
                        s.push(c);
                    }
                    self.pos += c.len_utf8();
                }
            }
        }
        Err("unterminated string literal".to_string())
    }
}

/// Evaluate a directive expression against a root value.
///
/// Syntax failures and builtin failures alike come back as [`Value::Err`];
/// the caller decides how to report them.
pub fn eval<'a>(root: Value<'a>, expression: &'a str) -> Value<'a> {
    match eval_inner(root, expression) {
        Ok(value) => value,
        Err(message) => Value::Err(message),
    }
}

fn eval_inner<'a>(root: Value<'a>, expression: &'a str) -> Result<Value<'a>, String> {
    let mut lexer = Lexer::new(expression);

    let mut current = match lexer.next()? {
        None => return Err("empty directive expression".to_string()),
        Some(Token::Ident(name)) => root.access(name),
        Some(_) => return Err("expected a directive name".to_string()),
    };

    loop {
        if current.is_err() {
            return Ok(current);
        }
        match lexer.next()? {
            None => return Ok(current),
            Some(Token::Dot) => {
                let name = match lexer.next()? {
                    Some(Token::Ident(name)) => name,
                    _ => return Err("expected a builtin name after '.'".to_string()),
                };
                if matches!(lexer.peek()?, Some(Token::LParen)) {
                    lexer.next()?;
                    let args = parse_args(&mut lexer)?;
                    current = current.call(name, &args);
                } else {
                    current = current.access(name);
                }
            }
            Some(_) => return Err("expected '.' or end of expression".to_string()),
        }
    }
}

fn parse_args<'a>(lexer: &mut Lexer<'a>) -> Result<Vec<Value<'a>>, String> {
    let mut args = Vec::new();
    if matches!(lexer.peek()?, Some(Token::RParen)) {
        lexer.next()?;
        return Ok(args);
    }
    loop {
        match lexer.next()? {
            Some(Token::Str(s)) => args.push(Value::Str(s)),
            Some(Token::Int(n)) => args.push(Value::Int(n)),
            Some(Token::Bool(b)) => args.push(Value::Bool(b)),
            None => return Err("unexpected end of expression".to_string()),
            Some(_) => {
                return Err("arguments must be string, integer or boolean literals".to_string());
            }
        }
        match lexer.next()? {
            Some(Token::Comma) => {}
            Some(Token::RParen) => return Ok(args),
            None => return Err("unexpected end of expression".to_string()),
            Some(_) => return Err("expected ',' or ')' in argument list".to_string()),
        }
    }
}

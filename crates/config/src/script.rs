//! Reading and writing the `config.js` script
//!
//! The page loads `config.js` before anything else; the script assigns the
//! client configuration to `window.CONFIG`. Writing is plain JSON inside the
//! assignment. Reading accepts what people write by hand: comments, unquoted
//! keys, single quotes and trailing commas.

use crate::client::ClientConfig;
use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;
use types::ScriptError;

/// Render a config script that assigns `config` to `window.CONFIG`
pub fn render(config: &ClientConfig) -> String {
    let body = serde_json::to_string_pretty(&config.to_value())
        .unwrap_or_else(|_| "{}".to_string());
    format!("window.CONFIG = {};\n", body)
}

/// Write a rendered config script to `path`
pub fn write<P: AsRef<Path>>(path: P, config: &ClientConfig) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render(config))
        .with_context(|| format!("Failed to write config script {}", path.display()))
}

/// Find the last assignment to the global `CONFIG` in `source` and read its value.
///
/// Only `window.CONFIG = ...` and a top-level `var CONFIG = ...` set the
/// global the page reads; `let` and `const` bindings do not. Comments and
/// string literals are skipped. Returns `Ok(None)` when the script never
/// assigns the config.
pub fn parse(source: &str) -> std::result::Result<Option<Value>, ScriptError> {
    let Some(start) = find_assignment(source)? else {
        return Ok(None);
    };

    let mut reader = LiteralReader::new(source, start);
    let value = reader.read_value()?;
    Ok(Some(value))
}

/// Parse a config script into the configuration the page would see
pub fn parse_client_config(source: &str) -> std::result::Result<Option<ClientConfig>, ScriptError> {
    Ok(parse(source)?.and_then(ClientConfig::from_value))
}

/// Read a config script from disk
pub fn read_client_config<P: AsRef<Path>>(path: P) -> Result<Option<ClientConfig>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config script {}", path.display()))?;
    let config = parse_client_config(&source)
        .with_context(|| format!("Failed to parse config script {}", path.display()))?;
    Ok(config)
}

/// Objects and arrays nested deeper than this are rejected
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
    Other,
}

/// Scan the script token by token and return the offset just past the `=`
/// of the last global `CONFIG` assignment.
fn find_assignment(source: &str) -> std::result::Result<Option<usize>, ScriptError> {
    let mut reader = LiteralReader::new(source, 0);
    let mut recent: Vec<Token> = Vec::new();
    let mut brace_depth = 0usize;
    let mut found = None;

    loop {
        reader.skip_trivia()?;
        let Some(c) = reader.peek() else {
            return Ok(found);
        };

        let token = match c {
            '\'' | '"' | '`' => {
                reader.skip_string(c);
                Token::Other
            }
            c if is_ident_start(c) => Token::Ident(reader.read_ident()),
            c if c.is_ascii_digit() => {
                reader.skip_while(is_ident_continue);
                Token::Other
            }
            '=' => {
                reader.bump();
                // `==`, `===` and `=>` are not assignments
                if matches!(reader.peek(), Some('=' | '>')) {
                    reader.skip_while(|c| c == '=' || c == '>');
                    Token::Other
                } else {
                    if assigns_global_config(&recent, brace_depth) {
                        found = Some(reader.pos);
                    }
                    Token::Punct('=')
                }
            }
            _ => {
                reader.bump();
                match c {
                    '{' => brace_depth += 1,
                    '}' => brace_depth = brace_depth.saturating_sub(1),
                    _ => {}
                }
                Token::Punct(c)
            }
        };

        recent.push(token);
        if recent.len() > 4 {
            recent.remove(0);
        }
    }
}

/// Whether the tokens before an `=` name the global `CONFIG`
fn assigns_global_config(recent: &[Token], brace_depth: usize) -> bool {
    match recent {
        [.., before, Token::Ident("window"), Token::Punct('.'), Token::Ident("CONFIG")] => {
            *before != Token::Punct('.')
        }
        [Token::Ident("window"), Token::Punct('.'), Token::Ident("CONFIG")] => true,
        [.., Token::Ident("var"), Token::Ident("CONFIG")] => brace_depth == 0,
        _ => false,
    }
}

/// Reader for a JavaScript literal value
struct LiteralReader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralReader<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos, depth: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    /// Skip a string literal without decoding it; stops at end of input
    fn skip_string(&mut self, quote: char) {
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\n' if quote != '`' => return,
                c if c == quote => return,
                _ => {}
            }
        }
    }

    fn expect_char(&mut self, wanted: char, context: &str) -> std::result::Result<(), ScriptError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(ScriptError::UnexpectedChar {
                found,
                offset: self.pos,
                expected: context.to_string(),
            }),
            None => Err(ScriptError::UnexpectedEnd {
                expected: context.to_string(),
            }),
        }
    }

    fn skip_trivia(&mut self) -> std::result::Result<(), ScriptError> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    match self.src[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => {
                            return Err(ScriptError::UnexpectedEnd {
                                expected: "end of comment".to_string(),
                            })
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_value(&mut self) -> std::result::Result<Value, ScriptError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.read_nested(Self::read_object),
            Some('[') => self.read_nested(Self::read_array),
            Some(q @ ('\'' | '"' | '`')) => self.read_string(q).map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.read_number(),
            Some(c) if is_ident_start(c) => {
                let offset = self.pos;
                let ident = self.read_ident();
                match ident {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    // NaN is falsy like null
                    "null" | "undefined" | "NaN" => Ok(Value::Null),
                    _ => Err(ScriptError::UnexpectedChar {
                        found: c,
                        offset,
                        expected: "a literal value".to_string(),
                    }),
                }
            }
            Some(found) => Err(ScriptError::UnexpectedChar {
                found,
                offset: self.pos,
                expected: "a literal value".to_string(),
            }),
            None => Err(ScriptError::UnexpectedEnd {
                expected: "a literal value".to_string(),
            }),
        }
    }

    fn read_nested(
        &mut self,
        read: fn(&mut Self) -> std::result::Result<Value, ScriptError>,
    ) -> std::result::Result<Value, ScriptError> {
        if self.depth >= MAX_NESTING {
            return Err(ScriptError::NestingTooDeep {
                limit: MAX_NESTING,
                offset: self.pos,
            });
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_object(&mut self) -> std::result::Result<Value, ScriptError> {
        self.expect_char('{', "'{'")?;
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = self.read_key()?;
            self.skip_trivia()?;
            self.expect_char(':', "':' after object key")?;
            let value = self.read_value()?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                Some(found) => {
                    return Err(ScriptError::UnexpectedChar {
                        found,
                        offset: self.pos,
                        expected: "',' or '}'".to_string(),
                    })
                }
                None => {
                    return Err(ScriptError::UnexpectedEnd {
                        expected: "'}'".to_string(),
                    })
                }
            }
        }
    }

    fn read_array(&mut self) -> std::result::Result<Value, ScriptError> {
        self.expect_char('[', "'['")?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }

            items.push(self.read_value()?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(found) => {
                    return Err(ScriptError::UnexpectedChar {
                        found,
                        offset: self.pos,
                        expected: "',' or ']'".to_string(),
                    })
                }
                None => {
                    return Err(ScriptError::UnexpectedEnd {
                        expected: "']'".to_string(),
                    })
                }
            }
        }
    }

    fn read_key(&mut self) -> std::result::Result<String, ScriptError> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.read_string(q),
            Some(c) if is_ident_start(c) => Ok(self.read_ident().to_string()),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            Some(found) => Err(ScriptError::UnexpectedChar {
                found,
                offset: self.pos,
                expected: "an object key".to_string(),
            }),
            None => Err(ScriptError::UnexpectedEnd {
                expected: "an object key".to_string(),
            }),
        }
    }

    fn read_ident(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn read_string(&mut self, quote: char) -> std::result::Result<String, ScriptError> {
        self.bump();
        let mut out = String::new();

        loop {
            let offset = self.pos;
            match self.bump() {
                None => {
                    return Err(ScriptError::UnexpectedEnd {
                        expected: format!("closing {}", quote),
                    })
                }
                Some(c) if c == quote => return Ok(out),
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    return Err(ScriptError::UnexpectedChar {
                        found: '$',
                        offset,
                        expected: "a template literal without substitutions".to_string(),
                    })
                }
                Some('\n') if quote != '`' => {
                    return Err(ScriptError::UnexpectedChar {
                        found: '\n',
                        offset,
                        expected: format!("closing {}", quote),
                    })
                }
                Some('\\') => self.read_escape(&mut out, offset)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn read_escape(&mut self, out: &mut String, offset: usize) -> std::result::Result<(), ScriptError> {
        let c = self.bump().ok_or(ScriptError::InvalidEscape { offset })?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            'x' => {
                let code = self.read_hex_digits(2, offset)?;
                out.push(char::from_u32(code).ok_or(ScriptError::InvalidEscape { offset })?);
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.bump();
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        self.bump();
                    }
                    let digits = &self.src[start..self.pos];
                    self.expect_char('}', "'}' closing unicode escape")?;
                    u32::from_str_radix(digits, 16).map_err(|_| ScriptError::InvalidEscape { offset })?
                } else {
                    let high = self.read_hex_digits(4, offset)?;
                    if (0xD800..0xDC00).contains(&high) && self.src[self.pos..].starts_with("\\u") {
                        self.pos += 2;
                        let low = self.read_hex_digits(4, offset)?;
                        0x10000 + ((high - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF)
                    } else {
                        high
                    }
                };
                out.push(char::from_u32(code).ok_or(ScriptError::InvalidEscape { offset })?);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_hex_digits(&mut self, count: usize, offset: usize) -> std::result::Result<u32, ScriptError> {
        let digits = self
            .src
            .get(self.pos..self.pos + count)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or(ScriptError::InvalidEscape { offset })?;
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| ScriptError::InvalidEscape { offset })
    }

    fn read_number(&mut self) -> std::result::Result<Value, ScriptError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        if self.src[self.pos..].starts_with("0x") || self.src[self.pos..].starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let magnitude = i64::from_str_radix(&self.src[digits_start..self.pos], 16)
                .map_err(|_| self.invalid_number(start))?;
            return Ok(Value::Number(Number::from(if negative { -magnitude } else { magnitude })));
        }

        let digits_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if matches!(self.src[..self.pos].chars().last(), Some('e' | 'E')) => {}
                _ => break,
            }
            self.bump();
        }

        let literal = &self.src[digits_start..self.pos];
        if literal.is_empty() {
            return Err(self.invalid_number(start));
        }

        if !is_float {
            if let Ok(n) = literal.parse::<i64>() {
                return Ok(Value::Number(Number::from(if negative { -n } else { n })));
            }
        }

        let n: f64 = literal.parse().map_err(|_| self.invalid_number(start))?;
        let n = if negative { -n } else { n };
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| self.invalid_number(start))
    }

    fn invalid_number(&self, start: usize) -> ScriptError {
        ScriptError::InvalidNumber {
            literal: self.src[start..self.pos].to_string(),
            offset: start,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

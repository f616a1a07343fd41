// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record representation text.
//!
//! Formats records as `Point(x=1,y=2)` and parses that text back. Record
//! names are resolved through a [`TypeLookup`] and every record is rebuilt
//! with [`Record::from_values`], so the parse fails exactly like a
//! value-based construction would.
//!
//! ```text
//! repr    := IDENT '(' [field (',' field)* [',']] ')'
//! field   := IDENT '=' value
//! value   := repr | list | INT | FLOAT | BYTES | 'true' | 'false' | 'none'
//! list    := '[' [value (',' value)* [',']] ']'
//! ```

use crate::config::CodecConfig;
use crate::error::{Result, StructError};
use crate::record::Record;
use crate::registry::TypeLookup;
use crate::value::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Representation of a record, with no whitespace.
pub fn format_record(record: &Record) -> String {
    let mut out = String::new();
    write_record(&mut out, record);
    out
}

/// Representation of a single value.
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_record(out: &mut String, record: &Record) {
    out.push_str(record.type_name());
    out.push('(');
    for (i, (name, value)) in record.fields().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(name);
        out.push('=');
        write_value(out, value);
    }
    out.push(')');
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::None => out.push_str("none"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(v) => out.push_str(&v.to_string()),
        // Debug keeps a decimal point or exponent, and round-trips exactly.
        Value::Float(v) => out.push_str(&format!("{:?}", v)),
        Value::Bytes(bytes) => write_bytes(out, bytes),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Record(record) => write_record(out, record),
    }
}

fn write_bytes(out: &mut String, bytes: &[u8]) {
    out.push_str("b\"");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0 => out.push_str("\\0"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_record(self))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a record representation, with the default nesting limit.
pub fn parse_record(text: &str, types: &dyn TypeLookup) -> Result<Record> {
    parse_record_with(text, types, &CodecConfig::default())
}

/// Parse a record representation.
pub fn parse_record_with(
    text: &str,
    types: &dyn TypeLookup,
    config: &CodecConfig,
) -> Result<Record> {
    match parse_value_with(text, types, config)? {
        Value::Record(record) => Ok(record),
        other => Err(StructError::parse(
            0,
            format!("expected a record, found {}", other.kind_name()),
        )),
    }
}

/// Parse any value representation, with the default nesting limit.
pub fn parse_value(text: &str, types: &dyn TypeLookup) -> Result<Value> {
    parse_value_with(text, types, &CodecConfig::default())
}

/// Parse any value representation.
pub fn parse_value_with(text: &str, types: &dyn TypeLookup, config: &CodecConfig) -> Result<Value> {
    let mut parser = Parser::new(text, types, config.max_repr_depth)?;
    let value = parser.parse_value()?;
    if parser.current != Token::Eof {
        return Err(StructError::parse(
            parser.offset,
            format!("unexpected {} after value", parser.current.describe()),
        ));
    }
    Ok(value)
}

/// Token types for the lexer.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Identifier(String),
    Integer(i128),
    Float(f64),
    Bytes(Vec<u8>),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Equals,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("`{}`", name),
            Self::Integer(_) => "integer".into(),
            Self::Float(_) => "float".into(),
            Self::Bytes(_) => "bytes literal".into(),
            Self::LParen => "`(`".into(),
            Self::RParen => "`)`".into(),
            Self::LBracket => "`[`".into(),
            Self::RBracket => "`]`".into(),
            Self::Comma => "`,`".into(),
            Self::Equals => "`=`".into(),
            Self::Eof => "end of input".into(),
        }
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.next_char();
            if self.peek_char() == Some('i') {
                let word = self.read_identifier();
                return match word.as_str() {
                    "inf" => Ok(Token::Float(f64::NEG_INFINITY)),
                    _ => Err(StructError::parse(start, format!("invalid number `-{}`", word))),
                };
            }
        }

        let mut is_float = false;
        self.skip_digits();
        if self.peek_char() == Some('.') {
            is_float = true;
            self.next_char();
            self.skip_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            is_float = true;
            self.next_char();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.next_char();
            }
            self.skip_digits();
        }

        let text = &self.input[start..self.pos];
        if is_float {
            text.parse()
                .map(Token::Float)
                .map_err(|_| StructError::parse(start, format!("invalid float `{}`", text)))
        } else {
            text.parse().map(Token::Integer).map_err(|_| {
                StructError::parse(start, format!("invalid integer `{}`", text))
            })
        }
    }

    fn read_hex_digit(&mut self, start: usize) -> Result<u8> {
        self.next_char()
            .and_then(|c| c.to_digit(16))
            .map(|d| d as u8)
            .ok_or_else(|| StructError::parse(start, "`\\x` needs two hex digits"))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        self.next_char(); // b
        self.next_char(); // opening quote
        let mut bytes = Vec::new();

        loop {
            let ch = match self.next_char() {
                Some(ch) => ch,
                None => return Err(StructError::parse(start, "unterminated bytes literal")),
            };
            match ch {
                '"' => return Ok(bytes),
                '\\' => {
                    let escape_at = self.pos - 1;
                    match self.next_char() {
                        Some('\\') => bytes.push(b'\\'),
                        Some('"') => bytes.push(b'"'),
                        Some('n') => bytes.push(b'\n'),
                        Some('r') => bytes.push(b'\r'),
                        Some('t') => bytes.push(b'\t'),
                        Some('0') => bytes.push(0),
                        Some('x') => {
                            let hi = self.read_hex_digit(escape_at)?;
                            let lo = self.read_hex_digit(escape_at)?;
                            bytes.push(hi << 4 | lo);
                        }
                        Some(other) => {
                            return Err(StructError::parse(
                                escape_at,
                                format!("unknown escape `\\{}`", other),
                            ))
                        }
                        None => {
                            return Err(StructError::parse(start, "unterminated bytes literal"))
                        }
                    }
                }
                other => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    /// Next token and the byte offset it starts at.
    fn next_token(&mut self) -> Result<(usize, Token)> {
        self.skip_whitespace();
        let start = self.pos;

        let ch = match self.peek_char() {
            Some(c) => c,
            None => return Ok((start, Token::Eof)),
        };

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ',' => Some(Token::Comma),
            '=' => Some(Token::Equals),
            _ => None,
        };
        if let Some(token) = single {
            self.next_char();
            return Ok((start, token));
        }

        if self.input[self.pos..].starts_with("b\"") {
            return Ok((start, Token::Bytes(self.read_bytes()?)));
        }

        if ch.is_ascii_digit() || ch == '-' {
            return Ok((start, self.read_number()?));
        }

        if ch.is_alphabetic() || ch == '_' {
            return Ok((start, Token::Identifier(self.read_identifier())));
        }

        Err(StructError::parse(
            start,
            format!("unexpected character '{}'", ch),
        ))
    }
}

/// Recursive-descent parser over the token stream.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    offset: usize,
    types: &'a dyn TypeLookup,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, types: &'a dyn TypeLookup, max_depth: usize) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let (offset, current) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            offset,
            types,
            depth: 0,
            max_depth,
        })
    }

    /// Consume the current token, returning it with its offset.
    fn advance(&mut self) -> Result<(usize, Token)> {
        let (offset, next) = self.lexer.next_token()?;
        let offset = std::mem::replace(&mut self.offset, offset);
        let token = std::mem::replace(&mut self.current, next);
        Ok((offset, token))
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        if self.current != want {
            return Err(StructError::parse(
                self.offset,
                format!("expected {}, found {}", want.describe(), self.current.describe()),
            ));
        }
        self.advance()?;
        Ok(())
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(StructError::parse(
                offset,
                format!("nesting deeper than {}", self.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        let (offset, token) = self.advance()?;
        match token {
            Token::Integer(v) => Ok(Value::Int(v)),
            Token::Float(v) => Ok(Value::Float(v)),
            Token::Bytes(bytes) => Ok(Value::Bytes(bytes)),
            Token::LBracket => self.parse_list(offset),
            Token::Identifier(name) if self.current == Token::LParen => {
                self.parse_record(offset, name).map(Value::Record)
            }
            Token::Identifier(name) => match name.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "none" => Ok(Value::None),
                "inf" => Ok(Value::Float(f64::INFINITY)),
                "NaN" => Ok(Value::Float(f64::NAN)),
                _ => Err(StructError::parse(
                    offset,
                    format!("unknown literal `{}`", name),
                )),
            },
            other => Err(StructError::parse(
                offset,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    fn parse_list(&mut self, offset: usize) -> Result<Value> {
        self.enter(offset)?;
        let mut items = Vec::new();

        while self.current != Token::RBracket {
            items.push(self.parse_value()?);
            match self.current {
                Token::Comma => {
                    self.advance()?;
                }
                Token::RBracket => {}
                _ => {
                    return Err(StructError::parse(
                        self.offset,
                        format!("expected `,` or `]`, found {}", self.current.describe()),
                    ))
                }
            }
        }
        self.advance()?;

        self.depth -= 1;
        Ok(Value::List(items))
    }

    fn parse_record(&mut self, offset: usize, name: String) -> Result<Record> {
        self.enter(offset)?;
        let record_type = self
            .types
            .lookup(&name)
            .ok_or_else(|| StructError::UnknownType(name.clone()))?;
        self.expect(Token::LParen)?;

        let mut fields: Vec<(String, Value)> = Vec::new();
        while self.current != Token::RParen {
            let (field_offset, token) = self.advance()?;
            let field = match token {
                Token::Identifier(field) => field,
                other => {
                    return Err(StructError::parse(
                        field_offset,
                        format!("expected a field name, found {}", other.describe()),
                    ))
                }
            };
            if fields.iter().any(|(seen, _)| *seen == field) {
                return Err(StructError::parse(
                    field_offset,
                    format!("field `{}` given twice", field),
                ));
            }
            self.expect(Token::Equals)?;
            let value = self.parse_value()?;
            fields.push((field, value));

            match self.current {
                Token::Comma => {
                    self.advance()?;
                }
                Token::RParen => {}
                _ => {
                    return Err(StructError::parse(
                        self.offset,
                        format!("expected `,` or `)`, found {}", self.current.describe()),
                    ))
                }
            }
        }
        self.advance()?;

        self.depth -= 1;
        Record::from_values(&record_type, fields)
    }
}

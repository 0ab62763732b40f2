use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("fn", TokenType::Function),
        ("let", TokenType::Let),
        ("true", TokenType::True),
        ("false", TokenType::False),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("for", TokenType::For),
        ("return", TokenType::Return),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Illegal,
    Eof,

    Identifier,
    Int,

    Assign,
    Plus, Minus,
    Slash, Asterisk, DoubleAsterisk, Percent,
    Bang,

    Lt, Gt,
    LtEq, GtEq,
    Eq, NotEq,

    Comma, Semicolon,
    LParen, RParen,
    LBrace, RBrace,

    // Keywords
    Function,
    Let,
    If, Else,
    For,
    Return,
    True, False,
}

impl TokenType {
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Int => "INT",
            TokenType::Assign => "=",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Slash => "/",
            TokenType::Asterisk => "*",
            TokenType::DoubleAsterisk => "**",
            TokenType::Percent => "%",
            TokenType::Bang => "!",
            TokenType::Lt => "<",
            TokenType::Gt => ">",
            TokenType::LtEq => "<=",
            TokenType::GtEq => ">=",
            TokenType::Eq => "==",
            TokenType::NotEq => "!=",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::Function => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::For => "FOR",
            TokenType::Return => "RETURN",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up a scanned word in the keyword table, falling back to an identifier.
pub fn lookup_identifier(word: &str) -> TokenType {
    KEYWORDS.get(word).copied().unwrap_or(TokenType::Identifier)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn eof() -> Token {
        Token::new(TokenType::Eof, String::new(), TokenPos::begin(), TokenPos::begin())
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("EOF"),
            _ => write!(f, "{} `{}`", self.token_type, self.source),
        }
    }
}

/// One-directional cursor over a source string.
///
/// Once the end of input is reached, [`Lexer::next_token`] keeps returning `EOF`.
pub struct Lexer<'source> {
    input: &'source str,
    chars: Peekable<Chars<'source>>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,

    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,
            chars: source.chars().peekable(),

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),

            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return self.make_token(TokenType::Eof),
        };

        match c {
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),

            '*' => if self.expect('*') { self.make_token(TokenType::DoubleAsterisk) } else {
                self.make_token(TokenType::Asterisk)
            },
            '=' => if self.expect('=') { self.make_token(TokenType::Eq) } else {
                self.make_token(TokenType::Assign)
            },
            '!' => if self.expect('=') { self.make_token(TokenType::NotEq) } else {
                self.make_token(TokenType::Bang)
            },
            '<' => if self.expect('=') { self.make_token(TokenType::LtEq) } else {
                self.make_token(TokenType::Lt)
            },
            '>' => if self.expect('=') { self.make_token(TokenType::GtEq) } else {
                self.make_token(TokenType::Gt)
            },

            '0'..='9' => self.scan_number(),
            c if util::is_alphabetic(c) => self.scan_identifier(),

            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            let _ = self.consume();
        }

        self.make_token(TokenType::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            let _ = self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        self.make_token(lookup_identifier(name))
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        self.chars.next().map(|c| {
            self.current_index += c.len_utf8();

            if c == '\n' {
                self.current_pos.line += 1;
                self.current_pos.column = 1;
            } else {
                self.current_pos.column += 1;
            }

            c
        })
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume().is_some()
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !util::is_whitespace(c) {
                return;
            }

            let _ = self.consume();
        }
    }
}

/// Yields every token up to and including the first `EOF`.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();

        if token.token_type() == TokenType::Eof {
            self.finished = true;
        }

        Some(token)
    }
}

use std::iter::Enumerate;
use std::str::Lines;

use phf::{phf_map, Map};
use tracing::trace;

use crate::error::Error;
use crate::token::Token;

/// Number of leading spaces making up one indentation level.
pub const INDENT_WIDTH: usize = 2;

static KEYWORDS: Map<&'static str, Token> = phf_map! {
    "class" => Token::Class,
    "return" => Token::Return,
    "if" => Token::If,
    "else" => Token::Else,
    "def" => Token::Def,
    "print" => Token::Print,
    "and" => Token::And,
    "or" => Token::Or,
    "not" => Token::Not,
    "None" => Token::None,
    "True" => Token::True,
    "False" => Token::False,
};

/// Indentation aware lexer. Source is consumed one non-empty line at a time and tokens are
/// produced lazily, so a parser drives it with `next_token` and inspects `current_token`.
pub struct Lexer<'a> {
    lines: Enumerate<Lines<'a>>,

    // The line being scanned, `pos` is a byte offset into it. The line terminator is not part of
    // `line`, it is synthesized once the line is exhausted and `newline_consumed` records that.
    line: &'a str,
    pos: usize,
    line_no: usize,
    newline_consumed: bool,

    // `indent` counts the Indent tokens emitted so far minus the Dedents, `new_indent` is the level
    // of the line being scanned. The difference is paid out one token per call.
    indent: usize,
    new_indent: usize,

    current: Token,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer and primes the first token.
    pub fn new(src: &'a str) -> Result<Self, Error> {
        let mut lexer = Lexer {
            lines: src.lines().enumerate(),
            line: "",
            pos: 0,
            line_no: 0,
            newline_consumed: true,
            indent: 0,
            new_indent: 0,
            current: Token::Newline,
        };

        lexer.next_token()?;
        Ok(lexer)
    }

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.current = self.read_token()?;
        Ok(self.current.clone())
    }

    /// Line number (1-based) of the line the current token was read from.
    pub fn line(&self) -> usize {
        self.line_no
    }

    pub fn expect(&self, expected: &Token) -> Result<&Token, Error> {
        if &self.current == expected {
            Ok(&self.current)
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    pub fn expect_next(&mut self, expected: &Token) -> Result<&Token, Error> {
        self.next_token()?;
        self.expect(expected)
    }

    pub fn expect_id(&self) -> Result<&str, Error> {
        match &self.current {
            Token::Id(id) => Ok(id),
            _ => Err(self.unexpected(String::from("identifier"))),
        }
    }

    pub fn expect_next_id(&mut self) -> Result<&str, Error> {
        self.next_token()?;
        self.expect_id()
    }

    /// Turns the lexer into an iterator over every token, starting with the already primed one
    /// and ending with `Eof`.
    pub fn tokens(self) -> Tokens<'a> {
        Tokens {
            lexer: self,
            started: false,
            done: false,
            error: None,
        }
    }

    fn unexpected(&self, expected: String) -> Error {
        Error::UnexpectedToken {
            expected,
            found: self.current.clone(),
            line: self.line_no,
        }
    }

    fn read_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.indent < self.new_indent {
                self.indent += 1;
                return Ok(Token::Indent);
            } else if self.indent > self.new_indent {
                self.indent -= 1;
                return Ok(Token::Dedent);
            }

            let c = match self.advance() {
                Some(c) => c,
                None => {
                    if !self.next_line() {
                        // Close every open block before the final Eof, which is then returned on
                        // every later call.
                        self.new_indent = 0;
                        if self.indent == 0 {
                            return Ok(Token::Eof);
                        }
                    }
                    continue;
                }
            };

            let token = match c {
                '\n' => Token::Newline,

                ' ' => continue,

                '#' => {
                    self.pos = self.line.len();
                    self.newline_consumed = true;
                    Token::Newline
                }

                '=' | '!' | '<' | '>' if self.match_char('=') => match c {
                    '=' => Token::Eq,
                    '!' => Token::NotEq,
                    '<' => Token::LessOrEq,
                    _ => Token::GreaterOrEq,
                },

                '"' | '\'' => self.string(c)?,

                c if c.is_ascii_digit() => self.number()?,

                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

                c => Token::Char(c),
            };

            return Ok(token);
        }
    }

    // Moves to the next line holding something other than spaces or a comment. Returns false once
    // the input is exhausted.
    fn next_line(&mut self) -> bool {
        for (idx, line) in self.lines.by_ref() {
            let start = match line.find(|c| c != ' ') {
                Some(start) => start,
                None => continue,
            };

            if line[start..].starts_with('#') {
                continue;
            }

            self.line = line;
            self.pos = start;
            self.line_no = idx + 1;
            self.newline_consumed = false;

            let new_indent = start / INDENT_WIDTH;
            if new_indent != self.indent {
                trace!(line = self.line_no, from = self.indent, to = new_indent, "indentation change");
            }
            self.new_indent = new_indent;
            return true;
        }

        false
    }

    fn string(&mut self, quote: char) -> Result<Token, Error> {
        let mut value = String::new();

        loop {
            let c = match self.advance_in_line() {
                Some(c) => c,
                None => return Err(Error::UnterminatedString { line: self.line_no }),
            };

            if c == quote {
                break;
            }

            if c != '\\' {
                value.push(c);
                continue;
            }

            match self.advance_in_line() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('\\') => value.push('\\'),
                Some('\'') => value.push('\''),
                Some('"') => value.push('"'),
                Some(ch) => {
                    return Err(Error::UnknownEscape {
                        ch,
                        line: self.line_no,
                    })
                }
                None => return Err(Error::UnterminatedString { line: self.line_no }),
            }
        }

        Ok(Token::String(value))
    }

    fn number(&mut self) -> Result<Token, Error> {
        let start = self.pos - 1;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }

        let literal = &self.line[start..self.pos];
        literal
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|_| Error::InvalidNumber {
                literal: String::from(literal),
                line: self.line_no,
            })
    }

    fn identifier(&mut self) -> Token {
        let start = self.pos - 1;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }

        let text = &self.line[start..self.pos];
        match KEYWORDS.get(text) {
            Some(keyword) => keyword.clone(),
            None => Token::Id(String::from(text)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn advance_in_line(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    // Like `advance_in_line`, but yields the synthesized line terminator once the line runs out.
    fn advance(&mut self) -> Option<char> {
        match self.advance_in_line() {
            Some(c) => Some(c),
            None if !self.newline_consumed => {
                self.newline_consumed = true;
                Some('\n')
            }
            None => None,
        }
    }
}

/// Iterator over a lexer's tokens. Iteration stops after `Eof`, or early on a lexer error which
/// is then available through `error()`.
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    started: bool,
    done: bool,
    error: Option<Error>,
}

impl<'a> Tokens<'a> {
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.error.is_some() {
            return None;
        }

        let token = if self.started {
            self.lexer.next_token()
        } else {
            self.started = true;
            Ok(self.lexer.current_token().clone())
        };

        match token {
            Ok(token) => {
                self.done = token == Token::Eof;
                Some(token)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

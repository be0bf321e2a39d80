use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("[line {line}] unterminated string")]
    UnterminatedString { line: usize },

    #[error("[line {line}] unknown escape sequence '\\{ch}'")]
    UnknownEscape { ch: char, line: usize },

    #[error("[line {line}] invalid number literal '{literal}'")]
    InvalidNumber { literal: String, line: usize },

    #[error("[line {line}] expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: Token,
        line: usize,
    },
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::UnterminatedString { line } => *line,
            Error::UnknownEscape { line, .. } => *line,
            Error::InvalidNumber { line, .. } => *line,
            Error::UnexpectedToken { line, .. } => *line,
        }
    }
}

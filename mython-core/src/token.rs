use std::fmt::{Display, Formatter};

/// A lexical token. Two tokens are equal when they are the same variant and, for the valued
/// variants, carry the same payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(i64),
    Id(String),
    Char(char),
    String(String),

    Class,
    Return,
    If,
    Else,
    Def,
    Print,
    And,
    Or,
    Not,
    None,
    True,
    False,

    // Two character comparison operators, single `<` and `>` are plain `Char`s
    Eq,
    NotEq,
    LessOrEq,
    GreaterOrEq,

    Newline,
    Indent,
    Dedent,
    Eof,
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Token::Number(value)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(val) => write!(f, "Number{{{}}}", val),
            Token::Id(val) => write!(f, "Id{{{}}}", val),
            Token::Char(val) => write!(f, "Char{{{}}}", val),
            Token::String(val) => write!(f, "String{{{}}}", val),
            Token::Class => write!(f, "Class"),
            Token::Return => write!(f, "Return"),
            Token::If => write!(f, "If"),
            Token::Else => write!(f, "Else"),
            Token::Def => write!(f, "Def"),
            Token::Print => write!(f, "Print"),
            Token::And => write!(f, "And"),
            Token::Or => write!(f, "Or"),
            Token::Not => write!(f, "Not"),
            Token::None => write!(f, "None"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::Eq => write!(f, "Eq"),
            Token::NotEq => write!(f, "NotEq"),
            Token::LessOrEq => write!(f, "LessOrEq"),
            Token::GreaterOrEq => write!(f, "GreaterOrEq"),
            Token::Newline => write!(f, "Newline"),
            Token::Indent => write!(f, "Indent"),
            Token::Dedent => write!(f, "Dedent"),
            Token::Eof => write!(f, "Eof"),
        }
    }
}

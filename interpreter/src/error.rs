use std::io;

use thiserror::Error;

use crate::value::ObjectHolder;

/// Broad classes of runtime failure. Every error aborts the whole run, the kind only tells the
/// driver what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Name,
    Type,
    Division,
    Overflow,
    Dispatch,
    Comparison,
    Recursion,
    Control,
    Io,
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("name '{name}' is not defined")]
    NameError { name: String },

    #[error("unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'")]
    UnsupportedOperands {
        op: &'static str,
        lhs: String,
        rhs: String,
    },

    #[error("division by zero: divisor {divisor} is not positive")]
    DivisionByZero { divisor: i64 },

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    #[error("class {class} has no method {method} taking {arity} argument(s)")]
    MethodNotFound {
        class: String,
        method: String,
        arity: usize,
    },

    #[error("cannot {action} on a value of type '{type_name}'")]
    NotAnInstance {
        type_name: String,
        action: String,
    },

    #[error("cannot compare '{lhs}' and '{rhs}' with {comparison}")]
    NotComparable {
        lhs: String,
        rhs: String,
        comparison: &'static str,
    },

    #[error("{method} must return bool, got '{type_name}'")]
    BadDunderResult {
        method: &'static str,
        type_name: String,
    },

    #[error("maximum call depth of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error("return outside of a method body")]
    ReturnOutsideMethod,

    #[error("output error: {msg}")]
    Output { msg: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NameError { .. } => ErrorKind::Name,
            Error::UnsupportedOperands { .. } | Error::BadDunderResult { .. } => ErrorKind::Type,
            Error::DivisionByZero { .. } => ErrorKind::Division,
            Error::Overflow { .. } => ErrorKind::Overflow,
            Error::MethodNotFound { .. } | Error::NotAnInstance { .. } => ErrorKind::Dispatch,
            Error::NotComparable { .. } => ErrorKind::Comparison,
            Error::RecursionLimit { .. } => ErrorKind::Recursion,
            Error::ReturnOutsideMethod => ErrorKind::Control,
            Error::Output { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn unsupported(op: &'static str, lhs: &ObjectHolder, rhs: &ObjectHolder) -> Self {
        Error::UnsupportedOperands {
            op,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }
    }

    pub(crate) fn not_comparable(
        comparison: &'static str,
        lhs: &ObjectHolder,
        rhs: &ObjectHolder,
    ) -> Self {
        Error::NotComparable {
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
            comparison,
        }
    }

    pub(crate) fn not_an_instance(value: &ObjectHolder, action: String) -> Self {
        Error::NotAnInstance {
            type_name: value.type_name(),
            action,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Output {
            msg: value.to_string(),
        }
    }
}

/// Ways an execution can leave a node early. `Return` is ordinary control flow carrying the
/// returned value up to the enclosing method body, everything else is a failure.
#[derive(Debug)]
pub(crate) enum Unwind {
    Return(ObjectHolder),
    Error(Error),
}

impl From<Error> for Unwind {
    fn from(value: Error) -> Self {
        Unwind::Error(value)
    }
}

impl From<io::Error> for Unwind {
    fn from(value: io::Error) -> Self {
        Unwind::Error(Error::from(value))
    }
}

pub type RuntimeResult<T> = Result<T, Error>;
pub(crate) type ExecResult = Result<ObjectHolder, Unwind>;

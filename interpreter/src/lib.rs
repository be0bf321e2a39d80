pub mod ast;
pub mod class;
pub mod closure;
pub mod compare;
pub mod context;
pub mod error;
mod interpreter;
pub mod limits;
pub mod value;

pub use ast::{ArithmeticOp, Statement};
pub use class::{Class, ClassInstance, Method};
pub use closure::Closure;
pub use compare::Comparator;
pub use context::Context;
pub use error::{Error, ErrorKind, RuntimeResult};
pub use value::{Object, ObjectHolder};

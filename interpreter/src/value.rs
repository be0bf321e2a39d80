use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::ptr;
use std::rc::{Rc, Weak};

use crate::class::{Class, ClassInstance};
use crate::context::Context;
use crate::error::RuntimeResult;

pub(crate) const STR_METHOD: &str = "__str__";

pub enum Object {
    Number(i64),
    Str(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Number(val) => write!(f, "Number({})", val),
            Object::Str(val) => write!(f, "Str({:?})", val),
            Object::Bool(val) => write!(f, "Bool({})", val),
            Object::Class(class) => write!(f, "Class({})", class.name()),
            Object::Instance(instance) => write!(f, "{:?}", instance),
        }
    }
}

// An owned handle keeps the object alive, a shared one only points at an object some other
// holder owns. Shared handles are how `self` is bound inside a method call, and they read as
// `None` once the owner is gone.
#[derive(Clone)]
enum Handle {
    Owned(Rc<Object>),
    Shared(Weak<Object>),
}

/// Nullable handle to a runtime object, where null is the language's `None`.
#[derive(Clone, Default)]
pub struct ObjectHolder(Option<Handle>);

impl ObjectHolder {
    pub fn own(object: Object) -> Self {
        ObjectHolder(Some(Handle::Owned(Rc::new(object))))
    }

    /// Aliases an object without taking part in its ownership.
    pub fn share(object: &Rc<Object>) -> Self {
        ObjectHolder(Some(Handle::Shared(Rc::downgrade(object))))
    }

    pub fn none() -> Self {
        ObjectHolder(None)
    }

    pub fn get(&self) -> Option<Rc<Object>> {
        match &self.0 {
            Some(Handle::Owned(object)) => Some(Rc::clone(object)),
            Some(Handle::Shared(object)) => object.upgrade(),
            None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.get().is_none()
    }

    pub fn as_number(&self) -> Option<i64> {
        match self.get().as_deref() {
            Some(Object::Number(val)) => Some(*val),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.get().as_deref() {
            Some(Object::Bool(val)) => Some(*val),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self.get().as_deref() {
            Some(Object::Str(val)) => Some(val.clone()),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<Rc<Class>> {
        match self.get().as_deref() {
            Some(Object::Class(class)) => Some(Rc::clone(class)),
            _ => None,
        }
    }

    pub fn is_instance(&self) -> bool {
        matches!(self.get().as_deref(), Some(Object::Instance(_)))
    }

    /// Truthiness: non-zero numbers, non-empty strings and `True` are true, everything else,
    /// classes, instances and `None` included, is false.
    pub fn is_true(&self) -> bool {
        match self.get().as_deref() {
            Some(Object::Number(val)) => *val != 0,
            Some(Object::Bool(val)) => *val,
            Some(Object::Str(val)) => !val.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> String {
        match self.get().as_deref() {
            Some(Object::Number(_)) => String::from("int"),
            Some(Object::Str(_)) => String::from("str"),
            Some(Object::Bool(_)) => String::from("bool"),
            Some(Object::Class(_)) => String::from("class"),
            Some(Object::Instance(instance)) => String::from(instance.class().name()),
            None => String::from("NoneType"),
        }
    }

    /// Writes the printable form of the object. Instances go through their `__str__` method
    /// when they have one, which is why printing needs the execution context.
    pub fn print(&self, out: &mut dyn Write, ctx: &mut Context) -> RuntimeResult<()> {
        let object = match self.get() {
            Some(object) => object,
            None => {
                write!(out, "None")?;
                return Ok(());
            }
        };

        match object.as_ref() {
            Object::Number(val) => write!(out, "{}", val)?,
            Object::Str(val) => write!(out, "{}", val)?,
            Object::Bool(true) => write!(out, "True")?,
            Object::Bool(false) => write!(out, "False")?,
            Object::Class(class) => write!(out, "Class {}", class.name())?,
            Object::Instance(instance) => {
                if instance.has_method(STR_METHOD, 0) {
                    self.call(STR_METHOD, Vec::new(), ctx)?.print(out, ctx)?;
                } else {
                    write!(
                        out,
                        "<{} object at {:p}>",
                        instance.class().name(),
                        Rc::as_ptr(&object)
                    )?;
                }
            }
        }

        Ok(())
    }

    pub fn to_display_string(&self, ctx: &mut Context) -> RuntimeResult<String> {
        let mut buf: Vec<u8> = Vec::new();
        self.print(&mut buf, ctx)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

// Identity for classes and instances, value equality for the rest. This is host side equality,
// the language's `==` lives in `compare`.
impl PartialEq for ObjectHolder {
    fn eq(&self, other: &Self) -> bool {
        match (self.get(), other.get()) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => match (lhs.as_ref(), rhs.as_ref()) {
                (Object::Number(lhs), Object::Number(rhs)) => lhs == rhs,
                (Object::Str(lhs), Object::Str(rhs)) => lhs == rhs,
                (Object::Bool(lhs), Object::Bool(rhs)) => lhs == rhs,
                (Object::Class(lhs), Object::Class(rhs)) => Rc::ptr_eq(lhs, rhs),
                (Object::Instance(_), Object::Instance(_)) => ptr::eq(lhs.as_ref(), rhs.as_ref()),
                _ => false,
            },
            _ => false,
        }
    }
}

impl Debug for ObjectHolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(object) => write!(f, "{:?}", object),
            None => write!(f, "None"),
        }
    }
}

impl From<bool> for ObjectHolder {
    fn from(value: bool) -> Self {
        ObjectHolder::own(Object::Bool(value))
    }
}

impl From<String> for ObjectHolder {
    fn from(value: String) -> Self {
        ObjectHolder::own(Object::Str(value))
    }
}

impl From<&str> for ObjectHolder {
    fn from(value: &str) -> Self {
        ObjectHolder::own(Object::Str(String::from(value)))
    }
}

impl From<Rc<Class>> for ObjectHolder {
    fn from(value: Rc<Class>) -> Self {
        ObjectHolder::own(Object::Class(value))
    }
}

macro_rules! impl_from_num_for_holder {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for ObjectHolder {
                fn from(n: $t) -> ObjectHolder {
                    ObjectHolder::own(Object::Number(n as i64))
                }
            }
        )*
    }
}

impl_from_num_for_holder!(u8 i8 u16 i16 u32 i32 i64);

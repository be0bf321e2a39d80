use crate::context::Context;
use crate::error::{Error, RuntimeResult};
use crate::value::{Object, ObjectHolder};

const EQ_METHOD: &str = "__eq__";
const LT_METHOD: &str = "__lt__";

pub type CompareFn = fn(&ObjectHolder, &ObjectHolder, &mut Context<'_>) -> RuntimeResult<bool>;

/// The comparison a `Comparison` node applies to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl Comparator {
    pub fn function(self) -> CompareFn {
        match self {
            Comparator::Equal => equal,
            Comparator::NotEqual => not_equal,
            Comparator::Less => less,
            Comparator::Greater => greater,
            Comparator::LessOrEqual => less_or_equal,
            Comparator::GreaterOrEqual => greater_or_equal,
        }
    }

    pub fn compare(
        self,
        lhs: &ObjectHolder,
        rhs: &ObjectHolder,
        ctx: &mut Context,
    ) -> RuntimeResult<bool> {
        (self.function())(lhs, rhs, ctx)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::Less => "<",
            Comparator::Greater => ">",
            Comparator::LessOrEqual => "<=",
            Comparator::GreaterOrEqual => ">=",
        }
    }
}

// Calls a comparison dunder method on `lhs`, which has to answer with a bool.
fn delegate(
    method: &'static str,
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    ctx: &mut Context,
) -> RuntimeResult<bool> {
    let result = lhs.call(method, vec![rhs.clone()], ctx)?;
    result.as_bool().ok_or_else(|| Error::BadDunderResult {
        method,
        type_name: result.type_name(),
    })
}

pub fn equal(lhs: &ObjectHolder, rhs: &ObjectHolder, ctx: &mut Context) -> RuntimeResult<bool> {
    let (left, right) = (lhs.get(), rhs.get());
    match (left.as_deref(), right.as_deref()) {
        (None, None) => Ok(true),
        (Some(Object::Number(l)), Some(Object::Number(r))) => Ok(l == r),
        (Some(Object::Bool(l)), Some(Object::Bool(r))) => Ok(l == r),
        (Some(Object::Str(l)), Some(Object::Str(r))) => Ok(l == r),
        (Some(Object::Instance(instance)), _) if instance.has_method(EQ_METHOD, 1) => {
            delegate(EQ_METHOD, lhs, rhs, ctx)
        }
        _ => Err(Error::not_comparable("==", lhs, rhs)),
    }
}

/// Ordering. `None` is never ordered, booleans order as 0 and 1.
pub fn less(lhs: &ObjectHolder, rhs: &ObjectHolder, ctx: &mut Context) -> RuntimeResult<bool> {
    let (left, right) = (lhs.get(), rhs.get());
    match (left.as_deref(), right.as_deref()) {
        (Some(Object::Number(l)), Some(Object::Number(r))) => Ok(l < r),
        (Some(Object::Bool(l)), Some(Object::Bool(r))) => Ok((*l as u8) < (*r as u8)),
        (Some(Object::Str(l)), Some(Object::Str(r))) => Ok(l < r),
        (Some(Object::Instance(instance)), Some(_)) if instance.has_method(LT_METHOD, 1) => {
            delegate(LT_METHOD, lhs, rhs, ctx)
        }
        _ => Err(Error::not_comparable("<", lhs, rhs)),
    }
}

pub fn not_equal(lhs: &ObjectHolder, rhs: &ObjectHolder, ctx: &mut Context) -> RuntimeResult<bool> {
    Ok(!equal(lhs, rhs, ctx)?)
}

pub fn greater(lhs: &ObjectHolder, rhs: &ObjectHolder, ctx: &mut Context) -> RuntimeResult<bool> {
    Ok(!less(lhs, rhs, ctx)? && not_equal(lhs, rhs, ctx)?)
}

pub fn less_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    ctx: &mut Context,
) -> RuntimeResult<bool> {
    Ok(less(lhs, rhs, ctx)? || equal(lhs, rhs, ctx)?)
}

// Deliberately just the negation of `less`, without consulting `equal`.
pub fn greater_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    ctx: &mut Context,
) -> RuntimeResult<bool> {
    Ok(!less(lhs, rhs, ctx)?)
}

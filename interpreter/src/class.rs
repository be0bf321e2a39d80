use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use tracing::trace;

use crate::ast::Statement;
use crate::closure::Closure;
use crate::context::Context;
use crate::error::{Error, RuntimeResult};
use crate::value::{Object, ObjectHolder};

#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Statement,
}

impl Method {
    pub fn new(name: &str, formal_params: &[&str], body: Statement) -> Self {
        Method {
            name: String::from(name),
            formal_params: formal_params.iter().map(|param| String::from(*param)).collect(),
            body,
        }
    }

    pub fn arity(&self) -> usize {
        self.formal_params.len()
    }
}

pub struct Class {
    name: String,
    methods: Vec<Method>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: &str, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Rc<Self> {
        Rc::new(Class {
            name: String::from(name),
            methods,
            parent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }

    /// Finds a method by name in this class or the nearest ancestor that declares it.
    pub fn get_method(&self, name: &str) -> Option<&Method> {
        let mut class = self;
        loop {
            if let Some(method) = class.methods.iter().find(|method| method.name == name) {
                return Some(method);
            }
            class = class.parent.as_deref()?;
        }
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field(
                "methods",
                &self.methods.iter().map(|m| &m.name).collect::<Vec<_>>(),
            )
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

pub struct ClassInstance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl ClassInstance {
    pub fn new(class: Rc<Class>) -> Self {
        ClassInstance {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    /// True when a method called `name` resolves and declares exactly `arity` parameters.
    pub fn has_method(&self, name: &str, arity: usize) -> bool {
        matches!(self.class.get_method(name), Some(method) if method.arity() == arity)
    }
}

// Fields are listed by name only, an instance may well hold itself in one of them.
impl Debug for ClassInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields.borrow();
        let mut names: Vec<&str> = fields.names().collect();
        names.sort_unstable();
        write!(f, "{} {{ {} }}", self.class.name(), names.join(", "))
    }
}

impl ObjectHolder {
    /// Calls `method` on the instance this holder refers to. The method runs in a fresh closure
    /// holding the positional arguments and `self`, which aliases the receiver.
    pub fn call(
        &self,
        method: &str,
        args: Vec<ObjectHolder>,
        ctx: &mut Context,
    ) -> RuntimeResult<ObjectHolder> {
        let receiver = match self.get() {
            Some(receiver) => receiver,
            None => {
                return Err(Error::not_an_instance(
                    self,
                    format!("call method '{}'", method),
                ))
            }
        };

        let (body, mut closure) = bind_call(self, &receiver, method, args, ctx.depth())?;
        ctx.enter_call()?;
        let result = body.execute(&mut closure, ctx);
        ctx.leave_call();
        result
    }
}

// Resolves the method and builds its scope. Kept out of `call` so none of this stays on the
// native stack while the body runs.
#[inline(never)]
fn bind_call<'r>(
    holder: &ObjectHolder,
    receiver: &'r Rc<Object>,
    method: &str,
    args: Vec<ObjectHolder>,
    depth: usize,
) -> RuntimeResult<(&'r Statement, Closure)> {
    let instance = match receiver.as_ref() {
        Object::Instance(instance) => instance,
        _ => {
            return Err(Error::not_an_instance(
                holder,
                format!("call method '{}'", method),
            ))
        }
    };

    let class = instance.class();
    let target = match class.get_method(method) {
        Some(target) if target.arity() == args.len() => target,
        _ => {
            return Err(Error::MethodNotFound {
                class: String::from(class.name()),
                method: String::from(method),
                arity: args.len(),
            })
        }
    };

    let mut closure = Closure::new();
    closure.define("self", ObjectHolder::share(receiver));
    for (param, arg) in target.formal_params.iter().zip(args) {
        closure.define(param, arg);
    }

    trace!(class = class.name(), method, depth, "call");
    Ok((&target.body, closure))
}

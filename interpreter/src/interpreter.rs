use std::rc::Rc;

use tracing::debug;
#[cfg(feature = "trace-execution")]
use tracing::trace;

use crate::ast::{ArithmeticOp, Statement};
use crate::class::{Class, ClassInstance};
use crate::closure::Closure;
use crate::compare::Comparator;
use crate::context::Context;
use crate::error::{Error, ExecResult, RuntimeResult, Unwind};
use crate::value::{Object, ObjectHolder};

const INIT_METHOD: &str = "__init__";
const ADD_METHOD: &str = "__add__";

impl Statement {
    /// Executes the node against `closure`. This is the entry point for a driver running a whole
    /// program as well as for method calls running a method body.
    pub fn execute(&self, closure: &mut Closure, ctx: &mut Context) -> RuntimeResult<ObjectHolder> {
        match self.exec(closure, ctx) {
            Ok(value) => Ok(value),
            Err(Unwind::Return(_)) => Err(Error::ReturnOutsideMethod),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    // `Unwind::Return` travels through every node untouched until a `MethodBody` catches it.
    // Every nested method call passes through this frame several times, so each arm only
    // forwards to a helper and keeps no locals of its own.
    pub(crate) fn exec(&self, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
        #[cfg(feature = "trace-execution")]
        trace!(node = self.kind(), depth = ctx.depth(), "execute");

        match self {
            Statement::Constant { value } => Ok(value.clone()),
            Statement::None => Ok(ObjectHolder::none()),
            Statement::Assignment { var, value } => assignment(var, value, closure, ctx),
            Statement::VariableValue { dotted_ids } => {
                variable_value(dotted_ids, closure).map_err(Unwind::from)
            }
            Statement::FieldAssignment {
                object,
                field,
                value,
            } => field_assignment(object, field, value, closure, ctx),
            Statement::Print { args } => print(args, closure, ctx),
            Statement::MethodCall {
                object,
                method,
                args,
            } => method_call(object, method, args, closure, ctx),
            Statement::NewInstance { class, args } => new_instance(class, args, closure, ctx),
            Statement::Stringify { argument } => stringify(argument, closure, ctx),
            Statement::Arithmetic { op, lhs, rhs } => arithmetic(*op, lhs, rhs, closure, ctx),
            // Both operands are always evaluated, there is no short circuit.
            Statement::Or { lhs, rhs } => logical(lhs, rhs, |l, r| l || r, closure, ctx),
            Statement::And { lhs, rhs } => logical(lhs, rhs, |l, r| l && r, closure, ctx),
            Statement::Not { argument } => not(argument, closure, ctx),
            Statement::Comparison {
                comparator,
                lhs,
                rhs,
            } => comparison(*comparator, lhs, rhs, closure, ctx),
            Statement::Compound { statements } => compound(statements, closure, ctx),
            Statement::Return { value } => return_(value, closure, ctx),
            Statement::ClassDefinition { class } => Ok(class_definition(class, closure)),
            Statement::IfElse {
                condition,
                if_body,
                else_body,
            } => if_else(condition, if_body, else_body.as_deref(), closure, ctx),
            Statement::MethodBody { body } => method_body(body, closure, ctx),
        }
    }

    #[cfg(feature = "trace-execution")]
    fn kind(&self) -> &'static str {
        match self {
            Statement::Constant { .. } => "Constant",
            Statement::None => "None",
            Statement::Assignment { .. } => "Assignment",
            Statement::VariableValue { .. } => "VariableValue",
            Statement::FieldAssignment { .. } => "FieldAssignment",
            Statement::Print { .. } => "Print",
            Statement::MethodCall { .. } => "MethodCall",
            Statement::NewInstance { .. } => "NewInstance",
            Statement::Stringify { .. } => "Stringify",
            Statement::Arithmetic { .. } => "Arithmetic",
            Statement::Or { .. } => "Or",
            Statement::And { .. } => "And",
            Statement::Not { .. } => "Not",
            Statement::Comparison { .. } => "Comparison",
            Statement::Compound { .. } => "Compound",
            Statement::Return { .. } => "Return",
            Statement::ClassDefinition { .. } => "ClassDefinition",
            Statement::IfElse { .. } => "IfElse",
            Statement::MethodBody { .. } => "MethodBody",
        }
    }
}

fn exec_args(
    args: &[Statement],
    closure: &mut Closure,
    ctx: &mut Context,
) -> Result<Vec<ObjectHolder>, Unwind> {
    let mut evaluated = Vec::with_capacity(args.len());
    for arg in args {
        evaluated.push(arg.exec(closure, ctx)?);
    }
    Ok(evaluated)
}

#[inline(never)]
fn assignment(var: &str, value: &Statement, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    let value = value.exec(closure, ctx)?;
    closure.define(var, value.clone());
    Ok(value)
}

// The first segment is a variable, every following one a field of the instance before it.
#[inline(never)]
fn variable_value(dotted_ids: &[String], closure: &Closure) -> RuntimeResult<ObjectHolder> {
    let (first, fields) = match dotted_ids.split_first() {
        Some(split) => split,
        None => {
            return Err(Error::NameError {
                name: String::new(),
            })
        }
    };

    let mut value = closure.get(first).ok_or_else(|| Error::NameError {
        name: first.clone(),
    })?;

    for (idx, field) in fields.iter().enumerate() {
        let object = value.get();
        value = match object.as_deref() {
            Some(Object::Instance(instance)) => {
                instance
                    .fields()
                    .get(field)
                    .ok_or_else(|| Error::NameError {
                        name: dotted_ids[..idx + 2].join("."),
                    })?
            }
            _ => {
                let action = format!("read field '{}'", field);
                return Err(Error::not_an_instance(&value, action));
            }
        };
    }

    Ok(value)
}

#[inline(never)]
fn field_assignment(
    object: &Statement,
    field: &str,
    value: &Statement,
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let target = object.exec(closure, ctx)?;
    let holder = target.get();
    let instance = match holder.as_deref() {
        Some(Object::Instance(instance)) => instance,
        _ => {
            let action = format!("assign field '{}'", field);
            return Err(Error::not_an_instance(&target, action).into());
        }
    };

    let value = value.exec(closure, ctx)?;
    instance.fields_mut().define(field, value.clone());
    Ok(value)
}

// Arguments are separated by a space written before the next one is evaluated, so output
// produced while evaluating an argument lands where it would in a streaming implementation.
#[inline(never)]
fn print(args: &[Statement], closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            write!(ctx.output(), " ")?;
        }
        let value = arg.exec(closure, ctx)?;
        let text = value.to_display_string(ctx)?;
        write!(ctx.output(), "{}", text)?;
    }
    writeln!(ctx.output())?;

    Ok(ObjectHolder::none())
}

#[inline(never)]
fn method_call(
    object: &Statement,
    method: &str,
    args: &[Statement],
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let receiver = object.exec(closure, ctx)?;
    if !receiver.is_instance() {
        let action = format!("call method '{}'", method);
        return Err(Error::not_an_instance(&receiver, action).into());
    }
    let args = exec_args(args, closure, ctx)?;
    Ok(receiver.call(method, args, ctx)?)
}

// `__init__` runs only when one with a matching arity resolves. Otherwise the arguments are
// left unevaluated and the bare instance is the result.
#[inline(never)]
fn new_instance(
    class: &Rc<Class>,
    args: &[Statement],
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let instance = ClassInstance::new(Rc::clone(class));
    let has_init = instance.has_method(INIT_METHOD, args.len());
    let instance = ObjectHolder::own(Object::Instance(instance));
    debug!(class = class.name(), args = args.len(), has_init, "new instance");

    if has_init {
        let args = exec_args(args, closure, ctx)?;
        instance.call(INIT_METHOD, args, ctx)?;
    }

    Ok(instance)
}

#[inline(never)]
fn stringify(argument: &Statement, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    let value = argument.exec(closure, ctx)?;
    Ok(ObjectHolder::from(value.to_display_string(ctx)?))
}

#[inline(never)]
fn arithmetic(
    op: ArithmeticOp,
    lhs: &Statement,
    rhs: &Statement,
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let lhs = lhs.exec(closure, ctx)?;
    let rhs = rhs.exec(closure, ctx)?;
    Ok(apply_arithmetic(op, &lhs, &rhs, ctx)?)
}

#[inline(never)]
fn logical(
    lhs: &Statement,
    rhs: &Statement,
    combine: fn(bool, bool) -> bool,
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let lhs = lhs.exec(closure, ctx)?.is_true();
    let rhs = rhs.exec(closure, ctx)?.is_true();
    Ok(ObjectHolder::from(combine(lhs, rhs)))
}

#[inline(never)]
fn not(argument: &Statement, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    Ok(ObjectHolder::from(!argument.exec(closure, ctx)?.is_true()))
}

#[inline(never)]
fn comparison(
    comparator: Comparator,
    lhs: &Statement,
    rhs: &Statement,
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    let lhs = lhs.exec(closure, ctx)?;
    let rhs = rhs.exec(closure, ctx)?;
    Ok(ObjectHolder::from(comparator.compare(&lhs, &rhs, ctx)?))
}

#[inline(never)]
fn compound(statements: &[Statement], closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    for statement in statements {
        statement.exec(closure, ctx)?;
    }
    Ok(ObjectHolder::none())
}

#[inline(never)]
fn return_(value: &Statement, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    Err(Unwind::Return(value.exec(closure, ctx)?))
}

#[inline(never)]
fn class_definition(class: &Rc<Class>, closure: &mut Closure) -> ObjectHolder {
    debug!(class = class.name(), parent = ?class.parent().map(|p| p.name()), "define class");
    let value = ObjectHolder::from(Rc::clone(class));
    closure.define(class.name(), value.clone());
    value
}

#[inline(never)]
fn if_else(
    condition: &Statement,
    if_body: &Statement,
    else_body: Option<&Statement>,
    closure: &mut Closure,
    ctx: &mut Context,
) -> ExecResult {
    if condition.exec(closure, ctx)?.is_true() {
        if_body.exec(closure, ctx)
    } else if let Some(else_body) = else_body {
        else_body.exec(closure, ctx)
    } else {
        Ok(ObjectHolder::none())
    }
}

#[inline(never)]
fn method_body(body: &Statement, closure: &mut Closure, ctx: &mut Context) -> ExecResult {
    match body.exec(closure, ctx) {
        Ok(_) => Ok(ObjectHolder::none()),
        Err(Unwind::Return(value)) => Ok(value),
        Err(err) => Err(err),
    }
}

fn apply_arithmetic(
    op: ArithmeticOp,
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    ctx: &mut Context,
) -> RuntimeResult<ObjectHolder> {
    let (left, right) = (lhs.get(), rhs.get());
    let overflow = || Error::Overflow { op: op.symbol() };

    match (op, left.as_deref(), right.as_deref()) {
        (ArithmeticOp::Add, Some(Object::Number(l)), Some(Object::Number(r))) => {
            l.checked_add(*r).map(ObjectHolder::from).ok_or_else(overflow)
        }
        (ArithmeticOp::Add, Some(Object::Str(l)), Some(Object::Str(r))) => {
            Ok(ObjectHolder::from(format!("{}{}", l, r)))
        }
        (ArithmeticOp::Add, Some(Object::Instance(instance)), Some(_))
            if instance.has_method(ADD_METHOD, 1) =>
        {
            lhs.call(ADD_METHOD, vec![rhs.clone()], ctx)
        }
        (ArithmeticOp::Sub, Some(Object::Number(l)), Some(Object::Number(r))) => {
            l.checked_sub(*r).map(ObjectHolder::from).ok_or_else(overflow)
        }
        (ArithmeticOp::Mult, Some(Object::Number(l)), Some(Object::Number(r))) => {
            l.checked_mul(*r).map(ObjectHolder::from).ok_or_else(overflow)
        }
        // Any divisor that is not positive is rejected, negative ones included.
        (ArithmeticOp::Div, Some(Object::Number(l)), Some(Object::Number(r))) => {
            if *r > 0 {
                Ok(ObjectHolder::from(l / r))
            } else {
                Err(Error::DivisionByZero { divisor: *r })
            }
        }
        _ => Err(Error::unsupported(op.symbol(), lhs, rhs)),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::str;

    use pretty_assertions::assert_eq;

    use crate::ast::Statement;
    use crate::class::{Class, Method};
    use crate::closure::Closure;
    use crate::compare::Comparator;
    use crate::context::Context;
    use crate::error::{Error, ErrorKind};
    use crate::value::ObjectHolder;

    // Runs `program` in a fresh global scope, returning the result and everything printed.
    fn run(program: &Statement) -> (Result<ObjectHolder, Error>, String) {
        let mut output: Vec<u8> = Vec::new();
        let result = {
            let mut ctx = Context::new(&mut output);
            let mut closure = Closure::new();
            program.execute(&mut closure, &mut ctx)
        };
        (result, String::from(str::from_utf8(&output).unwrap()))
    }

    fn eval(expr: Statement) -> ObjectHolder {
        run(&expr).0.unwrap()
    }

    fn eval_err(expr: Statement) -> Error {
        run(&expr).0.unwrap_err()
    }

    fn num(value: i64) -> Statement {
        Statement::number(value)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval(Statement::add(num(1), num(2))).as_number(), Some(3));
        assert_eq!(eval(Statement::sub(num(1), num(5))).as_number(), Some(-4));
        assert_eq!(eval(Statement::mult(num(6), num(7))).as_number(), Some(42));
        assert_eq!(eval(Statement::div(num(7), num(2))).as_number(), Some(3));
        assert_eq!(eval(Statement::div(num(-7), num(2))).as_number(), Some(-3));
        assert_eq!(
            eval(Statement::add(Statement::string("a"), Statement::string("b"))).as_string(),
            Some(String::from("ab"))
        );
    }

    #[test]
    fn test_division_rejects_non_positive_divisor() {
        for divisor in [0, -1, -10] {
            assert_eq!(
                eval_err(Statement::div(num(10), num(divisor))),
                Error::DivisionByZero { divisor }
            );
        }
    }

    #[test]
    fn test_arithmetic_with_wrong_types() {
        let tests = [
            (Statement::add(num(1), Statement::string("a")), "+", "int", "str"),
            (Statement::sub(Statement::string("a"), Statement::string("b")), "-", "str", "str"),
            (Statement::mult(Statement::boolean(true), num(2)), "*", "bool", "int"),
            (Statement::div(num(1), Statement::none()), "/", "int", "NoneType"),
            (Statement::add(Statement::none(), Statement::none()), "+", "NoneType", "NoneType"),
        ];

        for (expr, op, lhs, rhs) in tests {
            let err = eval_err(expr);
            assert_eq!(err.kind(), ErrorKind::Type);
            assert_eq!(
                err,
                Error::UnsupportedOperands {
                    op,
                    lhs: String::from(lhs),
                    rhs: String::from(rhs),
                }
            );
        }
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            eval_err(Statement::add(num(i64::MAX), num(1))),
            Error::Overflow { op: "+" }
        );
        assert_eq!(
            eval_err(Statement::mult(num(i64::MIN), num(-1))),
            Error::Overflow { op: "*" }
        );
    }

    #[test]
    fn test_logic_evaluates_both_operands() {
        let program = Statement::compound(vec![
            Statement::print(vec![Statement::or(
                Statement::boolean(true),
                Statement::print(vec![Statement::string("rhs of or")]),
            )]),
            Statement::print(vec![Statement::and(
                Statement::number(0),
                Statement::print(vec![Statement::string("rhs of and")]),
            )]),
            Statement::print(vec![Statement::not(Statement::string(""))]),
        ]);

        let (result, output) = run(&program);
        assert!(result.is_ok());
        assert_eq!(output, "rhs of or\nTrue\nrhs of and\nFalse\nTrue\n");
    }

    #[test]
    fn test_comparison_node() {
        let cmp = |comparator, lhs, rhs| eval(Statement::comparison(comparator, num(lhs), num(rhs)));

        assert_eq!(cmp(Comparator::Equal, 1, 1).as_bool(), Some(true));
        assert_eq!(cmp(Comparator::NotEqual, 1, 1).as_bool(), Some(false));
        assert_eq!(cmp(Comparator::Less, 1, 2).as_bool(), Some(true));
        assert_eq!(cmp(Comparator::Greater, 1, 2).as_bool(), Some(false));
        assert_eq!(cmp(Comparator::LessOrEqual, 2, 2).as_bool(), Some(true));
        assert_eq!(cmp(Comparator::GreaterOrEqual, 3, 2).as_bool(), Some(true));

        let err = eval_err(Statement::comparison(
            Comparator::Less,
            Statement::none(),
            num(1),
        ));
        assert_eq!(err.kind(), ErrorKind::Comparison);
    }

    #[test]
    fn test_assignment_and_variables() {
        let program = Statement::compound(vec![
            Statement::assignment("x", num(1)),
            Statement::assignment("y", Statement::variable("x")),
            Statement::assignment("x", Statement::string("two")),
            Statement::print(vec![Statement::variable("x"), Statement::variable("y")]),
        ]);

        let (result, output) = run(&program);
        assert_eq!(result.unwrap(), ObjectHolder::none());
        assert_eq!(output, "two 1\n");
    }

    #[test]
    fn test_assignment_returns_value() {
        assert_eq!(eval(Statement::assignment("x", num(9))).as_number(), Some(9));
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            eval_err(Statement::variable("nope")),
            Error::NameError {
                name: String::from("nope")
            }
        );
    }

    #[test]
    fn test_print_formats() {
        let program = Statement::print(vec![
            num(1),
            Statement::string("two"),
            Statement::boolean(false),
            Statement::none(),
        ]);

        let (_, output) = run(&program);
        assert_eq!(output, "1 two False None\n");

        let (_, output) = run(&Statement::print(Vec::new()));
        assert_eq!(output, "\n");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(
            eval(Statement::stringify(num(5))).as_string(),
            Some(String::from("5"))
        );
        assert_eq!(
            eval(Statement::stringify(Statement::none())).as_string(),
            Some(String::from("None"))
        );
        assert_eq!(
            eval(Statement::stringify(Statement::boolean(true))).as_string(),
            Some(String::from("True"))
        );
    }

    #[test]
    fn test_if_else() {
        let branch = |condition| {
            Statement::if_else(
                condition,
                Statement::print(vec![Statement::string("then")]),
                Some(Statement::print(vec![Statement::string("else")])),
            )
        };

        assert_eq!(run(&branch(num(1))).1, "then\n");
        assert_eq!(run(&branch(Statement::string(""))).1, "else\n");
        assert_eq!(run(&branch(Statement::none())).1, "else\n");

        let no_else = Statement::if_else(Statement::boolean(false), num(1), None);
        assert_eq!(eval(no_else), ObjectHolder::none());
    }

    #[test]
    fn test_return_is_caught_by_method_body_only() {
        let body = Statement::method_body(Statement::compound(vec![
            Statement::print(vec![Statement::string("before")]),
            Statement::if_else(
                Statement::boolean(true),
                Statement::compound(vec![Statement::return_(num(7))]),
                None,
            ),
            Statement::print(vec![Statement::string("after")]),
        ]));

        let (result, output) = run(&body);
        assert_eq!(result.unwrap().as_number(), Some(7));
        assert_eq!(output, "before\n");
    }

    #[test]
    fn test_method_body_without_return_is_none() {
        assert_eq!(eval(Statement::method_body(num(1))), ObjectHolder::none());
    }

    #[test]
    fn test_return_outside_method() {
        let program = Statement::compound(vec![Statement::return_(num(1))]);
        let err = eval_err(program);
        assert_eq!(err, Error::ReturnOutsideMethod);
        assert_eq!(err.kind(), ErrorKind::Control);
    }

    #[test]
    fn test_class_definition_binds_name() {
        let class = Class::new("Shape", Vec::new(), None);
        let program = Statement::compound(vec![
            Statement::class_definition(Rc::clone(&class)),
            Statement::print(vec![Statement::variable("Shape")]),
        ]);

        let (result, output) = run(&program);
        assert!(result.is_ok());
        assert_eq!(output, "Class Shape\n");

        let defined = eval(Statement::class_definition(Rc::clone(&class)));
        assert!(Rc::ptr_eq(&defined.as_class().unwrap(), &class));
    }

    #[test]
    fn test_fields_and_dotted_access() {
        let node = Class::new("Node", Vec::new(), None);
        let program = Statement::compound(vec![
            Statement::assignment("a", Statement::new_instance(Rc::clone(&node), Vec::new())),
            Statement::assignment("b", Statement::new_instance(Rc::clone(&node), Vec::new())),
            Statement::field_assignment(Statement::variable("b"), "value", num(3)),
            Statement::field_assignment(Statement::variable("a"), "next", Statement::variable("b")),
            Statement::print(vec![Statement::dotted(&["a", "next", "value"])]),
            Statement::field_assignment(Statement::dotted(&["a", "next"]), "value", num(4)),
            Statement::print(vec![Statement::dotted(&["b", "value"])]),
        ]);

        let (result, output) = run(&program);
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(output, "3\n4\n");
    }

    #[test]
    fn test_field_errors() {
        let node = Class::new("Node", Vec::new(), None);

        let missing = Statement::compound(vec![
            Statement::assignment("a", Statement::new_instance(Rc::clone(&node), Vec::new())),
            Statement::print(vec![Statement::dotted(&["a", "missing"])]),
        ]);
        assert_eq!(
            run(&missing).0.unwrap_err(),
            Error::NameError {
                name: String::from("a.missing")
            }
        );

        let on_number = Statement::compound(vec![
            Statement::assignment("n", num(1)),
            Statement::field_assignment(Statement::variable("n"), "x", num(2)),
        ]);
        assert_eq!(run(&on_number).0.unwrap_err().kind(), ErrorKind::Dispatch);

        let read_number = Statement::compound(vec![
            Statement::assignment("n", num(1)),
            Statement::dotted(&["n", "x"]),
        ]);
        assert_eq!(run(&read_number).0.unwrap_err().kind(), ErrorKind::Dispatch);
    }

    #[test]
    fn test_method_call_on_non_instance_skips_arguments() {
        let program = Statement::method_call(
            num(1),
            "go",
            vec![Statement::print(vec![Statement::string("evaluated")])],
        );

        let (result, output) = run(&program);
        assert_eq!(
            result.unwrap_err(),
            Error::NotAnInstance {
                type_name: String::from("int"),
                action: String::from("call method 'go'"),
            }
        );
        assert_eq!(output, "");
    }

    #[test]
    fn test_new_instance_init_arity() {
        let with_init = Class::new(
            "P",
            vec![Method::new(
                "__init__",
                &["x"],
                Statement::method_body(Statement::field_assignment(
                    Statement::variable("self"),
                    "x",
                    Statement::variable("x"),
                )),
            )],
            None,
        );
        let bare = Class::new("Bare", Vec::new(), None);
        let noisy_arg = || Statement::print(vec![Statement::string("evaluated")]);

        let program = Statement::compound(vec![
            Statement::assignment("p", Statement::new_instance(Rc::clone(&with_init), vec![num(1)])),
            Statement::print(vec![Statement::dotted(&["p", "x"])]),
        ]);
        let (result, output) = run(&program);
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(output, "1\n");

        // No `__init__` of that arity: the instance is built without running one and without
        // evaluating the arguments.
        let program = Statement::compound(vec![
            Statement::assignment(
                "p",
                Statement::new_instance(Rc::clone(&with_init), vec![noisy_arg(), noisy_arg()]),
            ),
            Statement::dotted(&["p", "x"]),
        ]);
        let (result, output) = run(&program);
        assert_eq!(
            result.unwrap_err(),
            Error::NameError {
                name: String::from("p.x")
            }
        );
        assert_eq!(output, "");

        assert!(eval(Statement::new_instance(Rc::clone(&with_init), Vec::new())).is_instance());
        assert!(eval(Statement::new_instance(Rc::clone(&bare), Vec::new())).is_instance());

        let (result, output) = run(&Statement::new_instance(bare, vec![noisy_arg()]));
        assert!(result.unwrap().is_instance());
        assert_eq!(output, "");
    }

    #[test]
    fn test_recursion_limit() {
        // def down(self): return self.down()
        let class = Class::new(
            "Loop",
            vec![Method::new(
                "down",
                &[],
                Statement::method_body(Statement::return_(Statement::method_call(
                    Statement::variable("self"),
                    "down",
                    Vec::new(),
                ))),
            )],
            None,
        );
        let program = Statement::method_call(Statement::new_instance(class, Vec::new()), "down", Vec::new());

        let mut output: Vec<u8> = Vec::new();
        let mut ctx = Context::new(&mut output).with_max_call_depth(16);
        let err = program.execute(&mut Closure::new(), &mut ctx).unwrap_err();

        assert_eq!(err, Error::RecursionLimit { limit: 16 });
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_add_statement() {
        let mut program = Statement::print(vec![num(1)]);
        program.add_statement(Statement::print(vec![num(2)]));
        program.add_statement(Statement::print(vec![num(3)]));

        assert!(matches!(&program, Statement::Compound { statements } if statements.len() == 3));
        assert_eq!(run(&program).1, "1\n2\n3\n");
    }
}

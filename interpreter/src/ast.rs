use std::rc::Rc;

use crate::class::Class;
use crate::compare::Comparator;
use crate::value::ObjectHolder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mult,
    Div,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mult => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

/// A node of the program tree. Expressions and statements share the one type since every node
/// evaluates to a value, `None` for the ones that are executed for their effect.
#[derive(Debug)]
pub enum Statement {
    Constant {
        value: ObjectHolder,
    },
    None,
    Assignment {
        var: String,
        value: Box<Statement>,
    },
    VariableValue {
        dotted_ids: Vec<String>,
    },
    FieldAssignment {
        object: Box<Statement>,
        field: String,
        value: Box<Statement>,
    },
    Print {
        args: Vec<Statement>,
    },
    MethodCall {
        object: Box<Statement>,
        method: String,
        args: Vec<Statement>,
    },
    NewInstance {
        class: Rc<Class>,
        args: Vec<Statement>,
    },
    Stringify {
        argument: Box<Statement>,
    },
    Arithmetic {
        op: ArithmeticOp,
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    Or {
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    And {
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    Not {
        argument: Box<Statement>,
    },
    Comparison {
        comparator: Comparator,
        lhs: Box<Statement>,
        rhs: Box<Statement>,
    },
    Compound {
        statements: Vec<Statement>,
    },
    Return {
        value: Box<Statement>,
    },
    ClassDefinition {
        class: Rc<Class>,
    },
    IfElse {
        condition: Box<Statement>,
        if_body: Box<Statement>,
        else_body: Option<Box<Statement>>,
    },
    MethodBody {
        body: Box<Statement>,
    },
}

// Creator methods, these keep the boxing out of the parser.
impl Statement {
    pub fn constant(value: ObjectHolder) -> Self {
        Statement::Constant { value }
    }

    pub fn number(value: i64) -> Self {
        Statement::constant(ObjectHolder::from(value))
    }

    pub fn string(value: &str) -> Self {
        Statement::constant(ObjectHolder::from(value))
    }

    pub fn boolean(value: bool) -> Self {
        Statement::constant(ObjectHolder::from(value))
    }

    pub fn none() -> Self {
        Statement::None
    }

    pub fn assignment(var: &str, value: Statement) -> Self {
        Statement::Assignment {
            var: String::from(var),
            value: Box::new(value),
        }
    }

    pub fn variable(name: &str) -> Self {
        Statement::VariableValue {
            dotted_ids: vec![String::from(name)],
        }
    }

    /// `a.b.c` style access, `ids` holds the segments in order.
    pub fn dotted(ids: &[&str]) -> Self {
        Statement::VariableValue {
            dotted_ids: ids.iter().map(|id| String::from(*id)).collect(),
        }
    }

    pub fn field_assignment(object: Statement, field: &str, value: Statement) -> Self {
        Statement::FieldAssignment {
            object: Box::new(object),
            field: String::from(field),
            value: Box::new(value),
        }
    }

    pub fn print(args: Vec<Statement>) -> Self {
        Statement::Print { args }
    }

    pub fn method_call(object: Statement, method: &str, args: Vec<Statement>) -> Self {
        Statement::MethodCall {
            object: Box::new(object),
            method: String::from(method),
            args,
        }
    }

    pub fn new_instance(class: Rc<Class>, args: Vec<Statement>) -> Self {
        Statement::NewInstance { class, args }
    }

    pub fn stringify(argument: Statement) -> Self {
        Statement::Stringify {
            argument: Box::new(argument),
        }
    }

    pub fn arithmetic(op: ArithmeticOp, lhs: Statement, rhs: Statement) -> Self {
        Statement::Arithmetic {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn add(lhs: Statement, rhs: Statement) -> Self {
        Statement::arithmetic(ArithmeticOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: Statement, rhs: Statement) -> Self {
        Statement::arithmetic(ArithmeticOp::Sub, lhs, rhs)
    }

    pub fn mult(lhs: Statement, rhs: Statement) -> Self {
        Statement::arithmetic(ArithmeticOp::Mult, lhs, rhs)
    }

    pub fn div(lhs: Statement, rhs: Statement) -> Self {
        Statement::arithmetic(ArithmeticOp::Div, lhs, rhs)
    }

    pub fn or(lhs: Statement, rhs: Statement) -> Self {
        Statement::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(lhs: Statement, rhs: Statement) -> Self {
        Statement::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn not(argument: Statement) -> Self {
        Statement::Not {
            argument: Box::new(argument),
        }
    }

    pub fn comparison(comparator: Comparator, lhs: Statement, rhs: Statement) -> Self {
        Statement::Comparison {
            comparator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn compound(statements: Vec<Statement>) -> Self {
        Statement::Compound { statements }
    }

    pub fn return_(value: Statement) -> Self {
        Statement::Return {
            value: Box::new(value),
        }
    }

    pub fn class_definition(class: Rc<Class>) -> Self {
        Statement::ClassDefinition { class }
    }

    pub fn if_else(condition: Statement, if_body: Statement, else_body: Option<Statement>) -> Self {
        Statement::IfElse {
            condition: Box::new(condition),
            if_body: Box::new(if_body),
            else_body: else_body.map(Box::new),
        }
    }

    pub fn method_body(body: Statement) -> Self {
        Statement::MethodBody {
            body: Box::new(body),
        }
    }

    /// Appends to a `Compound`, the way a parser grows a block one statement at a time. Any
    /// other node is first wrapped into a new compound holding it.
    pub fn add_statement(&mut self, statement: Statement) {
        match self {
            Statement::Compound { statements } => statements.push(statement),
            _ => {
                let first = std::mem::replace(self, Statement::compound(Vec::new()));
                *self = Statement::compound(vec![first, statement]);
            }
        }
    }
}

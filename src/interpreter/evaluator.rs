use std::rc::Rc;
use tracing::trace;
use crate::util;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, InfixOperator, Node, PrefixOperator, Program, Statement};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::object::{Function, Object, NULL, TRUE};


// Returns early from the enclosing function if the value is an error object.
macro_rules! try_eval {
    ($value:expr) => {{
        let value = $value;

        if value.is_error() {
            return value;
        }

        value
    }};
}

/// Evaluates `node` in `env`.
///
/// Errors are returned as [`Object::Error`] values and stop evaluation of everything enclosing
/// them. There is no depth limit and no tail-call elimination; the stack is grown on demand, so
/// deep user-level recursion costs memory rather than overflowing the thread's stack.
pub fn eval<'a>(node: impl Into<Node<'a>>, env: &Env) -> Object {
    match node.into() {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(statement) => eval_statement(statement, env),
        Node::Block(block) => eval_block_statement(block, env),
        Node::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_program(program: &Program, env: &Env) -> Object {
    let mut result = NULL;

    for statement in &program.statements {
        result = eval_statement(statement, env);

        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(_) => return result,
            _ => {},
        }
    }

    result
}

// Unlike `eval_program`, a `return` stays wrapped so the enclosing call can see it.
fn eval_block_statement(block: &BlockStatement, env: &Env) -> Object {
    let mut result = NULL;

    for statement in &block.statements {
        result = eval_statement(statement, env);

        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Env) -> Object {
    match statement {
        Statement::Let { name, value } => {
            let value = try_eval!(eval_expression(value, env));
            env.borrow_mut().set(name.name.clone(), value);

            NULL
        },
        Statement::Return { value } => {
            let value = try_eval!(eval_expression(value, env));
            Object::ReturnValue(Box::new(value))
        },
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_expression(expression: &Expression, env: &Env) -> Object {
    util::ensure_sufficient_stack(|| match expression {
        Expression::Identifier(identifier) => eval_identifier(identifier, env),
        Expression::Integer(value) => Object::Integer(*value),
        Expression::Boolean(value) => Object::from_bool(*value),

        Expression::Prefix { operator, right } => {
            let right = try_eval!(eval_expression(right, env));
            eval_prefix_expression(*operator, right)
        },
        Expression::Infix { left, operator, right } => {
            let left = try_eval!(eval_expression(left, env));
            let right = try_eval!(eval_expression(right, env));
            eval_infix_expression(*operator, left, right)
        },

        Expression::If { condition, consequence, alternative } => {
            let condition = try_eval!(eval_expression(condition, env));

            if condition.is_identical(&TRUE) {
                eval_block_statement(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, env)
            } else {
                NULL
            }
        },

        Expression::Function { parameters, body } => Object::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        })),
        Expression::Call { function, arguments } => {
            let function = try_eval!(eval_expression(function, env));

            let arguments = match eval_expressions(arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return error,
            };

            apply_function(function, arguments)
        },
    })
}

fn eval_identifier(identifier: &Identifier, env: &Env) -> Object {
    env.borrow().get(&identifier.name)
        .unwrap_or_else(|| Object::error(format!("identifier not found: {}", identifier.name)))
}

// Left to right, stopping at the first error.
fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
    expressions.iter()
        .map(|expression| {
            let value = eval_expression(expression, env);
            if value.is_error() { Err(value) } else { Ok(value) }
        })
        .collect()
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Object {
    match (operator, &right) {
        (PrefixOperator::Bang, Object::Boolean(value)) => Object::from_bool(!*value),
        (PrefixOperator::Minus, Object::Integer(value)) => Object::Integer(value.wrapping_neg()),
        (PrefixOperator::Plus, Object::Integer(_)) => right,
        _ => Object::error(format!("invalid operand: {}{}", operator, right.object_type())),
    }
}

fn eval_infix_expression(operator: InfixOperator, left: Object, right: Object) -> Object {
    if let (Object::Integer(left), Object::Integer(right)) = (&left, &right) {
        return eval_integer_infix_expression(operator, *left, *right);
    }

    let (left_type, right_type) = (left.object_type(), right.object_type());

    if left_type != right_type {
        return Object::error(format!("type mismatch: {} {} {}", left_type, operator, right_type));
    }

    match operator {
        InfixOperator::Equal => Object::from_bool(left.is_identical(&right)),
        InfixOperator::NotEqual => Object::from_bool(!left.is_identical(&right)),
        _ => Object::error(format!("unknown operator: {} {} {}", left_type, operator, right_type)),
    }
}

fn eval_integer_infix_expression(operator: InfixOperator, left: i64, right: i64) -> Object {
    match operator {
        InfixOperator::Plus => Object::Integer(left.wrapping_add(right)),
        InfixOperator::Minus => Object::Integer(left.wrapping_sub(right)),
        InfixOperator::Multiply => Object::Integer(left.wrapping_mul(right)),
        InfixOperator::Divide | InfixOperator::Modulo if right == 0 => {
            Object::error(format!("division by zero: {} {} {}", left, operator, right))
        },
        InfixOperator::Divide => Object::Integer(left.wrapping_div(right)),
        InfixOperator::Modulo => Object::Integer(left.wrapping_rem(right)),
        InfixOperator::Power => Object::Integer(power(left, right)),

        InfixOperator::Less => Object::from_bool(left < right),
        InfixOperator::LessEqual => Object::from_bool(left <= right),
        InfixOperator::Greater => Object::from_bool(left > right),
        InfixOperator::GreaterEqual => Object::from_bool(left >= right),
        InfixOperator::Equal => Object::from_bool(left == right),
        InfixOperator::NotEqual => Object::from_bool(left != right),
    }
}

// Equal to multiplying 1 by `base`, `exponent` times, with wrapping. Zero or negative exponents
// therefore give 1.
fn power(base: i64, exponent: i64) -> i64 {
    if exponent <= 0 {
        return 1;
    }

    let mut result: i64 = 1;
    let mut base = base;
    let mut exponent = exponent as u64;

    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.wrapping_mul(base);
        }

        base = base.wrapping_mul(base);
        exponent >>= 1;
    }

    result
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Object {
    let function = match function {
        Object::Function(function) => function,
        other => return Object::error(format!("not a function: {}", other.object_type())),
    };

    trace!(parameters = function.parameters.len(), arguments = arguments.len(), "applying function");

    let env = extend_function_env(&function, arguments);
    unwrap_return_value(eval_block_statement(&function.body, &env))
}

// Arity is not checked: missing arguments leave their parameters unbound, extra ones are dropped.
fn extend_function_env(function: &Function, arguments: Vec<Object>) -> Env {
    let env = Environment::new_enclosed(Rc::clone(&function.env));

    {
        let mut env = env.borrow_mut();

        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            env.set(parameter.name.clone(), argument);
        }
    }

    env
}

fn unwrap_return_value(object: Object) -> Object {
    match object {
        Object::ReturnValue(value) => *value,
        object => object,
    }
}

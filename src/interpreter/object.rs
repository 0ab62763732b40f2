use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{self, BlockStatement, Identifier};
use crate::interpreter::environment::Env;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    Return,
    Function,
    Error,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::Return => "RETURN",
            ObjectType::Function => "FUNCTION",
            ObjectType::Error => "ERROR",
        })
    }
}

/// A runtime value.
///
/// `Boolean` and `Null` only ever exist as the [`TRUE`], [`FALSE`] and [`NULL`] constants, so
/// comparing their tags is the same as comparing identities.
#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    // Only lives while a `return` unwinds to the enclosing call or program
    ReturnValue(Box<Object>),
    Function(Rc<Function>),
    Error(String),
}

impl Object {
    pub fn error(message: impl Into<String>) -> Object {
        Object::Error(message.into())
    }

    pub fn from_bool(value: bool) -> Object {
        if value { TRUE } else { FALSE }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::Return,
            Object::Function(_) => ObjectType::Function,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Identity comparison, as used by `==` and `!=` on non-integer operands.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(left), Object::Integer(right)) => left == right,
            (Object::Boolean(left), Object::Boolean(right)) => left == right,
            (Object::Null, Object::Null) => true,
            (Object::Function(left), Object::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::Null => String::from("null"),
            Object::ReturnValue(value) => value.inspect(),
            Object::Function(function) => function.inspect(),
            Object::Error(message) => format!("Error{}", message),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::ReturnValue(left), Object::ReturnValue(right)) => left == right,
            (Object::Error(left), Object::Error(right)) => left == right,
            _ => self.is_identical(other),
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inspect())
    }
}

pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Env,
}

impl Function {
    pub fn inspect(&self) -> String {
        format!("fn({}) {{\n{}\n}}", ast::join(&self.parameters), self.body)
    }
}

// The captured environment may contain this function, so it is left out.
impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::ast::{Expression, InfixOperator, Statement};
    use crate::interpreter::environment::Environment;
    use super::*;

    fn add_function() -> Object {
        Object::Function(Rc::new(Function {
            parameters: vec![Identifier::new("x"), Identifier::new("y")],
            body: BlockStatement {
                statements: vec![Statement::Expression(Expression::Infix {
                    left: Box::new(Expression::Identifier(Identifier::new("x"))),
                    operator: InfixOperator::Plus,
                    right: Box::new(Expression::Identifier(Identifier::new("y"))),
                })],
            },
            env: Environment::new_global(),
        }))
    }

    #[test]
    fn test_inspect() {
        assert_eq!("-42", Object::Integer(-42).inspect());
        assert_eq!("true", TRUE.inspect());
        assert_eq!("false", FALSE.inspect());
        assert_eq!("null", NULL.inspect());
        assert_eq!("7", Object::ReturnValue(Box::new(Object::Integer(7))).inspect());
        assert_eq!("Erroridentifier not found: x", Object::error("identifier not found: x").inspect());
        assert_eq!("fn(x, y) {\n(x + y)\n}", add_function().inspect());
    }

    #[test]
    fn test_object_types() {
        assert_eq!("INTEGER", Object::Integer(1).object_type().to_string());
        assert_eq!("BOOLEAN", TRUE.object_type().to_string());
        assert_eq!("NULL", NULL.object_type().to_string());
        assert_eq!("RETURN", Object::ReturnValue(Box::new(NULL)).object_type().to_string());
        assert_eq!("FUNCTION", add_function().object_type().to_string());
        assert_eq!("ERROR", Object::error("oops").object_type().to_string());
    }

    #[test]
    fn test_is_error() {
        assert!(Object::error("oops").is_error());
        assert!(!NULL.is_error());
        assert!(!Object::ReturnValue(Box::new(Object::error("oops"))).is_error());
    }

    #[test]
    fn test_identity() {
        let function = add_function();

        assert!(TRUE.is_identical(&Object::from_bool(true)));
        assert!(!TRUE.is_identical(&FALSE));
        assert!(NULL.is_identical(&NULL));
        assert!(!NULL.is_identical(&FALSE));
        assert!(function.is_identical(&function.clone()));
        assert!(!function.is_identical(&add_function()));
    }
}

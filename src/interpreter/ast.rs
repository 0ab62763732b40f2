use std::fmt::{Display, Formatter};
use crate::interpreter::lexer::TokenType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
    },
    Return {
        value: Expression,
    },
    Expression(Expression),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value } => write!(f, "return {};", value),
            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    fn fmt_braced(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            f.write_str("{ }")
        } else {
            write!(f, "{{ {} }}", self)
        }
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Identifier {
        Identifier { name: name.into() }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOperator {
    Minus,
    Plus,
    Bang,
}

impl PrefixOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<PrefixOperator> {
        match token_type {
            TokenType::Minus => Some(PrefixOperator::Minus),
            TokenType::Plus => Some(PrefixOperator::Plus),
            TokenType::Bang => Some(PrefixOperator::Bang),
            _ => None,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PrefixOperator::Minus => "-",
            PrefixOperator::Plus => "+",
            PrefixOperator::Bang => "!",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Plus, Minus,
    Multiply, Divide, Modulo,
    Power,
    Less, LessEqual,
    Greater, GreaterEqual,
    Equal, NotEqual,
}

impl InfixOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<InfixOperator> {
        Some(match token_type {
            TokenType::Plus => InfixOperator::Plus,
            TokenType::Minus => InfixOperator::Minus,
            TokenType::Asterisk => InfixOperator::Multiply,
            TokenType::Slash => InfixOperator::Divide,
            TokenType::Percent => InfixOperator::Modulo,
            TokenType::DoubleAsterisk => InfixOperator::Power,
            TokenType::Lt => InfixOperator::Less,
            TokenType::LtEq => InfixOperator::LessEqual,
            TokenType::Gt => InfixOperator::Greater,
            TokenType::GtEq => InfixOperator::GreaterEqual,
            TokenType::Eq => InfixOperator::Equal,
            TokenType::NotEq => InfixOperator::NotEqual,
            _ => return None,
        })
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Power => "**",
            InfixOperator::Less => "<",
            InfixOperator::LessEqual => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i64),
    Boolean(bool),

    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },

    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    // The environment is captured at evaluation time, not here
    Function {
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator, right),
            Expression::If { condition, consequence, alternative } => {
                write!(f, "if {} ", condition)?;
                consequence.fmt_braced(f)?;

                if let Some(alternative) = alternative {
                    f.write_str(" else ")?;
                    alternative.fmt_braced(f)?;
                }

                Ok(())
            },
            Expression::Function { parameters, body } => {
                write!(f, "fn({}) ", join(parameters))?;
                body.fmt_braced(f)
            },
            Expression::Call { function, arguments } => write!(f, "{}({})", function, join(arguments)),
        }
    }
}

pub(crate) fn join<T: Display>(items: &[T]) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(", ")
}

/// Any node the evaluator accepts.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(statement: &'a Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(block: &'a BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expression: &'a Expression) -> Self {
        Node::Expression(expression)
    }
}

use std::collections::HashMap;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::debug;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, InfixOperator, PrefixOperator, Program, Statement};
use crate::interpreter::lexer::{Lexer, Token, TokenPos, TokenType};
use crate::util;


pub type PrefixParseFn = for<'source> fn(&mut Parser<'source>) -> Option<Expression>;
pub type InfixParseFn = for<'source> fn(&mut Parser<'source>, Expression) -> Option<Expression>;

lazy_static! {
    static ref PREFIX_PARSE_FNS: HashMap<TokenType, PrefixParseFn> = {
        let mut fns: HashMap<TokenType, PrefixParseFn> = HashMap::new();
        fns.insert(TokenType::Identifier, parse_identifier);
        fns.insert(TokenType::Int, parse_integer_literal);
        fns.insert(TokenType::True, parse_boolean_literal);
        fns.insert(TokenType::False, parse_boolean_literal);
        fns.insert(TokenType::Bang, parse_prefix_expression);
        fns.insert(TokenType::Minus, parse_prefix_expression);
        fns.insert(TokenType::Plus, parse_prefix_expression);
        fns.insert(TokenType::LParen, parse_grouped_expression);
        fns.insert(TokenType::If, parse_if_expression);
        fns.insert(TokenType::Function, parse_function_literal);
        fns
    };

    static ref INFIX_PARSE_FNS: HashMap<TokenType, InfixParseFn> = {
        let mut fns: HashMap<TokenType, InfixParseFn> = HashMap::new();

        for token_type in [
            TokenType::Eq, TokenType::NotEq,
            TokenType::Lt, TokenType::LtEq, TokenType::Gt, TokenType::GtEq,
            TokenType::Plus, TokenType::Minus,
            TokenType::Asterisk, TokenType::Slash, TokenType::Percent,
            TokenType::DoubleAsterisk,
        ] {
            fns.insert(token_type, parse_infix_expression);
        }

        // `callee(arguments)`
        fns.insert(TokenType::LParen, parse_call_expression);
        fns
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Modulo,
    Power,
    Prefix,
    Call,
}

impl Precedence {
    pub fn of(token_type: TokenType) -> Precedence {
        match token_type {
            TokenType::Eq | TokenType::NotEq => Precedence::Equals,
            TokenType::Lt | TokenType::LtEq | TokenType::Gt | TokenType::GtEq => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Asterisk | TokenType::Slash => Precedence::Product,
            TokenType::Percent => Precedence::Modulo,
            TokenType::DoubleAsterisk => Precedence::Power,
            TokenType::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{pos} expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        pos: TokenPos,
        expected: TokenType,
        got: TokenType,
    },
    #[error("{pos} mismatched bracket: expected {expected}, got {got}")]
    MismatchedBracket {
        pos: TokenPos,
        expected: TokenType,
        got: TokenType,
    },
    #[error("{pos} no prefix parse function for {token_type} found")]
    NoPrefixParseFn {
        pos: TokenPos,
        token_type: TokenType,
    },
    #[error("{pos} could not parse {literal} as integer")]
    InvalidInteger {
        pos: TokenPos,
        literal: String,
    },
}

impl ParseError {
    pub fn pos(&self) -> TokenPos {
        match self {
            ParseError::UnexpectedToken { pos, .. } => *pos,
            ParseError::MismatchedBracket { pos, .. } => *pos,
            ParseError::NoPrefixParseFn { pos, .. } => *pos,
            ParseError::InvalidInteger { pos, .. } => *pos,
        }
    }
}

/// Pratt parser over a [`Lexer`].
///
/// Syntax errors never abort the parse; they are collected and the parser carries on with the
/// next statement. Check [`Parser::errors`] before trusting the returned [`Program`].
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<ParseError>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::eof(), peek: Token::eof(),
            errors: Vec::new(),
        };

        // Fill both `current` and `peek`
        parser.next_token();
        parser.next_token();

        parser
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            self.next_token();
        }

        Program { statements }
    }

    // Statements

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type() {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenType::Identifier)?;
        let name = Identifier::new(self.current.source());

        self.expect_peek(TokenType::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return { value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression(expr))
    }

    // Expects `current` to be the opening `{`. Stops on the closing `}` or at end of input.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.next_token();

        while !self.current_is(TokenType::RBrace) && !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            self.next_token();
        }

        BlockStatement { statements }
    }

    // Expressions

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        util::ensure_sufficient_stack(|| self.parse_expression_with(precedence))
    }

    fn parse_expression_with(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match PREFIX_PARSE_FNS.get(&self.current.token_type()) {
            Some(prefix) => *prefix,
            None => {
                self.error(ParseError::NoPrefixParseFn {
                    pos: *self.current.start(),
                    token_type: self.current.token_type(),
                });
                return None;
            },
        };

        let mut left = prefix(self)?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match INFIX_PARSE_FNS.get(&self.peek.token_type()) {
                Some(infix) => *infix,
                None => return Some(left),
            };

            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    // Expects `current` to be the opening `(`; consumes through the closing `)`.
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.expect_peek(TokenType::Identifier)?;
        parameters.push(Identifier::new(self.current.source()));

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.expect_peek(TokenType::Identifier)?;
            parameters.push(Identifier::new(self.current.source()));
        }

        self.expect_bracket(TokenType::RParen)?;
        Some(parameters)
    }

    // Same shape as the parameter list, but for arbitrary expressions.
    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();

        if self.peek_is(TokenType::RParen) {
            self.next_token();
            return Some(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_bracket(TokenType::RParen)?;
        Some(arguments)
    }

    // Token handling

    fn next_token(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn expect_peek(&mut self, token_type: TokenType) -> Option<()> {
        if self.peek_is(token_type) {
            self.next_token();
            return Some(());
        }

        self.error(ParseError::UnexpectedToken {
            pos: *self.peek.start(),
            expected: token_type,
            got: self.peek.token_type(),
        });

        None
    }

    // Like `expect_peek`, for the delimiters of `if` and of parameter and argument lists.
    fn expect_bracket(&mut self, token_type: TokenType) -> Option<()> {
        if self.peek_is(token_type) {
            self.next_token();
            return Some(());
        }

        self.error(ParseError::MismatchedBracket {
            pos: *self.peek.start(),
            expected: token_type,
            got: self.peek.token_type(),
        });

        None
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }
    }

    #[inline]
    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.token_type())
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.token_type())
    }

    fn error(&mut self, error: ParseError) {
        debug!(%error, "recorded parse error");
        self.errors.push(error);
    }
}

// Prefix parse functions. Each starts with `current` on the token it was dispatched for.

fn parse_identifier(parser: &mut Parser<'_>) -> Option<Expression> {
    Some(Expression::Identifier(Identifier::new(parser.current.source())))
}

fn parse_integer_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    match parser.current.source().parse::<i64>() {
        Ok(value) => Some(Expression::Integer(value)),
        Err(_) => {
            let error = ParseError::InvalidInteger {
                pos: *parser.current.start(),
                literal: parser.current.source().to_owned(),
            };

            parser.error(error);
            None
        },
    }
}

fn parse_boolean_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    Some(Expression::Boolean(parser.current_is(TokenType::True)))
}

fn parse_prefix_expression(parser: &mut Parser<'_>) -> Option<Expression> {
    let operator = PrefixOperator::from_token_type(parser.current.token_type())?;
    parser.next_token();

    let right = parser.parse_expression(Precedence::Prefix)?;
    Some(Expression::Prefix { operator, right: Box::new(right) })
}

fn parse_grouped_expression(parser: &mut Parser<'_>) -> Option<Expression> {
    parser.next_token();

    let expr = parser.parse_expression(Precedence::Lowest)?;
    parser.expect_peek(TokenType::RParen)?;

    Some(expr)
}

fn parse_if_expression(parser: &mut Parser<'_>) -> Option<Expression> {
    parser.expect_bracket(TokenType::LParen)?;
    parser.next_token();

    let condition = parser.parse_expression(Precedence::Lowest)?;

    parser.expect_bracket(TokenType::RParen)?;
    parser.expect_bracket(TokenType::LBrace)?;

    let consequence = parser.parse_block_statement();

    let alternative = if parser.peek_is(TokenType::Else) {
        parser.next_token();
        parser.expect_bracket(TokenType::LBrace)?;

        Some(parser.parse_block_statement())
    } else {
        None
    };

    Some(Expression::If { condition: Box::new(condition), consequence, alternative })
}

fn parse_function_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    parser.expect_peek(TokenType::LParen)?;
    let parameters = parser.parse_function_parameters()?;

    parser.expect_peek(TokenType::LBrace)?;
    let body = parser.parse_block_statement();

    Some(Expression::Function { parameters, body })
}

// Infix parse functions. `current` is the operator token, `left` the operand parsed so far.

fn parse_infix_expression(parser: &mut Parser<'_>, left: Expression) -> Option<Expression> {
    let operator = InfixOperator::from_token_type(parser.current.token_type())?;
    let precedence = parser.current_precedence();
    parser.next_token();

    let right = parser.parse_expression(precedence)?;
    Some(Expression::Infix { left: Box::new(left), operator, right: Box::new(right) })
}

fn parse_call_expression(parser: &mut Parser<'_>, function: Expression) -> Option<Expression> {
    let arguments = parser.parse_call_arguments()?;
    Some(Expression::Call { function: Box::new(function), arguments })
}

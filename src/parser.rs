use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};
use thiserror::Error;

use crate::ast::{
    BlockStatement, Expression, HashLiteral, InfixOperator, PrefixOperator, Program, Statement,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, TokenSource};

type Result<T> = std::result::Result<T, ParserError>;

type PrefixParseFn<S> = fn(&mut Parser<S>) -> Result<Expression>;
type InfixParseFn<S> = fn(&mut Parser<S>, Expression) -> Result<Expression>;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParserError {
    #[error("expected next token to be {expected}, got {actual} instead")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
}

/// Binding power of operators, weakest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    /// == or !=
    Equals,
    /// > or <
    LessGreater,
    /// + or -
    Sum,
    /// * or /
    Product,
    /// -x or !x
    Prefix,
    /// my_fn(x)
    Call,
    /// array[index]
    Index,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::Ne => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::OpenParen => Precedence::Call,
            TokenKind::OpenBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

/// Pratt parser over any [`TokenSource`].
///
/// Every parse function starts with `cur_token` on the first token of its
/// construct and returns with `cur_token` on the last token it consumed.
pub struct Parser<S> {
    tokens: S,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParserError>,

    prefix_parse_fns: HashMap<TokenKind, PrefixParseFn<S>>,
    infix_parse_fns: HashMap<TokenKind, InfixParseFn<S>>,
}

impl<'a> Parser<Lexer<'a>> {
    pub fn from_source(input: &'a str) -> Self {
        Parser::new(Lexer::new(input))
    }
}

impl<S: TokenSource> Parser<S> {
    pub fn new(tokens: S) -> Self {
        let mut p = Parser {
            tokens,
            cur_token: Token::eof(),
            peek_token: Token::eof(),
            errors: vec![],
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        p.register_prefix(TokenKind::Ident, Self::parse_identifier);
        p.register_prefix(TokenKind::Int, Self::parse_integer_literal);
        p.register_prefix(TokenKind::String, Self::parse_string_literal);
        p.register_prefix(TokenKind::True, Self::parse_boolean);
        p.register_prefix(TokenKind::False, Self::parse_boolean);
        p.register_prefix(TokenKind::Bang, Self::parse_prefix_expression);
        p.register_prefix(TokenKind::Minus, Self::parse_prefix_expression);
        p.register_prefix(TokenKind::OpenParen, Self::parse_grouped_expression);
        p.register_prefix(TokenKind::If, Self::parse_if_expression);
        p.register_prefix(TokenKind::Function, Self::parse_function_literal);
        p.register_prefix(TokenKind::OpenBracket, Self::parse_array_literal);
        p.register_prefix(TokenKind::OpenBrace, Self::parse_hash_literal);

        p.register_infix(TokenKind::Plus, |p, left| {
            p.parse_infix_expression(InfixOperator::Plus, left)
        });
        p.register_infix(TokenKind::Minus, |p, left| {
            p.parse_infix_expression(InfixOperator::Minus, left)
        });
        p.register_infix(TokenKind::Asterisk, |p, left| {
            p.parse_infix_expression(InfixOperator::Asterisk, left)
        });
        p.register_infix(TokenKind::Slash, |p, left| {
            p.parse_infix_expression(InfixOperator::Slash, left)
        });
        p.register_infix(TokenKind::Lt, |p, left| {
            p.parse_infix_expression(InfixOperator::Lt, left)
        });
        p.register_infix(TokenKind::Gt, |p, left| {
            p.parse_infix_expression(InfixOperator::Gt, left)
        });
        p.register_infix(TokenKind::Eq, |p, left| {
            p.parse_infix_expression(InfixOperator::Eq, left)
        });
        p.register_infix(TokenKind::Ne, |p, left| {
            p.parse_infix_expression(InfixOperator::NotEq, left)
        });
        p.register_infix(TokenKind::OpenParen, Self::parse_call_expression);
        p.register_infix(TokenKind::OpenBracket, Self::parse_index_expression);

        // Read 2 tokens so that cur_token and peek_token are both initialised
        p.next_token();
        p.next_token();

        p
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn<S>) {
        self.prefix_parse_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn<S>) {
        self.infix_parse_fns.insert(kind, f);
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn next_token(&mut self) {
        let next = self.tokens.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
        trace!("cur_token={:?}", self.cur_token);
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while !self.cur_token.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement_or_record() {
                statements.push(stmt);
            }
            self.next_token();
        }

        debug!(
            "parsed {} statements with {} errors",
            statements.len(),
            self.errors.len()
        );

        Program { statements }
    }

    /// Broken statements are dropped; the error is kept for the caller.
    fn parse_statement_or_record(&mut self) -> Option<Statement> {
        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                debug!("skipping statement: {}", err);
                self.errors.push(err);
                None
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur_token.literal.clone();

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Ok(Statement::Expression(expression))
    }

    fn skip_optional_semicolon(&mut self) {
        if self.peek_token.is(TokenKind::SemiColon) {
            self.next_token();
        }
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = vec![];
        self.next_token();

        while !self.cur_token.is(TokenKind::CloseBrace) && !self.cur_token.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement_or_record() {
                statements.push(stmt);
            }
            self.next_token();
        }

        BlockStatement { statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let prefix = match self.prefix_parse_fns.get(&self.cur_token.kind) {
            Some(f) => *f,
            None => return Err(ParserError::NoPrefixParseFn(self.cur_token.kind)),
        };

        let mut left = prefix(self)?;

        while !self.peek_token.is(TokenKind::SemiColon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek_token.kind) {
                Some(f) => *f,
                None => return Ok(left),
            };

            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur_token.kind)
    }

    fn parse_identifier(&mut self) -> Result<Expression> {
        Ok(Expression::Identifier(self.cur_token.literal.clone()))
    }

    fn parse_integer_literal(&mut self) -> Result<Expression> {
        let literal = &self.cur_token.literal;

        literal
            .parse()
            .map(Expression::IntegerLiteral)
            .map_err(|_| ParserError::InvalidInteger(literal.clone()))
    }

    fn parse_string_literal(&mut self) -> Result<Expression> {
        Ok(Expression::StringLiteral(self.cur_token.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Result<Expression> {
        Ok(Expression::Boolean(self.cur_token.is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let operator = match self.cur_token.kind {
            TokenKind::Bang => PrefixOperator::Bang,
            TokenKind::Minus => PrefixOperator::Minus,
            kind => return Err(ParserError::NoPrefixParseFn(kind)),
        };

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(operator, Box::new(right)))
    }

    fn parse_infix_expression(
        &mut self,
        operator: InfixOperator,
        left: Expression,
    ) -> Result<Expression> {
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(operator, Box::new(left), Box::new(right)))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();

        let exp = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::CloseParen)?;

        Ok(exp)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(TokenKind::OpenParen)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::CloseParen)?;
        self.expect_peek(TokenKind::OpenBrace)?;

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token.is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::OpenBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Ok(Expression::If(Box::new(condition), consequence, alternative))
    }

    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect_peek(TokenKind::OpenParen)?;

        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::OpenBrace)?;

        let body = self.parse_block_statement();

        Ok(Expression::FunctionLiteral(parameters, Rc::new(body)))
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<String>> {
        let mut identifiers = vec![];

        if self.peek_token.is(TokenKind::CloseParen) {
            self.next_token();
            return Ok(identifiers);
        }

        self.expect_peek(TokenKind::Ident)?;
        identifiers.push(self.cur_token.literal.clone());

        while self.peek_token.is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            identifiers.push(self.cur_token.literal.clone());
        }

        self.expect_peek(TokenKind::CloseParen)?;

        Ok(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(TokenKind::CloseParen)?;

        Ok(Expression::Call(Box::new(function), arguments))
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements = self.parse_expression_list(TokenKind::CloseBracket)?;

        Ok(Expression::ArrayLiteral(elements))
    }

    /// Comma separated expressions up to and including `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_token.is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Ok(list)
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::CloseBracket)?;

        Ok(Expression::IndexExpression(Box::new(left), Box::new(index)))
    }

    fn parse_hash_literal(&mut self) -> Result<Expression> {
        let mut hash = HashLiteral::default();

        while !self.peek_token.is(TokenKind::CloseBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(TokenKind::Colon)?;
            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            hash.pairs.push((key, value));

            if !self.peek_token.is(TokenKind::CloseBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }

        self.expect_peek(TokenKind::CloseBrace)?;

        Ok(Expression::HashLiteral(hash))
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Result<()> {
        if !self.peek_token.is(kind) {
            return Err(ParserError::UnexpectedToken {
                expected: kind,
                actual: self.peek_token.kind,
            });
        }

        self.next_token();
        Ok(())
    }
}

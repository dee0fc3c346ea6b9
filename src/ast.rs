use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral(i64),
    StringLiteral(String),
    Boolean(bool),
    Prefix(PrefixOperator, Box<Expression>),
    Infix(InfixOperator, Box<Expression>, Box<Expression>),
    If(Box<Expression>, BlockStatement, Option<BlockStatement>),
    /// Parameter names and body. The body is shared with every function value
    /// created from this literal.
    FunctionLiteral(Vec<String>, Rc<BlockStatement>),
    Call(Box<Expression>, Vec<Expression>),
    ArrayLiteral(Vec<Expression>),
    IndexExpression(Box<Expression>, Box<Expression>),
    HashLiteral(HashLiteral),
}

impl Expression {
    /// Literal text of the token the expression starts with, for diagnostics.
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(name) => name.clone(),
            Expression::IntegerLiteral(v) => v.to_string(),
            Expression::StringLiteral(s) => s.clone(),
            Expression::Boolean(b) => b.to_string(),
            Expression::Prefix(operator, _) => operator.to_string(),
            Expression::Infix(operator, _, _) => operator.to_string(),
            Expression::If(..) => "if".to_string(),
            Expression::FunctionLiteral(..) => "fn".to_string(),
            Expression::Call(..) => "(".to_string(),
            Expression::ArrayLiteral(_) | Expression::IndexExpression(..) => "[".to_string(),
            Expression::HashLiteral(_) => "{".to_string(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::IntegerLiteral(v) => write!(f, "{}", v),
            Expression::StringLiteral(s) => write!(f, "{}", s),
            Expression::Boolean(b) => write!(f, "{}", b),
            Expression::Prefix(operator, right) => write!(f, "({}{})", operator, right),
            Expression::Infix(operator, left, right) => {
                write!(f, "({} {} {})", left, operator, right)
            }
            Expression::If(condition, consequence, alternative) => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral(parameters, body) => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Expression::Call(function, arguments) => {
                write!(f, "{}({})", function, comma_separated(arguments))
            }
            Expression::ArrayLiteral(elements) => write!(f, "[{}]", comma_separated(elements)),
            Expression::IndexExpression(left, index) => write!(f, "({}[{}])", left, index),
            Expression::HashLiteral(hash) => write!(f, "{}", hash),
        }
    }
}

fn comma_separated(expressions: &[Expression]) -> String {
    expressions
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        };
        f.write_str(s)
    }
}

/// Key/value expressions of a hash literal, in source order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HashLiteral {
    pub pairs: Vec<(Expression, Expression)>,
}

impl fmt::Display for HashLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Let(String, Expression),
    Return(Expression),
    Expression(Expression),
}

impl Statement {
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Let(..) => "let".to_string(),
            Statement::Return(_) => "return".to_string(),
            Statement::Expression(exp) => exp.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let(name, value) => write!(f, "let {} = {};", name, value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(exp) => write!(f, "{}", exp),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(Statement::token_literal)
            .unwrap_or_default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Expression, InfixOperator, Program, Statement};

    #[test]
    fn program_to_string() {
        let program = Program {
            statements: vec![Statement::Let(
                "myVar".to_string(),
                Expression::Identifier("anotherVar".to_string()),
            )],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn token_literals() {
        let sum = Expression::Infix(
            InfixOperator::Plus,
            Box::new(Expression::IntegerLiteral(1)),
            Box::new(Expression::IntegerLiteral(2)),
        );

        assert_eq!(sum.token_literal(), "+");
        assert_eq!(Statement::Expression(sum).token_literal(), "+");
        assert_eq!(Program::default().token_literal(), "");
    }
}

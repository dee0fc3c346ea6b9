use crate::evaluator;
use crate::object::{Env, Environment, EvalError, Object};
use crate::parser::{Parser, ParserError};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParserError>),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

/// Parses and evaluates source text against one top-level environment, so
/// `let` bindings survive from one call to the next.
pub struct Interpreter {
    env: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new_shared(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Source with parse errors is not evaluated.
    pub fn eval(&mut self, input: &str) -> Result<Object, InterpretError> {
        let mut parser = Parser::from_source(input);
        let program = parser.parse_program();

        if !parser.errors().is_empty() {
            debug!("not evaluating: {} parse errors", parser.errors().len());
            return Err(InterpretError::Parse(parser.errors().to_vec()));
        }

        Ok(evaluator::eval(&program, &self.env)?)
    }
}

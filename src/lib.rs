pub mod ast;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

pub use interpreter::{InterpretError, Interpreter};

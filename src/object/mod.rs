use crate::ast::{BlockStatement, InfixOperator, PrefixOperator};
pub use crate::object::builtins::BuiltIn;
pub use crate::object::environment::{Env, Environment};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub mod builtins;
pub mod environment;

/// Runtime values. Arrays, hashes and functions are reference counted, so
/// cloning an `Object` never copies their contents and `==` in the language
/// can compare them by identity.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Null,
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Rc<Vec<Object>>),
    Hash(Rc<IndexMap<HashKey, HashPair>>),
    Function(Rc<Function>),
    BuiltIn(BuiltIn),
    /// Carries a `return` out of nested blocks up to the enclosing call.
    Return(Box<Object>),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Integer(v) => write!(f, "{}", v),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => write!(f, "{}", s),
            Object::Array(elements) => {
                let elements = elements.iter().map(|e| e.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", elements.join(", "))
            }
            Object::Hash(pairs) => {
                let pairs = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Object::Function(function) => write!(f, "{}", function),
            Object::BuiltIn(_) => write!(f, "builtin function"),
            Object::Return(obj) => write!(f, "{}", obj),
        }
    }
}

impl Object {
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "NULL",
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::BuiltIn(_) => "BUILTIN",
            Object::Return(_) => "RETURN_VALUE",
        }
    }

    /// Identity comparison used by `==` and `!=` on anything other than two
    /// integers or two strings. `null`, `true` and `false` behave as
    /// singletons; everything else is only identical to itself.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Array(l), Object::Array(r)) => Rc::ptr_eq(l, r),
            (Object::Hash(l), Object::Hash(r)) => Rc::ptr_eq(l, r),
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            (Object::BuiltIn(l), Object::BuiltIn(r)) => l == r,
            _ => false,
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(v) => Some(HashKey::Integer(*v)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }
}

/// Key of a hash value. The variant is part of the key, so `1` and `true`
/// never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// A closure: parameters and body plus the environment the literal was
/// evaluated in.
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn({}) {{\n{}\n}}", self.parameters.join(", "), self.body)
    }
}

// The captured environment usually holds the function itself, so it is left
// out of Debug and PartialEq.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

pub type EvalResult = std::result::Result<Object, EvalError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {0}{1}")]
    UnknownPrefixOperator(PrefixOperator, &'static str),
    #[error("unknown operator: {1} {0} {2}")]
    UnknownInfixOperator(InfixOperator, &'static str, &'static str),
    #[error("type mismatch: {1} {0} {2}")]
    TypeMismatch(InfixOperator, &'static str, &'static str),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("argument to `{0}` not supported, got {1}")]
    UnsupportedArgument(&'static str, &'static str),
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
}

pub fn assert_argument_count(expected: usize, args: &[Object]) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: expected,
        });
    }

    Ok(())
}
